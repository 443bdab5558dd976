//! End-to-end dispatch through `Shell::run_async` against a mocked API.
//!
//! A counting bootstrap wraps the real one so each test can assert whether
//! configuration was resolved and a session was created.

use std::io::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dealer_cli::config::{ENV_CONFIG, ENV_PASSWORD, ENV_TOKEN, ENV_URL, ENV_USERNAME};
use dealer_cli::{Bootstrap, CliError, ConnectionArgs, EffectiveConfig, EnvVars, PlatformBootstrap, Shell};
use dealer_client::Client;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct CountingBootstrap {
    inner: PlatformBootstrap,
    resolves: AtomicUsize,
    connects: AtomicUsize,
}

impl CountingBootstrap {
    fn new(env: EnvVars) -> Self {
        Self {
            inner: PlatformBootstrap::new(env),
            resolves: AtomicUsize::new(0),
            connects: AtomicUsize::new(0),
        }
    }

    fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bootstrap for CountingBootstrap {
    fn resolve(&self, flags: &ConnectionArgs) -> Result<EffectiveConfig, CliError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(flags)
    }

    async fn connect(&self, config: &EffectiveConfig) -> Result<Client, CliError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.inner.connect(config).await
    }
}

/// Environment pointing the config file at an empty temp dir and the
/// base URL at `url`, plus `extra` variables.
fn env(home: &Path, url: Option<&str>, extra: &[(&str, &str)]) -> EnvVars {
    let config = home.join("config").to_string_lossy().into_owned();
    let mut vars: Vec<(String, String)> = vec![(ENV_CONFIG.into(), config)];
    if let Some(url) = url {
        vars.push((ENV_URL.into(), url.into()));
    }
    vars.extend(extra.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
    vars.into_iter().collect()
}

struct Outcome {
    code: u8,
    stdout: String,
    stderr: String,
}

async fn run(shell: &Shell<CountingBootstrap>, args: &[&str]) -> Outcome {
    let argv = std::iter::once("dealer").chain(args.iter().copied());
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = shell.run_async(argv, &mut out, &mut err).await;
    Outcome {
        code,
        stdout: String::from_utf8(out).expect("utf-8 stdout"),
        stderr: String::from_utf8(err).expect("utf-8 stderr"),
    }
}

#[tokio::test]
async fn completion_never_bootstraps() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["--config", "/nonexistent/config", "bash-completion"]).await;

    assert_eq!(outcome.code, 0);
    let words: Vec<&str> = outcome.stdout.split_whitespace().collect();
    for expected in ["help", "complete", "bash-completion", "workspace-list", "chart-install", "--token", "--dealer-url", "-q"] {
        assert!(words.contains(&expected), "missing {expected}");
    }
    assert_eq!(shell.bootstrap().resolves(), 0);
    assert_eq!(shell.bootstrap().connects(), 0);
}

#[tokio::test]
async fn completion_anywhere_in_argv_short_circuits() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["workspace-get", "bash-completion"]).await;

    assert_eq!(outcome.code, 0);
    assert!(outcome.stdout.contains("workspace-get"));
    assert_eq!(shell.bootstrap().resolves(), 0);
}

#[tokio::test]
async fn help_flag_lists_commands_and_exits_zero() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["--help"]).await;

    assert_eq!(outcome.code, 0);
    let (usage, commands) = outcome.stdout.split_once("\nCommands for API:\n").expect("listing");
    assert!(usage.contains("--dealer-url"));

    let names: Vec<&str> = commands
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(names.contains(&"app-task-run"));
    assert_eq!(shell.bootstrap().resolves(), 0);
}

#[tokio::test]
async fn no_command_prints_listing() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &[]).await;

    assert_eq!(outcome.code, 0);
    assert!(outcome.stdout.contains("Commands for API:"));
}

#[tokio::test]
async fn unknown_command_fails_before_bootstrap() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["wokspace-list"]).await;

    assert_eq!(outcome.code, 1);
    assert_eq!(
        outcome.stderr,
        "error: unknown command 'wokspace-list', see 'dealer help'\n"
    );
    assert_eq!(shell.bootstrap().resolves(), 0);
}

#[tokio::test]
async fn missing_argument_fails_before_bootstrap() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["project-get", "demo"]).await;

    assert_eq!(outcome.code, 2);
    assert!(outcome.stderr.contains("<project>"));
    assert_eq!(shell.bootstrap().resolves(), 0);
}

#[tokio::test]
async fn command_help_exits_zero_without_bootstrap() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["app-delete", "--help"]).await;

    assert_eq!(outcome.code, 0);
    assert!(outcome.stdout.contains("--force"));
    assert_eq!(shell.bootstrap().resolves(), 0);
}

#[tokio::test]
async fn help_command_does_not_need_credentials() {
    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(&shell, &["help", "chart-install"]).await;

    assert_eq!(outcome.code, 0);
    assert!(outcome.stdout.contains("--target-workspace"));
    assert_eq!(shell.bootstrap().connects(), 0);
}

#[tokio::test]
async fn workspace_list_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Name": "demo", "DisplayName": "Demo", "Type": "personal"},
            {"Name": "ml-team", "DisplayName": "ML Team", "Type": "org"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), Some(&server.uri()), &[])));

    let outcome = run(&shell, &["--token", "tok-1", "workspace-list"]).await;

    assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
    assert!(outcome.stdout.starts_with("NAME"));
    assert!(outcome.stdout.contains("ml-team"));
    assert!(outcome.stdout.contains("Total: 2 item(s)"));
    assert_eq!(shell.bootstrap().resolves(), 1);
    assert_eq!(shell.bootstrap().connects(), 1);
}

#[tokio::test]
async fn global_flags_after_command_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace"))
        .and(header("Authorization", "Bearer late"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Name": "demo"}])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));

    let outcome = run(
        &shell,
        &[
            "--token",
            "early",
            "workspace-list",
            "--token",
            "late",
            "--dealer-url",
            &server.uri(),
            "-f",
            "json",
        ],
    )
    .await;

    assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
    let parsed: Value = serde_json::from_str(&outcome.stdout).expect("json output");
    assert_eq!(parsed, json!([{"Name": "demo"}]));
    assert_eq!(shell.bootstrap().resolves(), 1);
    assert_eq!(shell.bootstrap().connects(), 1);
}

#[tokio::test]
async fn json_format_prints_raw_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/org/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Name": "acme", "ID": "42"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(
        home.path(),
        Some(&server.uri()),
        &[(ENV_TOKEN, "tok")],
    )));

    let outcome = run(&shell, &["-f", "json", "org-get", "acme"]).await;

    assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
    let parsed: Value = serde_json::from_str(&outcome.stdout).expect("json output");
    assert_eq!(parsed, json!({"Name": "acme", "ID": "42"}));
}

#[tokio::test]
async fn password_login_then_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"LoginOrEmail": "alice", "Password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sessionid=abc; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/workspace/demo/application/jupyter"))
        .and(query_param("force", "true"))
        .and(header("cookie", "sessionid=abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(
        home.path(),
        Some(&server.uri()),
        &[(ENV_USERNAME, "alice"), (ENV_PASSWORD, "s3cret")],
    )));

    let outcome = run(&shell, &["app-delete", "demo", "jupyter", "--force"]).await;

    assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
    assert_eq!(outcome.stdout, "✓ Application 'jupyter' deleted\n");
}

#[tokio::test]
async fn rejected_login_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), Some(&server.uri()), &[])));

    let outcome = run(
        &shell,
        &["--username", "alice", "--password", "wrong", "workspace-list"],
    )
    .await;

    assert_eq!(outcome.code, 1);
    assert_eq!(outcome.stderr, "error: invalid auth (401): bad credentials\n");
    assert!(outcome.stdout.is_empty());
}

#[tokio::test]
async fn missing_credentials_make_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(home.path(), Some(&server.uri()), &[])));

    let outcome = run(&shell, &["--username", "alice", "workspace-list"]).await;

    assert_eq!(outcome.code, 1);
    assert!(outcome.stderr.starts_with("error: "));
    assert!(outcome.stderr.contains("token"));
    assert_eq!(shell.bootstrap().connects(), 1);
}

#[tokio::test]
async fn config_file_supplies_url_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/demo/projects"))
        .and(header("Authorization", "Bearer from-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let config = home.path().join("dealer.yaml");
    let mut file = std::fs::File::create(&config).expect("create config");
    writeln!(file, "base_url: {}\ntoken: from-file", server.uri()).expect("write config");

    let shell = Shell::new(CountingBootstrap::new(env(home.path(), None, &[])));
    let config_arg = config.to_string_lossy().into_owned();

    let outcome = run(&shell, &["--config", config_arg.as_str(), "project-list", "demo"]).await;

    assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
    assert_eq!(outcome.stdout, "No results\n");
}

#[tokio::test]
async fn api_error_reports_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("workspace not found"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    let shell = Shell::new(CountingBootstrap::new(env(
        home.path(),
        Some(&server.uri()),
        &[(ENV_TOKEN, "tok")],
    )));

    let outcome = run(&shell, &["workspace-get", "missing"]).await;

    assert_eq!(outcome.code, 1);
    assert_eq!(
        outcome.stderr,
        "error: api request failed (404): workspace not found\n"
    );
}
