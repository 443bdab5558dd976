//! Connection configuration resolution.
//!
//! Three sources feed every field independently, strongest first:
//! command-line flag, `DEALER_*` environment variable, config file, then the
//! built-in default. Empty values count as absent at every level.
//!
//! A config file that is missing or unparsable is not fatal: it is logged
//! as a warning and treated as an empty mapping.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use dealer_client::{Credentials, DEFAULT_BASE_URL};
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cli::ConnectionArgs;
use crate::error::CliError;

/// Environment variable naming the config file.
pub const ENV_CONFIG: &str = "DEALER_CONFIG";
/// Environment variable for the API base URL.
pub const ENV_URL: &str = "DEALER_URL";
/// Environment variable for the login name.
pub const ENV_USERNAME: &str = "DEALER_USERNAME";
/// Environment variable for the password.
pub const ENV_PASSWORD: &str = "DEALER_PASSWORD";
/// Environment variable disabling TLS verification. Only the spellings
/// accepted by [`parse_bool`] enable it; other non-empty values such as
/// `0` or `no` leave verification on.
pub const ENV_INSECURE: &str = "DEALER_CLIENT_INSECURE";
/// Environment variable for the API token.
pub const ENV_TOKEN: &str = "DEALER_TOKEN";

/// Config file location relative to the home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".kuberlab/config";

const KEY_BASE_URL: &str = "base_url";
const KEY_USERNAME: &str = "username";
const KEY_PASSWORD: &str = "password";
const KEY_TOKEN: &str = "token";
const KEY_INSECURE: &str = "insecure";

/// Immutable snapshot of the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Value of `key`, treating empty values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Why a config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("{0}")]
    Read(#[from] io::Error),
    /// The file is not valid YAML.
    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),
    /// The document is valid YAML but not a key/value mapping.
    #[error("expected a key/value document")]
    NotMapping,
}

/// Key/value document loaded from the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    values: Mapping,
}

impl FileConfig {
    /// Load `path`, falling back to an empty mapping (with a warning) when
    /// the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                debug!(path = %path.display(), keys = config.values.len(), "loaded config file");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "can't parse config");
                Self::default()
            }
        }
    }

    /// Load `path`, reporting why it could not be used.
    pub fn try_load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse a YAML document. An empty document is an empty mapping.
    pub fn parse(text: &str) -> Result<Self, ConfigFileError> {
        match serde_yaml::from_str::<Value>(text)? {
            Value::Null => Ok(Self::default()),
            Value::Mapping(values) => Ok(Self { values }),
            _ => Err(ConfigFileError::NotMapping),
        }
    }

    /// Whether no keys were loaded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `base_url` must be a string when present.
    fn base_url(&self) -> Result<Option<String>, CliError> {
        match self.values.get(KEY_BASE_URL) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(non_empty(s)),
            Some(_) => Err(CliError::InvalidParameter(
                "dealer url should be a string".into(),
            )),
        }
    }

    /// Credential keys accept strings and numbers (a numeric password is
    /// still a password).
    fn credential(&self, key: &str) -> Result<Option<String>, CliError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(non_empty(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(CliError::InvalidParameter(format!(
                "config key '{key}' should be a string"
            ))),
        }
    }

    fn insecure(&self) -> bool {
        match self.values.get(KEY_INSECURE) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => parse_bool(s),
            _ => false,
        }
    }
}

/// Fully resolved connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// API base URL.
    pub base_url: String,
    /// Login name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// API token.
    pub token: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

impl EffectiveConfig {
    /// Credential shape selected from the resolved fields.
    pub fn credentials(&self) -> Credentials {
        Credentials::from_parts(
            self.username.as_deref(),
            self.password.as_deref(),
            self.token.as_deref(),
        )
    }
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("EffectiveConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("token", &redact(&self.token))
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Merges flags, environment and config file into an [`EffectiveConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    env: &'a EnvVars,
}

impl<'a> ConfigResolver<'a> {
    /// Resolver reading the given environment snapshot.
    pub const fn new(env: &'a EnvVars) -> Self {
        Self { env }
    }

    /// Config file path: `--config`, then `DEALER_CONFIG`, then
    /// `~/.kuberlab/config`.
    pub fn config_path(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(path) = flag.filter(|p| !p.as_os_str().is_empty()) {
            return path.to_path_buf();
        }
        if let Some(path) = self.env.get(ENV_CONFIG) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |home| home.join(DEFAULT_CONFIG_PATH))
    }

    /// Load the config file selected by `flags` and merge all sources.
    pub fn resolve(&self, flags: &ConnectionArgs) -> Result<EffectiveConfig, CliError> {
        let path = self.config_path(flags.config.as_deref());
        let file = FileConfig::load(&path);
        self.merge(flags, &file)
    }

    /// Merge already-loaded sources, field by field. A file value is only
    /// read, and checked, when no flag or environment value supplies it.
    pub fn merge(&self, flags: &ConnectionArgs, file: &FileConfig) -> Result<EffectiveConfig, CliError> {
        let base_url = first_present(
            flag(flags.dealer_url.as_deref()),
            self.env_value(ENV_URL),
            || file.base_url(),
        )?
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = EffectiveConfig {
            base_url,
            username: first_present(
                flag(flags.username.as_deref()),
                self.env_value(ENV_USERNAME),
                || file.credential(KEY_USERNAME),
            )?,
            password: first_present(
                flag(flags.password.as_deref()),
                self.env_value(ENV_PASSWORD),
                || file.credential(KEY_PASSWORD),
            )?,
            token: first_present(
                flag(flags.token.as_deref()),
                self.env_value(ENV_TOKEN),
                || file.credential(KEY_TOKEN),
            )?,
            // An explicit `false` anywhere is indistinguishable from unset.
            insecure: flags.insecure
                || self.env.get(ENV_INSECURE).is_some_and(parse_bool)
                || file.insecure(),
        };

        debug!(?config, "resolved configuration");
        Ok(config)
    }

    fn env_value(&self, key: &str) -> Option<String> {
        self.env.get(key).map(str::to_string)
    }
}

/// Truthy spellings accepted for boolean environment and file values.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn flag(value: Option<&str>) -> Option<String> {
    value.and_then(non_empty)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn first_present(
    flag: Option<String>,
    env: Option<String>,
    file: impl FnOnce() -> Result<Option<String>, CliError>,
) -> Result<Option<String>, CliError> {
    match flag.or(env) {
        Some(value) => Ok(Some(value)),
        None => file(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use test_case::test_case;

    use super::*;

    #[derive(Clone, Copy, Debug)]
    enum Field {
        BaseUrl,
        Username,
        Password,
        Token,
    }

    impl Field {
        const fn env_key(self) -> &'static str {
            match self {
                Self::BaseUrl => ENV_URL,
                Self::Username => ENV_USERNAME,
                Self::Password => ENV_PASSWORD,
                Self::Token => ENV_TOKEN,
            }
        }

        const fn file_key(self) -> &'static str {
            match self {
                Self::BaseUrl => KEY_BASE_URL,
                Self::Username => KEY_USERNAME,
                Self::Password => KEY_PASSWORD,
                Self::Token => KEY_TOKEN,
            }
        }

        fn set_flag(self, flags: &mut ConnectionArgs, value: &str) {
            let slot = match self {
                Self::BaseUrl => &mut flags.dealer_url,
                Self::Username => &mut flags.username,
                Self::Password => &mut flags.password,
                Self::Token => &mut flags.token,
            };
            *slot = Some(value.to_string());
        }

        fn read(self, config: &EffectiveConfig) -> Option<String> {
            match self {
                Self::BaseUrl => Some(config.base_url.clone()),
                Self::Username => config.username.clone(),
                Self::Password => config.password.clone(),
                Self::Token => config.token.clone(),
            }
        }

        fn default_value(self) -> Option<String> {
            match self {
                Self::BaseUrl => Some(DEFAULT_BASE_URL.to_string()),
                _ => None,
            }
        }
    }

    // Every presence combination of (flag, env, file) for one field.
    #[test_case(Field::BaseUrl ; "base url")]
    #[test_case(Field::Username ; "username")]
    #[test_case(Field::Password ; "password")]
    #[test_case(Field::Token ; "token")]
    fn precedence_flag_env_file_default(field: Field) {
        for mask in 0u8..8 {
            let (has_flag, has_env, has_file) = (mask & 1 != 0, mask & 2 != 0, mask & 4 != 0);

            let mut flags = ConnectionArgs::default();
            if has_flag {
                field.set_flag(&mut flags, "http://from-flag");
            }
            let env: EnvVars = if has_env {
                [(field.env_key(), "http://from-env")].into_iter().collect()
            } else {
                EnvVars::default()
            };
            let file = if has_file {
                FileConfig::parse(&format!("{}: http://from-file\n", field.file_key()))
                    .expect("yaml")
            } else {
                FileConfig::default()
            };

            let config = ConfigResolver::new(&env).merge(&flags, &file).expect("merge");
            let expected = if has_flag {
                Some("http://from-flag".to_string())
            } else if has_env {
                Some("http://from-env".to_string())
            } else if has_file {
                Some("http://from-file".to_string())
            } else {
                field.default_value()
            };
            assert_eq!(field.read(&config), expected, "{field:?} mask={mask:03b}");
        }
    }

    #[test]
    fn fields_resolve_independently() {
        let flags = ConnectionArgs {
            username: Some("flag-user".into()),
            ..ConnectionArgs::default()
        };
        let env: EnvVars = [(ENV_PASSWORD, "env-pass")].into_iter().collect();
        let file = FileConfig::parse("base_url: http://file/api\ntoken: file-token\n").expect("yaml");

        let config = ConfigResolver::new(&env).merge(&flags, &file).expect("merge");
        assert_eq!(config.base_url, "http://file/api");
        assert_eq!(config.username.as_deref(), Some("flag-user"));
        assert_eq!(config.password.as_deref(), Some("env-pass"));
        assert_eq!(config.token.as_deref(), Some("file-token"));
    }

    #[test]
    fn empty_flag_and_env_fall_through() {
        let flags = ConnectionArgs {
            token: Some(String::new()),
            ..ConnectionArgs::default()
        };
        let env: EnvVars = [(ENV_TOKEN, "")].into_iter().collect();
        let file = FileConfig::parse("token: from-file").expect("yaml");

        let config = ConfigResolver::new(&env).merge(&flags, &file).expect("merge");
        assert_eq!(config.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn non_string_base_url_is_invalid_parameter() {
        let file = FileConfig::parse("base_url: [1, 2]").expect("yaml");
        let env = EnvVars::default();
        let err = ConfigResolver::new(&env)
            .merge(&ConnectionArgs::default(), &file)
            .expect_err("list is not a url");
        assert!(matches!(err, CliError::InvalidParameter(_)));
    }

    #[test]
    fn stronger_sources_skip_bad_file_values() {
        let file = FileConfig::parse("token: [a, b]\nbase_url: 7\n").expect("yaml");
        let flags = ConnectionArgs {
            dealer_url: Some("http://flag/api".into()),
            token: Some("flag-tok".into()),
            ..ConnectionArgs::default()
        };
        let env = EnvVars::default();
        let config = ConfigResolver::new(&env).merge(&flags, &file).expect("merge");
        assert_eq!(config.base_url, "http://flag/api");
        assert_eq!(config.token.as_deref(), Some("flag-tok"));

        let env: EnvVars = [(ENV_URL, "http://env/api"), (ENV_TOKEN, "env-tok")]
            .into_iter()
            .collect();
        let config = ConfigResolver::new(&env)
            .merge(&ConnectionArgs::default(), &file)
            .expect("merge");
        assert_eq!(config.base_url, "http://env/api");
        assert_eq!(config.token.as_deref(), Some("env-tok"));
    }

    #[test]
    fn bad_file_credential_fails_when_selected() {
        let file = FileConfig::parse("token: [a, b]\n").expect("yaml");
        let env = EnvVars::default();
        let err = ConfigResolver::new(&env)
            .merge(&ConnectionArgs::default(), &file)
            .expect_err("list is not a token");
        assert!(matches!(err, CliError::InvalidParameter(_)));
    }

    #[test]
    fn numeric_password_is_read_as_string() {
        let file = FileConfig::parse("username: alice\npassword: 123456\n").expect("yaml");
        let env = EnvVars::default();
        let config = ConfigResolver::new(&env)
            .merge(&ConnectionArgs::default(), &file)
            .expect("merge");
        assert_eq!(config.password.as_deref(), Some("123456"));
        assert_eq!(
            config.credentials(),
            Credentials::Password {
                username: "alice".into(),
                password: "123456".into(),
            }
        );
    }

    #[test]
    fn insecure_true_from_any_source() {
        let none = EnvVars::default();
        let resolver = ConfigResolver::new(&none);
        let off = resolver
            .merge(&ConnectionArgs::default(), &FileConfig::default())
            .expect("merge");
        assert!(!off.insecure);

        let flags = ConnectionArgs {
            insecure: true,
            ..ConnectionArgs::default()
        };
        assert!(resolver.merge(&flags, &FileConfig::default()).expect("merge").insecure);

        let env: EnvVars = [(ENV_INSECURE, "TRUE")].into_iter().collect();
        assert!(
            ConfigResolver::new(&env)
                .merge(&ConnectionArgs::default(), &FileConfig::default())
                .expect("merge")
                .insecure
        );

        let file = FileConfig::parse("insecure: true").expect("yaml");
        assert!(resolver.merge(&ConnectionArgs::default(), &file).expect("merge").insecure);
    }

    #[test]
    fn explicit_false_does_not_override_weaker_true() {
        let env: EnvVars = [(ENV_INSECURE, "false")].into_iter().collect();
        let file = FileConfig::parse("insecure: true").expect("yaml");
        let config = ConfigResolver::new(&env)
            .merge(&ConnectionArgs::default(), &file)
            .expect("merge");
        assert!(config.insecure);
    }

    #[test_case("1", true)]
    #[test_case("yes", true)]
    #[test_case("On", true)]
    #[test_case("0", false)]
    #[test_case("false", false)]
    #[test_case("maybe", false)]
    fn bool_spellings(input: &str, expected: bool) {
        assert_eq!(parse_bool(input), expected);
    }

    #[test]
    fn config_path_precedence() {
        let env: EnvVars = [(ENV_CONFIG, "/etc/dealer/config")].into_iter().collect();
        let resolver = ConfigResolver::new(&env);
        assert_eq!(
            resolver.config_path(Some(Path::new("/tmp/explicit"))),
            PathBuf::from("/tmp/explicit")
        );
        assert_eq!(resolver.config_path(None), PathBuf::from("/etc/dealer/config"));

        let empty = EnvVars::default();
        let default = ConfigResolver::new(&empty).config_path(None);
        assert!(default.ends_with(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        assert!(FileConfig::parse("").expect("empty").is_empty());
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(matches!(
            FileConfig::parse("just a string"),
            Err(ConfigFileError::NotMapping)
        ));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn malformed_file_warns_and_yields_empty_mapping() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"base_url: [unclosed\n  : :").expect("write");

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let (first, second) = tracing::subscriber::with_default(subscriber, || {
            (FileConfig::load(file.path()), FileConfig::load(file.path()))
        });

        assert!(first.is_empty());
        assert_eq!(first, second);

        let logs = String::from_utf8(capture.0.lock().expect("lock").clone()).expect("utf8");
        assert_eq!(logs.matches("can't parse config").count(), 2);
        assert!(logs.contains("WARN"));
    }

    #[test]
    fn missing_file_yields_empty_mapping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = FileConfig::load(&dir.path().join("absent"));
        assert!(config.is_empty());
    }

    #[test]
    fn resolve_reads_file_named_by_flag() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"base_url: http://cfg/api\ntoken: abc\n").expect("write");

        let flags = ConnectionArgs {
            config: Some(file.path().to_path_buf()),
            ..ConnectionArgs::default()
        };
        let env = EnvVars::default();
        let config = ConfigResolver::new(&env).resolve(&flags).expect("resolve");
        assert_eq!(config.base_url, "http://cfg/api");
        assert_eq!(config.credentials(), Credentials::Token("abc".into()));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = EffectiveConfig {
            base_url: DEFAULT_BASE_URL.into(),
            username: Some("alice".into()),
            password: Some("hunter2".into()),
            token: Some("tok-secret".into()),
            insecure: false,
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("tok-secret"));
    }
}
