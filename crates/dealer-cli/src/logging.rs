//! Process logging context.
//!
//! Built once from the global verbosity flags and attached to the shell's
//! future, so nothing installs a process-wide default subscriber.

use std::io;

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging configuration for one run.
#[derive(Debug, Clone)]
pub struct LogContext {
    level: LevelFilter,
    debug: bool,
    dispatch: Dispatch,
}

impl LogContext {
    /// Build the context from `--debug` and the effective verbosity.
    /// `RUST_LOG`, when set, overrides the computed filter.
    pub fn new(verbosity: u8, debug: bool) -> Self {
        let level = level_for(verbosity, debug);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directives(level, verbosity, debug)));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(debug)
            .finish();

        Self {
            level,
            debug,
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Maximum level emitted by the application.
    pub const fn level(&self) -> LevelFilter {
        self.level
    }

    /// Whether full error details were requested.
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Dispatcher to attach to the run's future.
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

/// Verbosity 0 shows errors only; 1 (the default) adds warnings; each
/// further step opens one level. `--debug` always reaches DEBUG.
pub fn level_for(verbosity: u8, debug: bool) -> LevelFilter {
    let level = match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if debug { level.max(LevelFilter::DEBUG) } else { level }
}

fn directives(level: LevelFilter, verbosity: u8, debug: bool) -> String {
    // The HTTP stack is noisy; keep it quiet until explicitly asked for.
    if verbosity >= 3 || debug {
        level.to_string()
    } else {
        format!("{level},hyper=warn,hyper_util=warn,reqwest=warn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_verbosity_is_warn() {
        assert_eq!(level_for(1, false), LevelFilter::WARN);
    }

    #[test]
    fn quiet_is_error_only() {
        assert_eq!(level_for(0, false), LevelFilter::ERROR);
    }

    #[test]
    fn verbose_steps_up() {
        assert_eq!(level_for(2, false), LevelFilter::INFO);
        assert_eq!(level_for(3, false), LevelFilter::DEBUG);
        assert_eq!(level_for(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn debug_flag_reaches_debug() {
        assert_eq!(level_for(0, true), LevelFilter::DEBUG);
        assert_eq!(level_for(4, true), LevelFilter::TRACE);
    }

    #[test]
    fn http_stack_filtered_below_debug() {
        assert_eq!(
            directives(LevelFilter::WARN, 1, false),
            "warn,hyper=warn,hyper_util=warn,reqwest=warn"
        );
        assert_eq!(directives(LevelFilter::DEBUG, 3, false), "debug");
    }

    #[test]
    fn context_keeps_debug_switch() {
        let ctx = LogContext::new(1, true);
        assert!(ctx.debug());
        assert_eq!(ctx.level(), LevelFilter::DEBUG);
    }
}
