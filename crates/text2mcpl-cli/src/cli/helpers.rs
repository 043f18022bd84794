use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

const LOG_TARGETS: [&str; 2] = ["text2mcpl_core", "text2mcpl_cli"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Verbosity {
    Quiet,
    Default,
    Debug,
    Trace,
}

impl Verbosity {
    fn level(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Default => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

pub(super) fn filter_directives(verbosity: Verbosity) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, verbosity.level()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Logs go to stderr; stdout is reserved for the run summary. `RUST_LOG`
/// wins unless a verbosity flag was given.
pub(super) fn init_logging(verbosity: Verbosity) {
    let filter = match verbosity {
        Verbosity::Default => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity))),
        _ => EnvFilter::new(filter_directives(verbosity)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::{Verbosity, filter_directives};

    #[test]
    fn directives_cover_both_crates() {
        assert_eq!(
            filter_directives(Verbosity::Debug),
            "text2mcpl_core=debug,text2mcpl_cli=debug"
        );
        assert_eq!(
            filter_directives(Verbosity::Quiet),
            "text2mcpl_core=warn,text2mcpl_cli=warn"
        );
    }
}
