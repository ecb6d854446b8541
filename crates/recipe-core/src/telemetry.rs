//! Tracing initialisation for `jiri-recipe`.
//!
//! All log output goes to stderr: stdout carries only the JSON run report or
//! plan, so it can be piped straight into other tools. In JSON mode every
//! line carries the fields of the enclosing `recipe.run` span (the `run_id`),
//! so the lines of one run can be grouped after the fact.
//!
//! Call [`init_tracing`] once at program start. Later calls are ignored
//! (the global subscriber can only be set once per process).

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json`: emit newline-delimited JSON log lines.
/// * `level`: default verbosity when `RUST_LOG` is not set.
pub fn init_tracing(json: bool, level: Level) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(directives.as_deref(), level);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

/// Filter from `RUST_LOG`-style directives, falling back to `level` when
/// they are absent or do not parse.
fn build_filter(directives: Option<&str>, level: Level) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_level() {
        let filter = build_filter(None, Level::DEBUG);
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_filter_uses_directives() {
        let filter = build_filter(Some("recipe_tools=trace"), Level::INFO);
        assert_eq!(filter.to_string(), "recipe_tools=trace");
    }

    #[test]
    fn test_filter_ignores_bad_directives() {
        let filter = build_filter(Some("recipe_tools=loud"), Level::WARN);
        assert_eq!(filter.to_string(), "warn");
    }
}
