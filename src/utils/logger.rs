use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Library and binary log under different targets, so both are named.
const TARGETS: [&str; 2] = ["parking_lot_cli", "parking_lot"];

fn fallback_directives(verbose: bool, level: Option<&str>) -> String {
    let level = match (verbose, level) {
        (true, _) => "debug",
        (false, Some(level)) => level,
        (false, None) => "info",
    };
    let mut directives: Vec<String> = TARGETS.iter().map(|t| format!("{t}={level}")).collect();
    if verbose {
        directives.push("info".to_string());
    }
    directives.join(",")
}

fn filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directives(verbose, level)))
}

/// Logs go to stderr so they never interleave with command output on stdout.
pub fn init_cli_logger(verbose: bool, level: Option<&str>, json: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbose, level));

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_covers_binary_target() {
        assert_eq!(
            fallback_directives(false, None),
            "parking_lot_cli=info,parking_lot=info"
        );
        assert_eq!(
            fallback_directives(false, Some("warn")),
            "parking_lot_cli=warn,parking_lot=warn"
        );
    }

    #[test]
    fn test_verbose_wins_over_level() {
        assert_eq!(
            fallback_directives(true, Some("error")),
            "parking_lot_cli=debug,parking_lot=debug,info"
        );
    }

    #[test]
    fn test_fallback_parses_as_filter() {
        for (verbose, level) in [(false, None), (false, Some("trace")), (true, None)] {
            let directives = fallback_directives(verbose, level);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }
}
