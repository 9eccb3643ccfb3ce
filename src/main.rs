use anyhow::Context;
use clap::Parser;
use parking_lot_cli::domain::ports::ConfigProvider;
use parking_lot_cli::utils::{logger, monitor::SystemMonitor, validation::Validate};
use parking_lot_cli::{CliConfig, ParkingError, Session, SessionReport, TomlConfig};
use std::io::BufRead;

fn load_config() -> anyhow::Result<CliConfig> {
    let mut config = CliConfig::parse();
    if let Some(path) = config.config.clone() {
        let file = TomlConfig::from_file(&path)
            .with_context(|| format!("failed to load settings file '{}'", path))?;
        file.validate()
            .with_context(|| format!("invalid settings in '{}'", path))?;
        config.apply_file(&file);
    }
    config.validate().context("invalid command line")?;
    Ok(config)
}

async fn run(config: &CliConfig) -> Result<SessionReport, ParkingError> {
    let stdout = std::io::stdout();
    let mut session = Session::from_config(stdout.lock(), config);

    match config.input_file() {
        Some(path) => {
            tracing::info!(input = path, "running batch file");
            let file = std::fs::File::open(path)?;
            session.run_batch(std::io::BufReader::new(file).lines())
        }
        None => {
            tracing::info!("starting interactive session");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session.run_interactive(stdin).await
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(2);
        }
    };

    logger::init_cli_logger(config.verbose, config.log_level.as_deref(), config.json_logs);
    tracing::debug!("CLI config: {:?}", config);

    let mut monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }
    monitor.log_phase("start");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(run(&config));
    // stdin is read on a blocking thread that may never return
    runtime.shutdown_background();
    monitor.log_phase("finish");

    match outcome {
        Ok(report) => {
            tracing::info!(
                executed = report.executed,
                skipped = report.skipped,
                timed_out = report.timed_out,
                "session finished"
            );
        }
        Err(e) => {
            tracing::error!(
                "session aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
