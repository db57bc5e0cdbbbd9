//! Calltrack CLI - terminal client for the call and notification dashboard

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "calltrack")]
#[command(about = "Browse call logs and notifications from the Calltrack dashboard")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Data directory for the persisted session and logs
    #[arg(short = 'd', long, global = true, env = "CALLTRACK_STATE_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long, global = true, env = "CALLTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref(), cli.data_dir.clone())?;
    logging::init_logging(cli.log_level.into(), &config.data_dir, cli.no_file_log)?;

    info!(api_url = %config.api_url, "starting calltrack");

    let run = cli.command.execute(config);
    let outcome = if cli.timeout == 0 {
        run.await
    } else {
        match tokio::time::timeout(Duration::from_secs(cli.timeout), run).await {
            Ok(result) => result,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_defaults_to_one() {
        let cli = Cli::try_parse_from(["calltrack", "call-logs"]).unwrap();
        assert!(matches!(cli.command, Commands::CallLogs { pages: 1 }));

        let cli = Cli::try_parse_from(["calltrack", "notifications", "--pages", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Notifications { pages: 3 }));
    }

    #[test]
    fn test_zero_pages_is_rejected() {
        for feed in ["call-logs", "notifications"] {
            assert!(Cli::try_parse_from(["calltrack", feed, "--pages", "0"]).is_err());
        }
    }

    #[test]
    fn test_icon_parses_without_session_flags() {
        let cli = Cli::try_parse_from(["calltrack", "icon", "com.whatsapp"]).unwrap();
        assert!(matches!(cli.command, Commands::Icon { ref app_id } if app_id == "com.whatsapp"));
    }
}
