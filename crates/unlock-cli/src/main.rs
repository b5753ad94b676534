//! miunlock - resumable bootloader unlock from the command line.

mod commands;
mod console;
mod output;

use clap::{Parser, Subcommand};
use commands::AppContext;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use unlock_config_and_utils::{init_logging, Config, Paths};

/// Unlock a phone bootloader, resuming from wherever the last run stopped.
#[derive(Parser)]
#[command(name = "miunlock")]
#[command(about = "Resumable bootloader unlock tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory holding config, session record and logs
    #[arg(long, env = "MIUNLOCK_HOME", global = true)]
    base_dir: Option<PathBuf>,

    /// Path to the fastboot executable
    #[arg(long, global = true)]
    fastboot: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run the unlock workflow (default)
    Unlock,
    /// Query the connected device and print what it reports
    Device,
    /// Show the stored session
    Status,
    /// Delete the stored session
    Forget,
}

fn build_context(cli: &Cli) -> anyhow::Result<AppContext> {
    let paths = match &cli.base_dir {
        Some(dir) => Paths::with_base_dir(dir.clone()),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;
    Ok(AppContext::new(paths, config, cli.fastboot.clone()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match build_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::print_error(&format!("{:#}", e), &cli.format);
            return ExitCode::FAILURE;
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| ctx.config.log_level.clone());
    init_logging(&level, &ctx.paths);
    debug!(base_dir = %ctx.paths.base_dir().display(), "miunlock starting");

    let command = cli.command.unwrap_or(Commands::Unlock);
    let result = match command {
        Commands::Unlock => commands::unlock(&ctx, &cli.format).await,
        Commands::Device => commands::device(&ctx, &cli.format).await,
        Commands::Status => commands::status(&ctx, &cli.format),
        Commands::Forget => commands::forget(&ctx, &cli.format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e), &cli.format);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_unlock() {
        let cli = Cli::try_parse_from(["miunlock"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.format, output::OutputFormat::Text);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "miunlock",
            "device",
            "--format",
            "json",
            "--fastboot",
            "/opt/platform-tools/fastboot",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Device));
        assert_eq!(cli.format, output::OutputFormat::Json);
        assert_eq!(cli.fastboot.as_deref(), Some("/opt/platform-tools/fastboot"));
    }

    #[test]
    fn base_dir_builds_context_from_defaults() {
        let cli = Cli::try_parse_from(["miunlock", "--base-dir", "/nonexistent/miunlock", "status"])
            .unwrap();
        let ctx = build_context(&cli).unwrap();
        assert_eq!(
            ctx.paths.session_file(),
            PathBuf::from("/nonexistent/miunlock/miunlockdata.json")
        );
    }
}
