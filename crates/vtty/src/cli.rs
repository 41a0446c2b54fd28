//! vtty command-line interface

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::{ExitCode, Stdio};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::fs::File;
use tokio::process::Command;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use vtty_terminal::{Channel, TerminalConfig, VirtualTerminal};

use crate::capture::pump;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render program output the way a fixed-size terminal would show it"
)]
pub struct Args {
    #[command(flatten)]
    pub terminal: TerminalConfig,

    /// Drop trailing blanks and trailing empty rows from the snapshot
    #[arg(long)]
    pub trim: bool,

    /// Draw a border around the snapshot
    #[arg(long)]
    pub frame: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay captured output files
    Replay {
        /// File fed to the primary channel (stdin if omitted)
        #[arg(long)]
        stdout: Option<PathBuf>,

        /// File fed to the secondary channel after the primary one
        #[arg(long)]
        stderr: Option<PathBuf>,
    },

    /// Run a command and render what it prints
    Run {
        /// Program to run
        program: String,

        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Parse the process arguments and execute
pub async fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.log_level);
    execute(args, &mut io::stdout()).await
}

fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Execute parsed arguments, writing the snapshot to `out`
pub async fn execute<W: io::Write>(args: Args, out: &mut W) -> Result<ExitCode> {
    let terminal = VirtualTerminal::with_config(args.terminal)
        .context("Invalid terminal configuration")?;

    let code = match &args.command {
        Commands::Replay { stdout, stderr } => {
            replay(&terminal, stdout.as_deref(), stderr.as_deref()).await?;
            ExitCode::SUCCESS
        }
        Commands::Run { program, args: argv } => run_command(&terminal, program, argv).await?,
    };

    writeln!(out, "{}", format_snapshot(&terminal, args.trim, args.frame))
        .context("Failed to write snapshot")?;
    Ok(code)
}

/// Snapshot text in the requested output form. A frame always shows the
/// full grid, so `trim` only applies to unframed output.
pub fn format_snapshot(terminal: &VirtualTerminal, trim: bool, frame: bool) -> String {
    if frame {
        terminal.capture().framed()
    } else if trim {
        terminal.trimmed_snapshot()
    } else {
        terminal.snapshot()
    }
}

async fn replay(
    terminal: &VirtualTerminal,
    stdout: Option<&Path>,
    stderr: Option<&Path>,
) -> Result<()> {
    match stdout {
        Some(path) => {
            let file = open(path).await?;
            pump(file, terminal.clone(), Channel::Primary).await?;
        }
        None => {
            if io::stdin().is_terminal() {
                warn!("reading primary channel from an interactive terminal");
            }
            pump(tokio::io::stdin(), terminal.clone(), Channel::Primary).await?;
        }
    }

    if let Some(path) = stderr {
        let file = open(path).await?;
        pump(file, terminal.clone(), Channel::Secondary).await?;
    }

    Ok(())
}

async fn open(path: &Path) -> Result<File> {
    File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))
}

async fn run_command(terminal: &VirtualTerminal, program: &str, args: &[String]) -> Result<ExitCode> {
    info!(program, ?args, "spawning command");

    let mut child = Command::new(program)
        .args(args)
        .env("COLUMNS", terminal.width().to_string())
        .env("LINES", terminal.height().to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to spawn {program}"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to get stdout from {program}"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to get stderr from {program}"))?;

    let primary = tokio::spawn(pump(stdout, terminal.clone(), Channel::Primary));
    let secondary = tokio::spawn(pump(stderr, terminal.clone(), Channel::Secondary));

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for {program}"))?;
    let primary_bytes = primary.await.context("Primary reader task failed")??;
    let secondary_bytes = secondary.await.context("Secondary reader task failed")??;

    debug!(%status, primary_bytes, secondary_bytes, "command finished");
    if !status.success() {
        warn!(%status, "command exited unsuccessfully");
    }

    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("vtty").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["replay"]);
        assert_eq!(args.terminal, TerminalConfig::default());
        assert!(!args.trim);
        assert!(!args.frame);
        assert_eq!(args.log_level, LogLevel::Warn);
        assert!(matches!(
            args.command,
            Commands::Replay {
                stdout: None,
                stderr: None
            }
        ));
    }

    #[test]
    fn terminal_flags() {
        let args = parse(&["--width", "40", "--height", "2", "--tab-width", "4", "--trim", "replay"]);
        assert_eq!(args.terminal, TerminalConfig::new(40, 2).with_tab_width(4));
        assert!(args.trim);
    }

    #[test]
    fn run_keeps_hyphenated_arguments() {
        let args = parse(&["run", "--", "ls", "-la", "--color=never"]);
        match args.command {
            Commands::Run { program, args } => {
                assert_eq!(program, "ls");
                assert_eq!(args, ["-la", "--color=never"]);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn output_forms() {
        let terminal = VirtualTerminal::new(4, 2).unwrap();
        terminal.write_primary("ab").unwrap();

        assert_eq!(format_snapshot(&terminal, false, false), "ab  \n    ");
        assert_eq!(format_snapshot(&terminal, true, false), "ab");
        assert_eq!(
            format_snapshot(&terminal, false, true),
            "+----+\n|ab  |\n|    |\n+----+"
        );
    }
}
