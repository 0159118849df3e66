use clap::Parser;
use std::path::PathBuf;

use crate::config::CaptureConfig;
use crate::tools::input::InputMode;

/// termshot - screenshot a script running in a terminal, one image per input line
///
/// Reads injection steps from standard input. Each line is sent to the
/// terminal window, then the window is captured to `<script-base><n>.png`.
#[derive(Parser, Debug)]
#[command(name = "termshot")]
#[command(version)]
pub struct Cli {
    /// Script to run inside the terminal
    pub script: PathBuf,

    /// JSON profile with terminal, tool and timing settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to this file before running
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Interpreter the terminal runs the script with
    #[arg(short, long)]
    pub interpreter: Option<String>,

    /// How input lines are interpreted (commands, literal)
    #[arg(short, long)]
    pub mode: Option<InputMode>,

    /// Directory to write images into (default: next to the script)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Delay between injecting a line and capturing, in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Interval between window searches, in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Give up on the window after this many milliseconds
    #[arg(long)]
    pub window_timeout_ms: Option<u64>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Layer explicitly given flags over `config`
    pub fn apply_to(&self, config: &mut CaptureConfig) {
        if let Some(interpreter) = &self.interpreter {
            config.interpreter = interpreter.clone();
        }
        if let Some(mode) = self.mode {
            config.input_mode = mode;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(ms) = self.settle_ms {
            config.timing.settle_ms = ms;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.timing.poll_interval_ms = ms;
        }
        if let Some(ms) = self.window_timeout_ms {
            config.timing.window_timeout_ms = ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::try_parse_from(["termshot", "tour.py"]).unwrap();
        assert_eq!(cli.script, PathBuf::from("tour.py"));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);

        let mut config = CaptureConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config, CaptureConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "termshot",
            "--mode",
            "literal",
            "--interpreter",
            "bash",
            "--settle-ms",
            "250",
            "--window-timeout-ms",
            "3000",
            "-o",
            "shots",
            "demo.sh",
        ])
        .unwrap();

        let mut config = CaptureConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.input_mode, InputMode::Literal);
        assert_eq!(config.interpreter, "bash");
        assert_eq!(config.timing.settle_ms, 250);
        assert_eq!(config.timing.window_timeout_ms, 3000);
        assert_eq!(config.timing.poll_interval_ms, 100);
        assert_eq!(config.output_dir, Some(PathBuf::from("shots")));
    }

    #[test]
    fn test_script_is_required() {
        assert!(Cli::try_parse_from(["termshot"]).is_err());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(Cli::try_parse_from(["termshot", "--mode", "keys", "x.py"]).is_err());
    }
}
