//! Capture session configuration.
//!
//! Defaults reproduce the classic xterm + xdotool + ImageMagick setup. A JSON
//! profile can override any subset of fields; CLI flags are layered on top by
//! `cli::Cli::apply_to`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TermshotError};
use crate::tools::input::InputMode;

/// Visual parameters and program for the terminal emulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub program: String,
    pub background: String,
    pub border: u32,
    pub scrollback: u32,
    pub font: String,
    pub bold_font: String,
    /// Let xterm accept synthetic events from `xdotool ... --window <id>`
    pub allow_send_events: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            program: "xterm".to_string(),
            background: "gray90".to_string(),
            border: 0,
            scrollback: 0,
            font: "7x13".to_string(),
            bold_font: "7x13bold".to_string(),
            allow_send_events: true,
        }
    }
}

/// Programs used for window search/input injection and for capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPrograms {
    /// Window search and input injection (xdotool-compatible)
    pub window_tool: String,
    /// Window capture (`import -window <id> <file>` compatible)
    pub capture_tool: String,
}

impl Default for ToolPrograms {
    fn default() -> Self {
        Self {
            window_tool: "xdotool".to_string(),
            capture_tool: "import".to_string(),
        }
    }
}

/// All delays, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub window_timeout_ms: u64,
    pub settle_ms: u64,
    pub terminate_grace_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            window_timeout_ms: 10_000,
            settle_ms: 1_000,
            terminate_grace_ms: 2_000,
        }
    }
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn window_timeout(&self) -> Duration {
        Duration::from_millis(self.window_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }
}

/// Complete configuration for one capture session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub terminal: TerminalConfig,
    pub tools: ToolPrograms,
    pub timing: TimingConfig,
    /// Interpreter the terminal runs the script with
    pub interpreter: String,
    pub input_mode: InputMode,
    /// Directory for images; `None` keeps them next to the script path
    pub output_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            terminal: TerminalConfig::default(),
            tools: ToolPrograms::default(),
            timing: TimingConfig::default(),
            interpreter: "python3".to_string(),
            input_mode: InputMode::default(),
            output_dir: None,
        }
    }
}

impl CaptureConfig {
    /// Load a profile from a JSON file; missing fields take defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TermshotError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            TermshotError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save the effective configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let programs = [
            ("terminal.program", &self.terminal.program),
            ("tools.window_tool", &self.tools.window_tool),
            ("tools.capture_tool", &self.tools.capture_tool),
            ("interpreter", &self.interpreter),
        ];
        for (field, value) in programs {
            if value.trim().is_empty() {
                return Err(TermshotError::config(format!("{} must not be empty", field)));
            }
        }

        if self.timing.poll_interval_ms == 0 {
            return Err(TermshotError::config("poll interval must be positive"));
        }
        if self.timing.poll_interval_ms > self.timing.window_timeout_ms {
            return Err(TermshotError::config(format!(
                "poll interval ({}ms) exceeds window timeout ({}ms)",
                self.timing.poll_interval_ms, self.timing.window_timeout_ms
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.timing.settle(), Duration::from_secs(1));
        assert_eq!(config.interpreter, "python3");
    }

    #[test]
    fn test_partial_profile_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"interpreter": "python2", "timing": {{"settle_ms": 250}}, "input_mode": "literal"}}"#
        )
        .unwrap();

        let config = CaptureConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.interpreter, "python2");
        assert_eq!(config.timing.settle_ms, 250);
        assert_eq!(config.timing.poll_interval_ms, 100);
        assert_eq!(config.input_mode, InputMode::Literal);
        assert_eq!(config.terminal, TerminalConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let mut config = CaptureConfig::default();
        config.terminal.background = "black".to_string();
        config.output_dir = Some(PathBuf::from("shots"));
        config.save_to_file(&path).unwrap();

        let loaded = CaptureConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = CaptureConfig::load_from_file("/nonexistent/profile.json").unwrap_err();
        assert!(matches!(err, TermshotError::Config(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(CaptureConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_poll_interval() {
        let mut config = CaptureConfig::default();
        config.timing.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_poll_longer_than_timeout() {
        let mut config = CaptureConfig::default();
        config.timing.poll_interval_ms = 500;
        config.timing.window_timeout_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_program() {
        let mut config = CaptureConfig::default();
        config.tools.capture_tool = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tools.capture_tool"));
    }
}
