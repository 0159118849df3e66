//! Type-safe arguments for the terminal emulator.
//!
//! # Field to Flag Mapping (xterm)
//!
//! | Rust Field    | CLI Flag  |
//! |---------------|-----------|
//! | `background`  | `-bg`     |
//! | `border`      | `-b`      |
//! | `scrollback`  | `-sl`     |
//! | `font`        | `-fn`     |
//! | `bold_font`   | `-fb`     |
//! | `allow_send_events` | `-xrm 'XTerm*allowSendEvents: true'` |
//! | `class`       | `-class`  |
//! | `interpreter` + `script` | `-e` (must be last) |

use std::path::PathBuf;

use crate::class_tag::ClassTag;
use crate::config::TerminalConfig;
use crate::tool_traits::ToolArgs;

#[derive(Debug, Clone)]
pub struct TerminalArgs {
    pub style: TerminalConfig,
    pub class: ClassTag,
    pub interpreter: String,
    pub script: PathBuf,
}

impl ToolArgs for TerminalArgs {
    fn program(&self) -> &str {
        &self.style.program
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "-bg".to_string(),
            self.style.background.clone(),
            "-b".to_string(),
            self.style.border.to_string(),
            "-sl".to_string(),
            self.style.scrollback.to_string(),
            "-fn".to_string(),
            self.style.font.clone(),
            "-fb".to_string(),
            self.style.bold_font.clone(),
        ];

        if self.style.allow_send_events {
            args.push("-xrm".to_string());
            args.push("XTerm*allowSendEvents: true".to_string());
        }

        args.extend([
            "-class".to_string(),
            self.class.to_string(),
            // -e swallows everything after it
            "-e".to_string(),
            self.interpreter.clone(),
            self.script.to_string_lossy().to_string(),
        ]);
        args
    }

    fn tool_name(&self) -> &'static str {
        "terminal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_args_default_style() {
        let args = TerminalArgs {
            style: TerminalConfig::default(),
            class: ClassTag::from_bytes(b"termsh").unwrap(),
            interpreter: "python3".to_string(),
            script: PathBuf::from("docs/tour.py"),
        };

        assert_eq!(args.program(), "xterm");
        assert_eq!(
            args.to_cli_args(),
            vec![
                "-bg", "gray90", "-b", "0", "-sl", "0", "-fn", "7x13", "-fb", "7x13bold",
                "-xrm", "XTerm*allowSendEvents: true",
                "-class", "dGVybXNo", "-e", "python3", "docs/tour.py",
            ]
        );
    }

    #[test]
    fn test_send_events_can_be_left_off() {
        let args = TerminalArgs {
            style: TerminalConfig {
                allow_send_events: false,
                ..TerminalConfig::default()
            },
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
            interpreter: "python3".to_string(),
            script: PathBuf::from("demo.py"),
        };

        let cli = args.to_cli_args();
        assert!(!cli.iter().any(|a| a == "-xrm"));
        assert_eq!(&cli[10..12], ["-class", "YWJjZGVm"]);
    }

    #[test]
    fn test_exec_directive_is_last() {
        let args = TerminalArgs {
            style: TerminalConfig {
                background: "black".to_string(),
                scrollback: 500,
                ..TerminalConfig::default()
            },
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
            interpreter: "bash".to_string(),
            script: PathBuf::from("demo.sh"),
        };

        let cli = args.to_cli_args();
        let e = cli.iter().position(|a| a == "-e").unwrap();
        assert_eq!(&cli[e + 1..], ["bash", "demo.sh"]);
        assert!(cli.windows(2).any(|w| w == ["-sl", "500"]));
        assert!(cli.windows(2).any(|w| w == ["-bg", "black"]));
    }
}
