//! Window lookup by class name, with bounded polling.

use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::class_tag::ClassTag;
use crate::error::{Result, TermshotError};
use crate::tool_runner::run_tool;
use crate::tool_traits::ToolArgs;

/// Opaque window handle as printed by the window tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `xdotool search --classname <tag>`
#[derive(Debug, Clone)]
pub struct WindowSearchArgs {
    pub program: String,
    pub class: ClassTag,
}

impl ToolArgs for WindowSearchArgs {
    fn program(&self) -> &str {
        &self.program
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "search".to_string(),
            "--classname".to_string(),
            self.class.to_string(),
        ]
    }

    fn tool_name(&self) -> &'static str {
        "window search"
    }
}

/// First non-empty line of the search output
pub fn parse_window_id(stdout: &str) -> Option<WindowId> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(WindowId::new)
}

/// Poll the window search until it reports a window or `timeout` elapses.
///
/// A search that exits non-zero (xdotool does when nothing matches) counts as
/// "not yet"; the stderr of the last such failure is kept for the
/// `WindowNotFound` report. `terminal_exit` is checked between attempts and returns
/// `Some(status)` once the terminal has exited, so a terminal that died on
/// startup fails fast instead of waiting out the timeout.
pub fn wait_for_window<F>(
    args: &WindowSearchArgs,
    poll_interval: Duration,
    timeout: Duration,
    mut terminal_exit: F,
) -> Result<WindowId>
where
    F: FnMut() -> Option<String>,
{
    let start = Instant::now();
    let mut attempts = 0u32;
    let mut last_error = String::from("no window reported");

    loop {
        attempts += 1;
        let output = run_tool(args)?;
        if output.success {
            if let Some(id) = parse_window_id(&output.stdout) {
                info!(
                    "Found window {} for class {} after {} attempt(s)",
                    id, args.class, attempts
                );
                return Ok(id);
            }
        } else if !output.stderr.trim().is_empty() {
            last_error = output.stderr.trim().to_string();
        }

        if let Some(status) = terminal_exit() {
            return Err(TermshotError::TerminalExited { status });
        }

        let elapsed = start.elapsed();
        if elapsed + poll_interval > timeout {
            return Err(TermshotError::WindowNotFound {
                class: args.class.to_string(),
                waited_ms: elapsed.as_millis() as u64,
                last_error,
            });
        }

        debug!("Window for class {} not found yet", args.class);
        std::thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let args = WindowSearchArgs {
            program: "xdotool".to_string(),
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
        };
        assert_eq!(
            args.to_cli_args(),
            vec!["search", "--classname", "YWJjZGVm"]
        );
    }

    #[test]
    fn test_parse_window_id_takes_first_line() {
        assert_eq!(
            parse_window_id("\n 41943047 \n41943050\n"),
            Some(WindowId::new("41943047"))
        );
        assert_eq!(parse_window_id(""), None);
        assert_eq!(parse_window_id("  \n\n"), None);
    }

    #[test]
    fn test_wait_times_out_with_window_not_found() {
        // `false` never prints a window
        let args = WindowSearchArgs {
            program: "false".to_string(),
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
        };

        let start = Instant::now();
        let err = wait_for_window(
            &args,
            Duration::from_millis(20),
            Duration::from_millis(150),
            || None,
        )
        .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(2));
        match err {
            TermshotError::WindowNotFound {
                class, last_error, ..
            } => {
                assert_eq!(class, "YWJjZGVm");
                assert_eq!(last_error, "no window reported");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_window_not_found_keeps_last_search_error() {
        // `ls search --classname <tag>` fails and complains on stderr
        let args = WindowSearchArgs {
            program: "ls".to_string(),
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
        };

        let err = wait_for_window(
            &args,
            Duration::from_millis(20),
            Duration::from_millis(100),
            || None,
        )
        .unwrap_err();

        match err {
            TermshotError::WindowNotFound { last_error, .. } => {
                assert!(last_error.contains("search"), "got: {last_error}");
                assert!(!last_error.ends_with('\n'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wait_stops_when_terminal_exits() {
        let args = WindowSearchArgs {
            program: "false".to_string(),
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
        };

        let err = wait_for_window(
            &args,
            Duration::from_millis(10),
            Duration::from_secs(30),
            || Some("exit status: 1".to_string()),
        )
        .unwrap_err();

        assert!(matches!(err, TermshotError::TerminalExited { .. }));
    }

    #[test]
    fn test_wait_returns_found_window() {
        // `echo search --classname <tag>` always succeeds with output
        let args = WindowSearchArgs {
            program: "echo".to_string(),
            class: ClassTag::from_bytes(b"abcdef").unwrap(),
        };

        let id = wait_for_window(
            &args,
            Duration::from_millis(10),
            Duration::from_millis(100),
            || None,
        )
        .unwrap();
        assert_eq!(id.as_str(), "search --classname YWJjZGVm");
    }
}
