//! Type-safe external tool execution
//!
//! This module is the ONLY place termshot starts external programs.
//! Everything goes through `run_tool` (blocking, output captured) or
//! `spawn_tool` (background, process group isolated) so that:
//!
//! - argv always comes from a `ToolArgs` implementation
//! - every invocation is logged the same way
//! - failures carry the tool name, exit code and stderr

use crate::error::{Result, TermshotError};
use crate::process_guard::CommandProcessGroup;
use crate::tool_traits::ToolArgs;
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// Output from a completed tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl ToolOutput {
    /// Turn an unsuccessful run into `TermshotError::ToolFailed`.
    pub fn ensure_success(self, tool: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(TermshotError::ToolFailed {
                tool: tool.to_string(),
                code: self.exit_code.unwrap_or(-1),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

fn describe<T: ToolArgs>(args: &T) -> String {
    format!("{} ({})", args.tool_name(), args.program())
}

/// Run a tool to completion and capture its output.
///
/// A non-zero exit is reported in `ToolOutput::success`, not as `Err`;
/// callers decide whether that is fatal (window search treats it as "not yet").
pub fn run_tool<T: ToolArgs>(args: &T) -> Result<ToolOutput> {
    let cli_args = args.to_cli_args();
    debug!("run_tool: {} args={:?}", describe(args), cli_args);

    let output = Command::new(args.program())
        .args(&cli_args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| TermshotError::ToolSpawn {
            tool: describe(args),
            source,
        })?;

    let result = ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
        success: output.status.success(),
    };

    if !result.success {
        debug!(
            "{} exited with {:?}: {}",
            describe(args),
            result.exit_code,
            result.stderr.trim()
        );
    }
    Ok(result)
}

/// Run a tool and fail unless it exits successfully.
pub fn run_tool_checked<T: ToolArgs>(args: &T) -> Result<ToolOutput> {
    run_tool(args)?.ensure_success(&describe(args))
}

/// Start a tool in the background, in its own process group.
///
/// The caller owns the returned child; wrap it in a `TerminalGuard`.
pub fn spawn_tool<T: ToolArgs>(args: &T) -> Result<Child> {
    let cli_args = args.to_cli_args();
    debug!("spawn_tool: {} args={:?}", describe(args), cli_args);

    Command::new(args.program())
        .args(&cli_args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .in_new_process_group()
        .spawn()
        .map_err(|source| TermshotError::ToolSpawn {
            tool: describe(args),
            source,
        })
}
