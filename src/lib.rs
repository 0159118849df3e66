//! termshot library
//!
//! Runs a script inside a terminal emulator, feeds the terminal scripted
//! input and captures a numbered screenshot after every step.

pub mod class_tag;
pub mod cli;
pub mod config;
pub mod error;
pub mod process_guard;
pub mod session;
pub mod tool_runner;
pub mod tool_traits;
pub mod tools;

// Re-export main types for convenience
pub use class_tag::ClassTag;
pub use config::{CaptureConfig, TerminalConfig, TimingConfig, ToolPrograms};
pub use error::{Result, TermshotError};
pub use process_guard::{ChildRegistry, CommandProcessGroup, TerminalGuard};
pub use session::{SessionReport, run_session};
pub use tool_runner::{ToolOutput, run_tool, run_tool_checked, spawn_tool};
pub use tool_traits::ToolArgs;
pub use tools::capture::{CaptureArgs, ImageNamer};
pub use tools::input::{InjectArgs, InputMode, plan_injection};
pub use tools::terminal::TerminalArgs;
pub use tools::window::{WindowId, WindowSearchArgs, wait_for_window};
