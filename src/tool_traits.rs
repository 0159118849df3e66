//! Type-safe external tool argument contracts.
//!
//! Every external program termshot drives (terminal emulator, window search,
//! input injection, screen capture) is described by a struct implementing
//! `ToolArgs`. The struct definition IS the contract: flag spelling lives in
//! exactly one `to_cli_args` implementation, and the runner never assembles
//! argv from loose strings.

/// Trait for typed external tool arguments.
///
/// # Contract
///
/// - `program()`: executable to run, resolved through `PATH` by the runner.
/// - `to_cli_args()`: arguments exactly as the program expects them.
/// - `tool_name()`: short stable name used in logs and error messages.
///
/// # Invariants
///
/// - Arguments are passed as argv, never through a shell.
/// - Window identifiers are passed as explicit arguments, never via the
///   environment.
///
/// # Example
///
/// ```
/// use termshot::tool_traits::ToolArgs;
/// use termshot::tools::capture::CaptureArgs;
/// use termshot::tools::window::WindowId;
/// use std::path::PathBuf;
///
/// let args = CaptureArgs {
///     program: "import".to_string(),
///     window: WindowId::new("12582919"),
///     output: PathBuf::from("demo1.png"),
/// };
///
/// assert_eq!(args.to_cli_args(), vec!["-window", "12582919", "demo1.png"]);
/// ```
pub trait ToolArgs {
    /// Executable name or path.
    fn program(&self) -> &str;

    /// Convert struct fields to CLI arguments.
    fn to_cli_args(&self) -> Vec<String>;

    /// Stable name for logs and errors (e.g. "terminal", "capture").
    fn tool_name(&self) -> &'static str;
}
