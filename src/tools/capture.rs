//! Window capture and output file naming.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::tool_traits::ToolArgs;
use crate::tools::window::WindowId;

/// `import -window <id> <file>`
#[derive(Debug, Clone)]
pub struct CaptureArgs {
    pub program: String,
    pub window: WindowId,
    pub output: PathBuf,
}

impl ToolArgs for CaptureArgs {
    fn program(&self) -> &str {
        &self.program
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-window".to_string(),
            self.window.to_string(),
            self.output.to_string_lossy().to_string(),
        ]
    }

    fn tool_name(&self) -> &'static str {
        "capture"
    }
}

/// Sequential image names: `<base>1.png`, `<base>2.png`, ...
#[derive(Debug, Clone)]
pub struct ImageNamer {
    base: PathBuf,
    next: u32,
}

impl ImageNamer {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            next: 1,
        }
    }

    /// Base name from the script path with its extension stripped.
    ///
    /// With `output_dir`, only the file stem is kept and placed inside it.
    pub fn for_script(script: &Path, output_dir: Option<&Path>) -> Self {
        let stripped = script.with_extension("");
        let base = match output_dir {
            Some(dir) => dir.join(stripped.file_name().unwrap_or(stripped.as_os_str())),
            None => stripped,
        };
        Self::new(base)
    }

    pub fn next_path(&mut self) -> PathBuf {
        let mut name = OsString::from(self.base.as_os_str());
        name.push(format!("{}.png", self.next));
        self.next += 1;
        PathBuf::from(name)
    }
}
