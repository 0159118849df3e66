//! Capture session orchestration.
//!
//! One run: start the terminal under a fresh class tag, wait for its window,
//! then for every input line inject it, let the terminal settle, and capture
//! the window into the next numbered image. The terminal is owned by a
//! `TerminalGuard`, so it is terminated exactly once on every exit path.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::class_tag::ClassTag;
use crate::config::CaptureConfig;
use crate::error::Result;
use crate::process_guard::TerminalGuard;
use crate::tool_runner::{run_tool_checked, spawn_tool};
use crate::tools::capture::{CaptureArgs, ImageNamer};
use crate::tools::input::{InjectArgs, plan_injection};
use crate::tools::terminal::TerminalArgs;
use crate::tools::window::{WindowId, WindowSearchArgs, wait_for_window};

/// What a finished session produced
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub class: ClassTag,
    pub window: WindowId,
    /// Image files written, in input order
    pub images: Vec<PathBuf>,
}

/// Run `script` in a terminal and capture one image per line of `input`.
pub fn run_session<R: BufRead>(
    script: &Path,
    config: &CaptureConfig,
    input: R,
) -> Result<SessionReport> {
    config.validate()?;

    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir)?;
    }

    let class = ClassTag::generate();
    info!("Starting {} for {} (class {})", config.terminal.program, script.display(), class);

    let terminal_args = TerminalArgs {
        style: config.terminal.clone(),
        class: class.clone(),
        interpreter: config.interpreter.clone(),
        script: script.to_path_buf(),
    };
    let mut terminal = TerminalGuard::new(
        spawn_tool(&terminal_args)?,
        config.timing.terminate_grace(),
    );

    let search = WindowSearchArgs {
        program: config.tools.window_tool.clone(),
        class: class.clone(),
    };
    let window = wait_for_window(
        &search,
        config.timing.poll_interval(),
        config.timing.window_timeout(),
        || terminal.exit_status().map(|status| status.to_string()),
    )?;

    let mut namer = ImageNamer::for_script(script, config.output_dir.as_deref());
    let mut images = Vec::new();

    // Lines are bytes from an arbitrary program; invalid UTF-8 is replaced
    // rather than ending the session
    for (index, raw) in input.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw);
        let line_no = index + 1;
        info!("Input {}: {}", line_no, line);

        for words in plan_injection(&line, line_no, config.input_mode, &window)? {
            run_tool_checked(&InjectArgs {
                program: config.tools.window_tool.clone(),
                words,
            })?;
        }

        std::thread::sleep(config.timing.settle());

        let output = namer.next_path();
        run_tool_checked(&CaptureArgs {
            program: config.tools.capture_tool.clone(),
            window: window.clone(),
            output: output.clone(),
        })?;
        debug!("Captured {}", output.display());
        images.push(output);
    }

    terminal.terminate();
    info!("Captured {} image(s) of window {}", images.len(), window);

    Ok(SessionReport {
        class,
        window,
        images,
    })
}
