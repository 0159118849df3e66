//! Turning input lines into input-injection invocations.
//!
//! Two modes:
//!
//! - `commands` (default): every line is an xdotool command fragment such as
//!   `windowsize --usehints $WINDOWID 21 7`. The line is split into words with
//!   POSIX-style quoting and `$WINDOWID` / `$WINDOW_ID` (plain or braced) are
//!   replaced by the resolved window. No shell runs and no environment
//!   variable is set. A keyboard or mouse command that names no window is
//!   chained after `windowfocus --sync <id>`, so it goes out through XTEST to
//!   the focused terminal rather than as a synthetic event xterm would drop.
//! - `literal`: the line is typed verbatim and followed by Return, each after
//!   focusing the window.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, TermshotError};
use crate::tool_traits::ToolArgs;
use crate::tools::window::WindowId;

/// Placeholder names substituted with the window identifier
pub const WINDOW_VARS: &[&str] = &["WINDOWID", "WINDOW_ID"];

/// Commands that act on the focused window when given no `--window`
const WINDOW_TARGETED: &[&str] = &[
    "key",
    "keydown",
    "keyup",
    "type",
    "click",
    "mousedown",
    "mouseup",
    "mousemove",
];

/// How input lines are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InputMode {
    /// Lines are injection-tool command fragments
    #[default]
    Commands,
    /// Lines are text to type, each followed by Return
    Literal,
}

/// One invocation of the injection tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectArgs {
    pub program: String,
    pub words: Vec<String>,
}

impl ToolArgs for InjectArgs {
    fn program(&self) -> &str {
        &self.program
    }

    fn to_cli_args(&self) -> Vec<String> {
        self.words.clone()
    }

    fn tool_name(&self) -> &'static str {
        "input injection"
    }
}

/// Words of a command line after quoting and placeholder expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub words: Vec<String>,
    /// Whether a window placeholder was substituted anywhere
    pub substituted: bool,
}

/// Split `line` into words, expanding the window placeholder.
///
/// Single quotes are literal. Inside double quotes `\"`, `\\` and `\$` are
/// escapes and the placeholder expands. Unknown `$NAME` references are kept
/// verbatim.
pub fn split_words(line: &str, window: &WindowId) -> std::result::Result<Expansion, String> {
    let chars: Vec<char> = line.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut substituted = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated single quote".to_string()),
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(&q) => {
                            current.push(q);
                            i += 1;
                        }
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated double quote".to_string()),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => match chars.get(i + 1) {
                            Some(&e @ ('"' | '\\' | '$')) => {
                                current.push(e);
                                i += 2;
                            }
                            _ => {
                                current.push('\\');
                                i += 1;
                            }
                        },
                        Some('$') => {
                            i += 1;
                            i = expand(&chars, i, window, &mut current, &mut substituted);
                        }
                        Some(&q) => {
                            current.push(q);
                            i += 1;
                        }
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.get(i) {
                    Some(&e) => {
                        current.push(e);
                        i += 1;
                    }
                    None => return Err("trailing backslash".to_string()),
                }
            }
            '$' => {
                in_word = true;
                i = expand(&chars, i, window, &mut current, &mut substituted);
            }
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }

    if in_word {
        words.push(current);
    }

    Ok(Expansion { words, substituted })
}

/// Expand a placeholder starting right after a `$` at `start`.
/// Returns the index to continue scanning from.
fn expand(
    chars: &[char],
    start: usize,
    window: &WindowId,
    out: &mut String,
    substituted: &mut bool,
) -> usize {
    let matches_at = |at: usize, text: &str| {
        text.chars()
            .enumerate()
            .all(|(k, t)| chars.get(at + k) == Some(&t))
    };
    let is_ident = |c: Option<&char>| c.is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_');

    for name in WINDOW_VARS {
        let braced = format!("{{{}}}", name);
        if matches_at(start, &braced) {
            out.push_str(window.as_str());
            *substituted = true;
            return start + braced.len();
        }

        let end = start + name.len();
        if matches_at(start, name) && !is_ident(chars.get(end)) {
            out.push_str(window.as_str());
            *substituted = true;
            return end;
        }
    }

    out.push('$');
    start
}

/// Work out the injection-tool argv lists for one input line.
///
/// `line_no` is 1-based and only used in error messages. An empty list means
/// nothing is injected for this line (it is still captured).
pub fn plan_injection(
    line: &str,
    line_no: usize,
    mode: InputMode,
    window: &WindowId,
) -> Result<Vec<Vec<String>>> {
    match mode {
        InputMode::Commands => {
            let Expansion { words, substituted } = split_words(line, window)
                .map_err(|reason| TermshotError::input_parse(line_no, reason))?;

            if words.is_empty() {
                return Ok(Vec::new());
            }
            let names_window = substituted || words.iter().any(|w| w == "--window");
            if !names_window && WINDOW_TARGETED.contains(&words[0].as_str()) {
                return Ok(vec![focused(window, words)]);
            }
            Ok(vec![words])
        }
        InputMode::Literal => {
            let mut plan = Vec::with_capacity(2);
            if !line.is_empty() {
                plan.push(focused(
                    window,
                    vec!["type".to_string(), "--".to_string(), line.to_string()],
                ));
            }
            plan.push(focused(
                window,
                vec!["key".to_string(), "Return".to_string()],
            ));
            Ok(plan)
        }
    }
}

/// Chain `command` after `windowfocus --sync <id>`
fn focused(window: &WindowId, command: Vec<String>) -> Vec<String> {
    let mut words = vec![
        "windowfocus".to_string(),
        "--sync".to_string(),
        window.to_string(),
    ];
    words.extend(command);
    words
}
