//! System clipboard via platform CLI tools.
//!
//! Pipes text into the first clipboard command found on `PATH`
//! (`pbcopy`, `wl-copy`, `xclip`, `xsel`, `clip.exe`).

use ror_application::{ClipboardError, ClipboardPort};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Known clipboard writers, in preference order
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Clipboard adapter that shells out to a copy command
///
/// Created via [`SystemClipboard::detect`]; when no tool is installed the
/// adapter still exists and reports [`ClipboardError::Unavailable`] on use.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    command: Option<(String, Vec<String>)>,
}

impl SystemClipboard {
    /// Pick the first clipboard tool available on this machine
    pub fn detect() -> Self {
        let command = CANDIDATES
            .iter()
            .find(|(program, _)| which::which(program).is_ok())
            .map(|(program, args)| {
                debug!("Using {} for clipboard access", program);
                (
                    program.to_string(),
                    args.iter().map(|a| a.to_string()).collect(),
                )
            });
        if command.is_none() {
            debug!("No clipboard tool found, copying disabled");
        }
        Self { command }
    }

    /// Use a specific command instead of detecting one
    pub fn with_command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: Some((program.into(), args)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }
}

impl ClipboardPort for SystemClipboard {
    fn copy_text(&self, text: &str) -> Result<(), ClipboardError> {
        let (program, args) = self.command.as_ref().ok_or(ClipboardError::Unavailable)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CommandFailed(format!("{}: {}", program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                // reap the child before bailing out
                let _ = child.kill();
                let _ = child.wait();
                return Err(ClipboardError::CommandFailed(format!("{}: {}", program, e)));
            }
        }

        let status = child
            .wait()
            .map_err(|e| ClipboardError::CommandFailed(format!("{}: {}", program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed(format!(
                "{} exited with {}",
                program, status
            )))
        }
    }
}
