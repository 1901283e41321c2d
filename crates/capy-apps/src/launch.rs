//! Starting applications from their desktop entry command line.

use crate::error::LauncherError;
use log::{info, warn};
use std::process::{Command, Stdio};

/// Drop desktop entry field codes (`%f`, `%U`, ...) and unescape `%%`.
/// Other whitespace, including runs inside quoted arguments, is kept.
pub fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            // Field codes expand to nothing when launched without files or URLs.
            // A code that is a whole argument takes its separator with it.
            Some(_) => {
                let standalone = out.is_empty() || out.ends_with(char::is_whitespace);
                if standalone && chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            None => {}
        }
    }

    out.trim().to_string()
}

/// Spawn a command line detached from the launcher.
pub fn launch(exec: &str) -> Result<(), LauncherError> {
    let command_line = strip_field_codes(exec);
    if command_line.is_empty() {
        return Err(LauncherError::Launch(format!("empty command line '{}'", exec)));
    }

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(&command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| LauncherError::Launch(format!("{}: {}", command_line, e)))?;

    info!("Launched '{}' (pid {})", command_line, child.id());

    // Reap the child so it doesn't linger as a zombie
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            warn!("Failed to wait for launched process: {}", e);
        }
    });

    Ok(())
}
