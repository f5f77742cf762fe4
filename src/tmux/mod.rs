use std::env;
use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

const TMUX_SOCKET: &str = "";
const TMUX_SOCKET_ENV: &str = "TASKMUX_TMUX_SOCKET";

/// Size and launch parameters for a new detached session.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionSpec<'a> {
    pub name: &'a str,
    pub working_dir: &'a Path,
    pub width: u16,
    pub height: u16,
    pub command: &'a [String],
}

/// True when `binary` resolves on PATH.
pub fn binary_on_path(binary: &str) -> bool {
    Command::new("which")
        .arg(binary)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn tmux_session_exists(session_name: &str) -> bool {
    tmux_command()
        .args(has_session_args(session_name))
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn tmux_create_session(spec: &SessionSpec<'_>) -> Result<()> {
    let mut args = new_session_args(spec.name, spec.working_dir, spec.width, spec.height);
    args.extend(spec.command.iter().cloned());

    let output = tmux_command()
        .args(args)
        .output()
        .context("failed to run tmux new-session")?;
    ensure_success_with_output(&output, "new-session")?;

    pin_window_size(spec.name, spec.width, spec.height);
    Ok(())
}

/// tmux follows the size of the most recently attached client unless told
/// otherwise; the preview pane relies on a fixed geometry.
fn pin_window_size(session_name: &str, width: u16, height: u16) {
    for (operation, args) in [
        ("set-window-option", aggressive_resize_off_args(session_name)),
        ("resize-window", resize_window_args(session_name, width, height)),
    ] {
        match tmux_command().args(args).output() {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                session_name,
                operation,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "failed to pin tmux window size"
            ),
            Err(err) => warn!(
                session_name,
                operation,
                error = %err,
                "failed to run tmux while pinning window size"
            ),
        }
    }
}

pub fn tmux_capture_pane(session_name: &str, lines: usize) -> Result<String> {
    let start = format!("-{lines}");
    let output = tmux_command()
        .args(capture_pane_args(session_name, &start))
        .output()
        .context("failed to run tmux capture-pane")?;

    ensure_success(&output, "capture-pane")?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

pub fn tmux_bind_detach_key(key: &str) -> Result<()> {
    let output = tmux_command()
        .args(detach_binding_args(key))
        .output()
        .context("failed to configure detach key binding")?;
    ensure_success_with_output(&output, "bind-key")
}

/// Runs an interactive client on the caller's terminal and blocks until it
/// detaches or the session ends.
pub fn tmux_attach_session(session_name: &str) -> Result<ExitStatus> {
    debug!(session_name, "attaching tmux client");
    tmux_command()
        .args(attach_args(session_name))
        .env_remove("TMUX")
        .status()
        .context("failed to run tmux attach")
}

pub fn tmux_kill_session(session_name: &str) -> Result<()> {
    let output = tmux_command()
        .args(kill_session_args(session_name))
        .output()
        .context("failed to run tmux kill-session")?;
    ensure_success(&output, "kill-session")
}

fn tmux_command() -> Command {
    let mut cmd = Command::new("tmux");
    let socket = tmux_socket();
    if !socket.is_empty() {
        cmd.args(socket_args(&socket));
    }
    cmd
}

fn socket_args(socket: &str) -> Vec<String> {
    vec!["-L".to_string(), socket.to_string()]
}

fn has_session_args(session_name: &str) -> Vec<String> {
    vec![
        "has-session".to_string(),
        "-t".to_string(),
        session_name.to_string(),
    ]
}

fn new_session_args(session_name: &str, working_dir: &Path, width: u16, height: u16) -> Vec<String> {
    vec![
        "new-session".to_string(),
        "-d".to_string(),
        "-s".to_string(),
        session_name.to_string(),
        "-x".to_string(),
        width.to_string(),
        "-y".to_string(),
        height.to_string(),
        "-c".to_string(),
        working_dir.to_string_lossy().to_string(),
    ]
}

fn aggressive_resize_off_args(session_name: &str) -> Vec<String> {
    vec![
        "set-window-option".to_string(),
        "-t".to_string(),
        session_name.to_string(),
        "aggressive-resize".to_string(),
        "off".to_string(),
    ]
}

fn resize_window_args(session_name: &str, width: u16, height: u16) -> Vec<String> {
    vec![
        "resize-window".to_string(),
        "-t".to_string(),
        session_name.to_string(),
        "-x".to_string(),
        width.to_string(),
        "-y".to_string(),
        height.to_string(),
    ]
}

fn capture_pane_args(session_name: &str, start: &str) -> Vec<String> {
    vec![
        "capture-pane".to_string(),
        "-t".to_string(),
        session_name.to_string(),
        "-p".to_string(),
        "-e".to_string(),
        "-J".to_string(),
        "-S".to_string(),
        start.to_string(),
    ]
}

fn detach_binding_args(key: &str) -> Vec<String> {
    vec![
        "bind-key".to_string(),
        "-n".to_string(),
        key.to_string(),
        "detach-client".to_string(),
    ]
}

fn attach_args(session_name: &str) -> Vec<String> {
    vec![
        "attach".to_string(),
        "-t".to_string(),
        session_name.to_string(),
    ]
}

fn kill_session_args(session_name: &str) -> Vec<String> {
    vec![
        "kill-session".to_string(),
        "-t".to_string(),
        session_name.to_string(),
    ]
}

fn tmux_socket() -> String {
    if let Ok(socket) = env::var(TMUX_SOCKET_ENV) {
        let trimmed = socket.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if cfg!(test) {
        format!("taskmux-test-{}", std::process::id())
    } else {
        TMUX_SOCKET.to_string()
    }
}

fn ensure_success(output: &std::process::Output, operation: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    bail!("tmux {operation} failed: {}", stderr.trim())
}

fn ensure_success_with_output(output: &std::process::Output, command: &str) -> Result<()> {
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        bail!(
            "tmux {} failed: {}{}",
            command,
            stderr.trim(),
            if stdout.trim().is_empty() {
                String::new()
            } else {
                format!(" {}", stdout.trim())
            }
        )
    }
}
