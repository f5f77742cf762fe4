use std::{
    io::{self, Write},
    panic,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tracing::{info, warn};
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use taskmux::{
    app::App,
    cli::{self, RootCommand},
    logging::{init_logging, print_log_location},
    realm::{RootId, TerminalHandoff, apply_message, init_application, should_quit},
    settings::Settings,
    tmux::binary_on_path,
};

const TMUX_INSTALL_HINT: &str = "Install with: brew install tmux (macOS) or apt install tmux (Linux)";
const GEMINI_INSTALL_HINT: &str = "Install from: https://ai.google.dev/gemini-api/docs/cli";

#[derive(Parser, Debug)]
#[command(
    name = "taskmux",
    about = "Terminal dashboard for AI coding assistant tasks running in tmux sessions",
    long_about = "Tracks a list of tasks, each backed by a tmux session running an AI coding assistant, with a live preview of the selected session.",
    version = env!("TASKMUX_BUILD_VERSION"),
    author
)]
struct Cli {
    /// Directory new sessions start in (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Assistant command to launch in new sessions (overrides settings)
    #[arg(long, value_name = "BIN")]
    assistant: Option<String>,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<RootCommand>,
}

enum RunOutcome {
    Continue,
    Exit(i32),
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

fn main() -> Result<()> {
    let log_handle = match init_logging() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    let log_path = log_handle.as_ref().map(|handle| handle.path().to_path_buf());
    if let Some(path) = log_path.as_ref() {
        install_panic_hook_with_log(path.clone());
    }

    match run_app() {
        Ok(RunOutcome::Continue) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Ok(())
        }
        Ok(RunOutcome::Exit(code)) => {
            drop(log_handle);
            std::process::exit(code);
        }
        Err(err) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Err(err)
        }
    }
}

fn run_app() -> Result<RunOutcome> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        let code = cli::run(command, cli.json, cli.quiet);
        return Ok(RunOutcome::Exit(code));
    }

    let mut settings = Settings::load();
    if let Some(assistant) = cli.assistant.filter(|value| !value.trim().is_empty()) {
        settings.assistant_command = assistant;
    }

    if let Err(missing) = check_dependencies(&settings) {
        eprintln!("ERROR: {} is not installed", missing.binary);
        eprintln!("{}", missing.hint);
        return Ok(RunOutcome::Exit(1));
    }

    let workdir = match cli.workdir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };

    let mut app = App::new(settings, workdir)?;
    let (width, height) = crossterm::terminal::size().unwrap_or_else(|err| {
        warn!(error = %err, "failed to read terminal size; assuming 80x24");
        (80, 24)
    });
    app.resize(width, height);
    app.poll();
    let poll_interval = Duration::from_millis(app.settings().poll_interval_ms);
    info!(width, height, ?poll_interval, "starting dashboard");

    let app = Arc::new(Mutex::new(app));
    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;
    let mut realm = init_application(Arc::clone(&app), poll_interval)?;

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| realm.view(&RootId::Root, frame, frame.area()))
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        if !messages.is_empty() {
            redraw = true;
        }

        for message in messages {
            let mut handoff = TerminalHandoff::new(&mut terminal, &mut realm);
            apply_message(&app, message, &mut handoff)?;
        }
    }

    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(RunOutcome::Continue)
}

struct MissingDependency {
    binary: String,
    hint: String,
}

fn check_dependencies(settings: &Settings) -> Result<(), MissingDependency> {
    if !binary_on_path("tmux") {
        return Err(MissingDependency {
            binary: "tmux".to_string(),
            hint: TMUX_INSTALL_HINT.to_string(),
        });
    }

    let assistant = settings.assistant_binary();
    if !binary_on_path(assistant) {
        return Err(MissingDependency {
            binary: assistant.to_string(),
            hint: install_hint(assistant),
        });
    }

    Ok(())
}

fn install_hint(binary: &str) -> String {
    if binary == "gemini" {
        GEMINI_INSTALL_HINT.to_string()
    } else {
        format!("Install {binary} and ensure it is on PATH, then retry.")
    }
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("  Log file: {}", log_path.display());
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(stderr, LeaveAlternateScreen, Show, ResetColor);
    let _ = stderr.write_all(b"\x1b[?1049l\x1b[?2004l\x1b[?7h\x1b[?25h\x1b[0m\x1b[2J\x1b[H");
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
