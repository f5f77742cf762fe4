use clap::Subcommand;
use serde_json::{Value, json};
use tracing::error;

use crate::{app::TaskStore, settings::Settings, store::JsonTaskStore, types::Task};

const SCHEMA_VERSION: &str = "cli.v1";

#[derive(Debug, Clone, Subcommand)]
pub enum RootCommand {
    /// Print the saved tasks without starting the dashboard
    List,
    /// Write a default settings file if none exists and print its path
    Config,
}

pub fn run(command: RootCommand, json_output: bool, quiet: bool) -> i32 {
    let result = match command {
        RootCommand::List => JsonTaskStore::open_default()
            .map_err(runtime_error)
            .and_then(|store| task_list(&store)),
        RootCommand::Config => config_init(),
    };

    match result {
        Ok(output) => {
            print_success(output, json_output, quiet);
            0
        }
        Err(err) => {
            print_error(&err, json_output);
            err.exit_code
        }
    }
}

struct CommandOutput {
    command: &'static str,
    data: Value,
    text: String,
}

#[derive(Debug)]
struct CliError {
    exit_code: i32,
    code: &'static str,
    message: String,
}

type CliResult<T> = Result<T, CliError>;

fn runtime_error(err: anyhow::Error) -> CliError {
    CliError {
        exit_code: 1,
        code: "RUNTIME_ERROR",
        message: format!("{err:#}"),
    }
}

fn task_list(store: &impl TaskStore) -> CliResult<CommandOutput> {
    let tasks = store.load_tasks().map_err(runtime_error)?;
    let data = json!({
        "tasks": tasks.iter().map(task_json).collect::<Vec<_>>()
    });

    Ok(CommandOutput {
        command: "list",
        data,
        text: render_task_list_text(&tasks),
    })
}

fn config_init() -> CliResult<CommandOutput> {
    let Some(path) = Settings::config_path() else {
        return Err(CliError {
            exit_code: 1,
            code: "CONFIG_PATH_UNAVAILABLE",
            message: "unable to determine config directory".to_string(),
        });
    };

    let created = !path.exists();
    if created {
        Settings::default().save().map_err(runtime_error)?;
    }

    let path_text = path.display().to_string();
    let text = if created {
        format!("Wrote default settings to {path_text}")
    } else {
        format!("Settings file already exists at {path_text}")
    };

    Ok(CommandOutput {
        command: "config",
        data: json!({ "path": path_text, "created": created }),
        text,
    })
}

fn task_json(task: &Task) -> Value {
    json!({
        "id": task.id,
        "title": task.title,
        "details": task.details,
        "done": task.done,
        "session_name": task.session_name,
        "created_at": task.created_at.to_rfc3339(),
    })
}

fn render_task_list_text(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let headers = ["ID", "Done", "Session", "Title"];
    let rows = tasks
        .iter()
        .map(|task| {
            let short_id = task.id.chars().take(8).collect::<String>();
            let done = if task.done { "x" } else { "-" };
            [
                short_id,
                done.to_string(),
                task.session_name.clone(),
                task.title.replace('\n', " "),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers)];
    for row in &rows {
        lines.push(format_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }
    lines.join("\n")
}

fn print_success(output: CommandOutput, json_output: bool, quiet: bool) {
    if json_output {
        let payload = json!({
            "schema_version": SCHEMA_VERSION,
            "command": output.command,
            "data": output.data
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(value) => println!("{value}"),
            Err(_) => println!("{}", payload),
        }
        return;
    }

    if quiet {
        return;
    }

    println!("{}", output.text);
}

fn print_error(err: &CliError, json_output: bool) {
    error!(code = err.code, message = %err.message, "cli command failed");

    if json_output {
        let payload = json!({
            "schema_version": SCHEMA_VERSION,
            "error": {
                "code": err.code,
                "message": err.message,
            }
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(value) => eprintln!("{value}"),
            Err(_) => eprintln!("{}", payload),
        }
        return;
    }

    eprintln!("error[{}]: {}", err.code, err.message);
}
