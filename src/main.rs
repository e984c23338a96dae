//! Corkboard CLI - a time-frame task board.

use clap::Parser;
use corkboard::action_log;
use corkboard::cli::{Cli, Commands};
use corkboard::commands::{self, Output};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    // Data dir: --data flag > CORK_DATA_DIR env (clap covers both) >
    // platform data dir
    let data_dir = resolve_data_dir(cli.data_dir, human);

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &data_dir, &cli.team, human);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&data_dir, cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        if human {
            eprintln!("Error: {e}");
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn resolve_data_dir(explicit: Option<PathBuf>, human: bool) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    match dirs::data_dir() {
        Some(base) => base.join("corkboard"),
        None => {
            if human {
                eprintln!("Error: no data directory available; pass --data or set CORK_DATA_DIR");
            } else {
                eprintln!(r#"{{"error": "no data directory available; pass --data or set CORK_DATA_DIR"}}"#);
            }
            process::exit(1);
        }
    }
}

fn run_command(
    command: Commands,
    data_dir: &Path,
    team: &str,
    human: bool,
) -> Result<(), corkboard::Error> {
    match command {
        Commands::Add {
            name,
            frame,
            memo,
            due,
            at,
            project,
            important,
            pin,
            assignee,
        } => {
            let result = commands::add(
                data_dir, team, &name, frame, memo, due, at, project, important, pin, assignee,
            )?;
            output(&result, human);
        }

        Commands::List { project } => {
            let result = commands::list(data_dir, team, project)?;
            output(&result, human);
        }

        Commands::Move { id, frame, before } => {
            let result = commands::move_card(data_dir, team, &id, frame, before)?;
            output(&result, human);
        }

        Commands::Done { id } => {
            let result = commands::done(data_dir, team, &id)?;
            output(&result, human);
        }

        Commands::Star { id } => {
            let result = commands::star(data_dir, team, &id)?;
            output(&result, human);
        }

        Commands::Pin { id } => {
            let result = commands::pin(data_dir, team, &id)?;
            output(&result, human);
        }

        Commands::Rm { id } => {
            let result = commands::rm(data_dir, team, &id)?;
            output(&result, human);
        }

        Commands::Undo => {
            let result = commands::undo(data_dir, team)?;
            output(&result, human);
        }

        Commands::Edit {
            id,
            name,
            memo,
            due,
            clear_due,
            at,
            frame,
            project,
            clear_project,
            assignee,
        } => {
            let result = commands::edit(
                data_dir,
                team,
                &id,
                name,
                memo,
                due,
                clear_due,
                at,
                frame,
                project,
                clear_project,
                assignee,
            )?;
            output(&result, human);
        }
    }
    Ok(())
}

fn output(result: &impl Output, human: bool) {
    if human {
        print!("{}", ensure_newline(result.human()));
    } else {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }
}

fn ensure_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

fn serialize_command(command: &Commands) -> (&'static str, serde_json::Value) {
    use serde_json::json;
    match command {
        Commands::Add { name, frame, .. } => {
            ("add", json!({ "name": name, "frame": frame.label() }))
        }
        Commands::List { project } => ("list", json!({ "project": project })),
        Commands::Move { id, frame, before } => (
            "move",
            json!({ "id": id, "frame": frame.map(|f| f.label()), "before": before }),
        ),
        Commands::Done { id } => ("done", json!({ "id": id })),
        Commands::Star { id } => ("star", json!({ "id": id })),
        Commands::Pin { id } => ("pin", json!({ "id": id })),
        Commands::Rm { id } => ("rm", json!({ "id": id })),
        Commands::Undo => ("undo", json!({})),
        Commands::Edit { id, .. } => ("edit", json!({ "id": id })),
    }
}
