//! CLI argument definitions for Corkboard.

use crate::models::TimeFrame;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Corkboard - a time-frame task board for small teams.
///
/// Tasks are filed under five frames (today, tomorrow, this_week,
/// next_week, later_month) and keep an explicit order within each frame.
#[derive(Parser, Debug)]
#[command(name = "cork")]
#[command(author, version, about = "A time-frame task board", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Data directory for the task database and logs.
    /// Can also be set via CORK_DATA_DIR environment variable.
    #[arg(long = "data", global = true, env = "CORK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Team whose board to operate on.
    /// Can also be set via CORK_TEAM environment variable.
    #[arg(long, global = true, env = "CORK_TEAM", default_value = "default")]
    pub team: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to the board
    Add {
        /// Task name
        name: String,

        /// Time frame to file the task under
        #[arg(short, long, default_value = "today")]
        frame: TimeFrame,

        /// Free-text memo
        #[arg(short, long)]
        memo: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Due time (HH:MM or HH:MM:SS)
        #[arg(long)]
        at: Option<String>,

        /// Project to file the task under
        #[arg(short, long)]
        project: Option<String>,

        /// Mark the task important
        #[arg(long)]
        important: bool,

        /// Pin the task
        #[arg(long)]
        pin: bool,

        /// Assignee member id (repeatable)
        #[arg(short, long)]
        assignee: Vec<String>,
    },

    /// Show the board grouped by time frame
    List {
        /// Restrict the board to one project
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Move a task before another card, or to the end of a frame
    ///
    /// With --before the task lands immediately above the target card,
    /// reordering within a frame or moving across frames as needed. With
    /// --frame alone it is appended to the end of that frame.
    Move {
        /// Task id (any unique prefix)
        id: String,

        /// Destination frame (append to its end)
        #[arg(short, long)]
        frame: Option<TimeFrame>,

        /// Card to place the task before
        #[arg(short, long)]
        before: Option<String>,
    },

    /// Toggle a task's completion flag
    Done {
        /// Task id (any unique prefix)
        id: String,
    },

    /// Toggle a task's importance star
    Star {
        /// Task id (any unique prefix)
        id: String,
    },

    /// Toggle a task's pin
    Pin {
        /// Task id (any unique prefix)
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id (any unique prefix)
        id: String,
    },

    /// Undo the most recent completion or deletion
    Undo,

    /// Edit fields of a task
    Edit {
        /// Task id (any unique prefix)
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New memo
        #[arg(long)]
        memo: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Clear the due date (and time)
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,

        /// New due time (HH:MM or HH:MM:SS)
        #[arg(long)]
        at: Option<String>,

        /// New frame
        #[arg(long)]
        frame: Option<TimeFrame>,

        /// New project
        #[arg(long)]
        project: Option<String>,

        /// Detach the task from its project
        #[arg(long, conflicts_with = "project")]
        clear_project: bool,

        /// Replace the assignee list (repeatable)
        #[arg(long)]
        assignee: Vec<String>,
    },
}
