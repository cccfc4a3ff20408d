//! Command-line argument parsing for the `projects` binary.

use clap::{Parser, Subcommand};
use projects_core::config::DB_PATH_ENV;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Track DIY projects with their materials, steps and categories.
#[derive(Parser, Debug)]
#[command(name = "projects")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database file
    #[arg(long, global = true, env = DB_PATH_ENV)]
    pub db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PROJECTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files; logging is off when unset
    #[arg(long, global = true, env = "PROJECTS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new project
    Add {
        /// Project name
        name: String,

        /// Estimated hours of work
        #[arg(short, long)]
        estimated_hours: Decimal,

        /// Hours already spent
        #[arg(short, long, default_value = "0")]
        actual_hours: Decimal,

        /// Difficulty from 1 to 5
        #[arg(short, long)]
        difficulty: u8,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all projects by name
    List,

    /// Show one project with materials, steps and categories
    Show {
        /// Project id
        id: i64,
    },

    /// Change project details; omitted fields keep their current values
    Update {
        /// Project id
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        estimated_hours: Option<Decimal>,

        #[arg(short, long)]
        actual_hours: Option<Decimal>,

        #[arg(short, long)]
        difficulty: Option<u8>,

        #[arg(short, long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        /// Remove the notes
        #[arg(long)]
        clear_notes: bool,
    },

    /// Delete a project and everything attached to it
    Delete {
        /// Project id
        id: i64,
    },

    /// Add a material to a project
    AddMaterial {
        /// Project id
        id: i64,

        /// Material name
        name: String,

        /// Quantity needed
        #[arg(short = 'q', long)]
        quantity: Option<i32>,

        /// Unit cost
        #[arg(short, long)]
        cost: Option<Decimal>,
    },

    /// Append a step to a project
    AddStep {
        /// Project id
        id: i64,

        /// Step description
        text: String,

        /// Explicit position; defaults to after the last step
        #[arg(short, long)]
        order: Option<i32>,
    },

    /// Tag a project with a category, creating it if needed
    AddCategory {
        /// Project id
        id: i64,

        /// Category name
        name: String,
    },

    /// List all categories
    Categories,
}
