use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nimby-rails-dataset")]
#[command(version, about = "Reconcile NIMBY Rails exports into a SQLite dataset")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (repeat for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the geo and timetable exports and write the dataset
    Build {
        /// GeoJSON export (station previews and map features)
        #[arg(short, long)]
        geo: PathBuf,

        /// Timetable export (stations, lines and stops)
        #[arg(short, long)]
        timetable: PathBuf,

        /// Output SQLite database path
        output_db: PathBuf,

        /// Replace the output database if it already exists
        #[arg(short, long)]
        force: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the dataset schema as SQL
    Schema,

    /// Show row counts and check integrity of a built dataset
    Inspect {
        /// SQLite database to inspect
        db: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
