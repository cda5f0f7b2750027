use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "occupancy-report")]
#[command(about = "Housekeeping occupancy tracker and shift report generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the attendant form in the browser
    Web {
        /// Port to listen on (default: OCCUPANCY_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (default: OCCUPANCY_BIND or 0.0.0.0)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Build a report from a room status CSV (room,status,occupancy)
    Report {
        /// Room status CSV file
        #[arg(short, long, required = true)]
        rooms: PathBuf,

        /// Report date (default: today, e.g. "Dec. 14, 2025")
        #[arg(short, long)]
        date: Option<String>,

        /// Attendant name
        #[arg(short, long, default_value = "")]
        attendant: String,

        /// Extra item as TYPE=ROOM, may be repeated
        #[arg(short, long = "extra")]
        extras: Vec<String>,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the WhatsApp share link
        #[arg(long)]
        share_link: bool,
    },
}
