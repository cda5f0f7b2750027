mod cli;
mod config;
mod display;
mod error;
mod form;
mod parser;
mod rooms;
mod web;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::load_settings;
use display::write_report_to_file;
use error::AppError;
use form::ShiftForm;
use parser::{add_extra_arg, apply_records, load_room_statuses};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so a report printed to stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Web { port, bind } => {
            let settings = load_settings().with_overrides(bind, port);
            tracing::info!("Access the form at http://localhost:{}", settings.port);
            web::start_server(settings).await?;
        }
        Commands::Report {
            rooms,
            date,
            attendant,
            extras,
            output,
            share_link,
        } => {
            let mut form = date.map(ShiftForm::new).unwrap_or_else(ShiftForm::for_today);
            form.set_attendant(attendant);

            tracing::info!(path = %rooms.display(), "Loading room statuses");
            let records = load_room_statuses(&rooms)?;
            apply_records(&mut form, &records)?;
            for extra in &extras {
                add_extra_arg(&mut form, extra)?;
            }
            if form.rooms.is_empty() {
                tracing::warn!("No room statuses found, every room will be reported unset");
            }
            tracing::info!(rooms = form.rooms.len(), extras = form.extras.len(), "Room statuses loaded");

            let report = form.generate_report().to_string();
            match output {
                Some(path) => {
                    write_report_to_file(&report, &path).map_err(AppError::from)?;
                    tracing::info!(path = %path.display(), "Report saved");
                }
                None => print!("{}", report),
            }

            if share_link {
                println!("{}", form.share_url()?);
            }
        }
    }

    Ok(())
}
