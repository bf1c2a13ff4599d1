//! Command-line entry point for the donor scheduler.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use donor_scheduler::api::{AppState, create_router};
use donor_scheduler::clinic;
use donor_scheduler::config::{ClinicConfig, ConfigLoader};
use donor_scheduler::error::{SchedulerError, SchedulerResult};
use donor_scheduler::models::RecordId;
use donor_scheduler::store::{MemoryStore, Store};
use donor_scheduler::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "donor-scheduler",
    about = "Donor eligibility and appointment scheduling for a blood donation clinic",
    version
)]
struct Cli {
    /// Directory holding clinic.yaml and schedule.yaml
    #[arg(long, default_value = "./config")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the donors whose next donation falls due soon
    Queue(QueueArgs),
    /// Print the capacity and booking verdict for a date
    Availability(AvailabilityArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct QueueArgs {
    /// Evaluate as of this date instead of today
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Override the configured look-ahead window
    #[arg(long)]
    window_days: Option<i64>,
}

#[derive(Args, Debug)]
struct AvailabilityArgs {
    /// The date to check (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
    /// Assess the date for this donor
    #[arg(long)]
    donor_id: Option<RecordId>,
    /// Evaluate as of this date instead of today
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> SchedulerResult<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load(&cli.config)?.into_config();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => serve(config, args).await,
        Command::Queue(args) => print_queue(&config, args),
        Command::Availability(args) => print_availability(&config, args),
    }
}

fn open_store(config: &ClinicConfig) -> SchedulerResult<MemoryStore> {
    match &config.settings().storage.data_file {
        Some(path) => MemoryStore::open(path, config.default_schedule().clone()),
        None => Ok(MemoryStore::new(config.default_schedule().clone())),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> SchedulerResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|err| SchedulerError::Persistence {
        path: "stdout".to_string(),
        message: err.to_string(),
    })?;
    println!("{json}");
    Ok(())
}

async fn serve(mut config: ClinicConfig, mut args: ServeArgs) -> SchedulerResult<()> {
    if let Some(host) = args.host.take() {
        config.settings_mut().server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.settings_mut().server.port = port;
    }

    telemetry::init(&config.settings().telemetry)?;

    let mut store = open_store(&config)?;
    if let Some(admin) = &config.settings().bootstrap_admin {
        if let Some(created) = clinic::bootstrap_admin(&mut store, admin.to_new_donor())? {
            info!(donor_id = created.id, email = %created.email, "Bootstrap admin created");
        }
    }

    let address = format!(
        "{}:{}",
        config.settings().server.host,
        config.settings().server.port
    );
    let server_error = |err: std::io::Error| SchedulerError::Server {
        address: address.clone(),
        message: err.to_string(),
    };

    let donors = store.list_donors().len();
    let app = create_router(AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(server_error)?;

    info!(%address, donors, "Donor scheduler listening");

    axum::serve(listener, app).await.map_err(server_error)
}

fn print_queue(config: &ClinicConfig, args: QueueArgs) -> SchedulerResult<()> {
    let store = open_store(config)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let window = args
        .window_days
        .unwrap_or(config.scheduling().expiring_window_days);

    print_json(&clinic::expiring_donors(&store, today, window))
}

fn print_availability(config: &ClinicConfig, args: AvailabilityArgs) -> SchedulerResult<()> {
    let store = open_store(config)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    print_json(&clinic::availability(&store, args.date, args.donor_id, today)?)
}
