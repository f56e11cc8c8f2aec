use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::{Args, Parser, Subcommand};
use random_matchmaker::config::{LoggingSettings, Settings};
use random_matchmaker::core::{validate_params, Matchmaker};
use random_matchmaker::models::MatchParams;
use random_matchmaker::routes::{self, AppState};
use random_matchmaker::runner::{self, RunFiles};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "random-matchmaker")]
#[command(about = "Random Matchmaker - random dating assignments without repeating past assignments", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/default.toml and config/local.toml)
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make new assignments from CSV files and append them to the history file
    Run(RunArgs),

    /// Serve the matchmaking HTTP API
    Serve {
        #[arg(long, value_name = "HOST")]
        host: Option<String>,

        #[arg(short = 'p', long, value_name = "PORT")]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Registrants who opted in (columns: first name, last name, gender)
    #[arg(value_name = "REGISTRATION_FILE")]
    registration_file: PathBuf,

    /// Past pairings; created if missing and updated with the new pairs
    /// (columns: date, male first name, male last name, female first name, female last name)
    #[arg(value_name = "HISTORY_FILE")]
    history_file: PathBuf,

    /// Where the new assignments are written; overwritten each run
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: PathBuf,

    /// Names that must never be matched (columns: first name, last name, gender)
    #[arg(short = 'd', long, value_name = "PATH")]
    deny_list_file: Option<PathBuf>,

    /// Maximum number of shuffles to try; must be greater than one [default: 100]
    #[arg(short = 'i', long, value_name = "INT")]
    max_iterations: Option<usize>,

    /// Largest fraction of the opposite group someone may already have been
    /// paired with; must be in (0, 1] [default: 1.0]
    #[arg(short = 't', long, value_name = "FLOAT", allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Seed for reproducible shuffles
    #[arg(short = 's', long, value_name = "INT")]
    seed: Option<u64>,

    /// Print the resulting assignments as well as saving them
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl RunArgs {
    fn params(&self, defaults: MatchParams) -> MatchParams {
        MatchParams {
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            seed: self.seed.or(defaults.seed),
            ..defaults
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn run(args: RunArgs, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let params = args.params(settings.matching.params());
    let files = RunFiles {
        registrations: args.registration_file,
        history: args.history_file,
        output: args.output_file,
        deny_list: args.deny_list_file,
    };

    let stdout = std::io::stdout();
    runner::run(&files, params, args.verbose, chrono::Utc::now(), &mut stdout.lock())?;
    Ok(())
}

async fn serve(settings: Settings, host: Option<String>, port: Option<u16>) -> Result<(), Box<dyn Error>> {
    let params = settings.matching.params();
    validate_params(&params)?;

    let app_state = AppState {
        matchmaker: Matchmaker::new(params),
    };

    let host = host.unwrap_or(settings.server.host);
    let port = port.unwrap_or(settings.server.port);
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}

#[actix_web::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    let result = match cli.command {
        Commands::Run(args) => run(args, &settings),
        Commands::Serve { host, port } => serve(settings, host, port).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
