mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "forgeboard",
    about = "Gamified engineering analytics — scores, badges, DORA profiles, and AI personas",
    version,
    propagate_version = true
)]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "FORGEBOARD_DB", default_value = "forgeboard.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,

    /// Load a small deterministic demo dataset for local development
    Seed,

    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5000")]
        port: u16,

        /// generateContent endpoint for the persona classifier
        #[arg(
            long,
            env = "FORGEBOARD_CLASSIFIER_URL",
            default_value = forgeboard_core::classifier::DEFAULT_ENDPOINT
        )]
        classifier_url: String,

        /// API key for the classifier service
        #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
        api_key: String,

        /// Classifier request timeout in seconds
        #[arg(long, default_value = "20")]
        timeout_secs: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&cli.db),
        Commands::Seed => cmd::seed::run(&cli.db),
        Commands::Serve {
            port,
            classifier_url,
            api_key,
            timeout_secs,
        } => cmd::serve::run(&cli.db, port, &classifier_url, &api_key, timeout_secs),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
