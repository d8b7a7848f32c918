use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "slotplan", version, about = "Slotplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and a contract file
    Validate {
        /// Path to a contract markdown file
        contract: std::path::PathBuf,
    },
    /// Contract management
    Contract {
        #[command(subcommand)]
        action: commands::contract::ContractAction,
    },
    /// Issue tracker synchronization
    Issues {
        #[command(subcommand)]
        action: commands::issues::IssuesAction,
    },
    /// Compute the slot schedule and emit calendar events
    Plan {
        /// Project directory name under the configured projects root
        project: String,
        /// First day considered for placement (YYYY-MM-DD, default today)
        #[arg(long)]
        start: Option<String>,
        /// Print the schedule without creating events or labeling issues
        #[arg(long)]
        dry_run: bool,
    },
    /// Repository README synchronization
    Readme {
        #[command(subcommand)]
        action: commands::readme::ReadmeAction,
    },
    /// Authentication management for integrations
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Validate { contract } => commands::validate::run(&contract),
        Commands::Contract { action } => commands::contract::run(action),
        Commands::Issues { action } => commands::issues::run(action),
        Commands::Plan {
            project,
            start,
            dry_run,
        } => commands::plan::run(&project, start.as_deref(), dry_run),
        Commands::Readme { action } => commands::readme::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
