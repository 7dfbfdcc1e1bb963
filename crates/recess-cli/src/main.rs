use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "recess", version, about = "Recess adaptive focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Break reward offers
    Reward {
        #[command(subcommand)]
        action: commands::reward::RewardAction,
    },
    /// Energy check-in
    Energy {
        #[command(subcommand)]
        action: commands::energy::EnergyAction,
    },
    /// Daily work target
    Target {
        #[command(subcommand)]
        action: commands::target::TargetAction,
    },
    /// Reward site list
    Sites {
        #[command(subcommand)]
        action: commands::sites::SitesAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RECESS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Reward { action } => commands::reward::run(action),
        Commands::Energy { action } => commands::energy::run(action),
        Commands::Target { action } => commands::target::run(action),
        Commands::Sites { action } => commands::sites::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
