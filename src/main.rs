use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drillsmith::cli::commands;
use drillsmith::cli::commands::generate::GenerateOptions;

#[derive(Parser)]
#[command(name = "drillsmith")]
#[command(version, about = "Structured golf practice drill generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, help = "Bind address (overrides server.host)")]
        host: Option<String>,
        #[arg(long, short, help = "Port (overrides server.port)")]
        port: Option<u16>,
    },

    /// Generate a single drill and print it as JSON
    Generate {
        #[arg(long, short, help = "What the player wants to work on")]
        goal: String,
        #[arg(long, help = "Handicap, e.g. 18 or +2")]
        hcp: Option<String>,
        #[arg(long = "time", help = "Minutes available (5-60)")]
        time_minutes: Option<u32>,
        #[arg(long, help = "putting, chipping, pitching, bunker, wedges, driver (comma-separated)")]
        shot_area: Option<String>,
        #[arg(long, help = "driving_range, short_game_area, on_course, indoor_simulator")]
        practice_area: Option<String>,
        #[arg(long, help = "launch_monitor or visual_manual")]
        measurement: Option<String>,
        #[arg(long = "flag-distance", help = "Flag distance in metres (repeatable)")]
        flag_distances: Vec<f64>,
        #[arg(long, help = "JSON file with a drill to remix")]
        base: Option<PathBuf>,
        #[arg(long, requires = "owner", help = "Save the drill to the local store")]
        save: bool,
        #[arg(long, help = "Owner id used when saving")]
        owner: Option<String>,
        #[arg(long, requires = "save", help = "Update this saved drill instead of inserting")]
        existing_id: Option<String>,
        #[arg(long, help = "LLM provider (openai, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Check that the configured model provider is reachable
    Check {
        #[arg(long, help = "LLM provider (openai, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Validate and list the bundled few-shot examples
    Corpus {
        #[arg(long, help = "Also print the full system prompt")]
        prompt: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::serve::run(host, port))?;
        }
        Commands::Generate {
            goal,
            hcp,
            time_minutes,
            shot_area,
            practice_area,
            measurement,
            flag_distances,
            base,
            save,
            owner,
            existing_id,
            provider,
            model,
        } => {
            let options = GenerateOptions {
                goal,
                hcp,
                time_minutes,
                shot_area,
                practice_area,
                measurement,
                flag_distances,
                base_drill: base,
                save_as: if save { owner } else { None },
                existing_id,
                provider,
                model,
            };
            let rt = Runtime::new()?;
            rt.block_on(commands::generate::run(options))?;
        }
        Commands::Check { provider, model } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::check::run(provider, model))?;
        }
        Commands::Corpus { prompt } => {
            commands::corpus::run(prompt)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => commands::config::show(&format)?,
            ConfigAction::Path => commands::config::path()?,
        },
    }

    Ok(())
}
