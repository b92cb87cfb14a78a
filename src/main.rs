use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mfnav::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for mfnav::AppCommand {
    fn from(cmd: Commands) -> mfnav::AppCommand {
        match cmd {
            Commands::Serve { bind } => mfnav::AppCommand::Serve { bind_address: bind },
            Commands::Nav {
                mutual_fund_id,
                start,
                end,
            } => mfnav::AppCommand::Nav {
                mutual_fund_id,
                start,
                end,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the HTTP API
    Serve {
        /// Address to listen on, overrides the configured one
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the NAV history of a scheme as JSON
    Nav {
        /// Scheme code of the mutual fund
        mutual_fund_id: String,
        /// Start of the period (dd-mm-yyyy)
        #[arg(long)]
        start: Option<String>,
        /// End of the period (dd-mm-yyyy)
        #[arg(long)]
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => mfnav::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = mfnav::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
server:
  bind_address: "0.0.0.0:3000"

providers:
  mfapi:
    base_url: "https://api.mfapi.in/mf"

# Bearer token for /api/cron. The CRON_SECRET environment variable wins over this.
# cron_secret: "change-me"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
