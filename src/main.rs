use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use lpcalc::cli::power::PowerArgs;
use lpcalc::core::log::init_logging;

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

impl From<Commands> for lpcalc::AppCommand {
    fn from(cmd: Commands) -> lpcalc::AppCommand {
        match cmd {
            Commands::Lp => lpcalc::AppCommand::Lp,
            Commands::Items { actor } => lpcalc::AppCommand::Items { actor },
            Commands::Power {
                actor,
                power,
                toggle,
                select,
            } => lpcalc::AppCommand::Power(PowerArgs {
                actor,
                power,
                toggles: toggle,
                selections: select,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display LP spend for all player-owned actors
    Lp,
    /// Display the LP cost of each item an actor owns
    Items {
        /// Actor name or id
        #[arg(short, long)]
        actor: String,
    },
    /// Work out the PP cost of casting a power with modifiers
    Power {
        /// Actor name or id
        #[arg(short, long)]
        actor: String,
        /// Power name
        #[arg(short, long)]
        power: String,
        /// Modifier id to switch on (repeatable)
        #[arg(short, long)]
        toggle: Vec<String>,
        /// Radio group choice as GROUP=OPTION (repeatable)
        #[arg(short, long)]
        select: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => lpcalc::cli::setup::setup(),
        Some(cmd) => lpcalc::run_command(cmd.into(), cli.config_path.as_deref()),
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
