mod cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "goalsmith",
    about = "Turn rough goals into SMART objectives with an AI provider chain",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5000", env = "GOALSMITH_PORT")]
        port: u16,
        /// Don't open the browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Reformulate objectives from the command line and print the JSON batch
    Process {
        /// One or more free-text objectives
        #[arg(required = true)]
        objectives: Vec<String>,
    },

    /// Generate the ikigai narrative from the four reflection answers
    Ikigai {
        /// What you love
        #[arg(long)]
        love: String,
        /// What you are good at
        #[arg(long = "good-at")]
        good_at: String,
        /// What the world needs
        #[arg(long = "world-needs")]
        world_needs: String,
        /// What you can be paid for
        #[arg(long = "paid-for")]
        paid_for: String,
    },

    /// Check connectivity of the configured providers
    Probe,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve { port, no_open } => cmd::serve::run(port, no_open),
        Commands::Process { objectives } => cmd::process::run(objectives),
        Commands::Ikigai {
            love,
            good_at,
            world_needs,
            paid_for,
        } => cmd::ikigai::run(love, good_at, world_needs, paid_for),
        Commands::Probe => cmd::probe::run(),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
