use airkeys::config::ClientConfig;
use airkeys::error::{ClResult, ClientError};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON client configuration. Command-line flags override its values
    #[arg(global = true, short, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Type on the virtual keyboard
    Run(cmd::run::RunArgs),
    /// Print the on-screen key grid
    Layout(cmd::layout::LayoutArgs),
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// File values first, then whatever the user typed explicitly.
fn resolve_config(
    path: Option<&str>,
    cli: &ClientConfig,
    matches: Option<&ArgMatches>,
) -> ClResult<ClientConfig> {
    let mut config = match path {
        Some(p) => {
            info!("📂 Loading config: {}", p);
            ClientConfig::load_from_file(p)?
        }
        None => cli.clone(),
    };
    if let Some(m) = matches {
        config.merge_from_cli(cli, m);
    }
    config.validate()?;
    Ok(config)
}

fn report_fatal(e: &ClientError) {
    if e.is_capture_unavailable() {
        error!("🚫 {}", e);
        eprintln!("\nNo video source available. Point --frames at a directory of images.");
    } else {
        error!("❌ {}", e);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_tracing(cli.debug);

    let result = match &cli.command {
        Commands::Run(args) => {
            match resolve_config(
                cli.config.as_deref(),
                &args.client,
                matches.subcommand_matches("run"),
            ) {
                Ok(config) => cmd::run::run(args, config).await,
                Err(e) => Err(e),
            }
        }
        Commands::Layout(args) => {
            match resolve_config(cli.config.as_deref(), &ClientConfig::default(), None) {
                Ok(config) => cmd::layout::run(args, &config),
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        report_fatal(&e);
        process::exit(1);
    }
}
