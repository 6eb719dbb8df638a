use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use frei0r_selector::config::LoadOptions;
use frei0r_selector::plugins::{LibraryProbe, PluginProbe, Scanner};
use frei0r_selector::{Catalog, Config, Node, daemon};

/// frei0r-select - offer frei0r plugins as a selectable parameter
#[derive(Parser)]
#[command(name = "frei0r-select", version, about)]
struct Cli {
    /// Directory to scan for frei0r plugins
    #[arg(short, long, env = "FREI0R_PLUGIN_PATH")]
    path: Option<PathBuf>,

    /// Base URL of the loader service
    #[arg(long, env = "FREI0R_LOADER_URL")]
    loader_url: Option<String>,

    /// Address to bind the control surface to
    #[arg(long, env = "FREI0R_SELECTOR_BIND")]
    bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(long, env = "FREI0R_SELECTOR_PORT")]
    port: Option<u16>,

    /// Config file (defaults to ~/.config/frei0r-selector/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan and print the selectable plugins
    List,
    /// Print the info record of a single plugin file
    Probe {
        /// Shared library to probe
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,frei0r_selector=info",
        1 => "info,frei0r_selector=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = LoadOptions {
        config_file: cli.config,
        plugin_path: cli.path,
        loader_url: cli.loader_url,
        bind: cli.bind,
        port: cli.port,
    };
    let config = Config::load_with_options(&options)?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Command::List) => cmd_list(&config),
        Some(Command::Probe { file }) => cmd_probe(&file),
        None => {
            tracing::info!(
                path = %config.plugins.path.display(),
                loader = %config.loader.url,
                port = config.server.port,
                "starting frei0r selector"
            );
            let node = Node::new(&config);
            node.run(daemon::shutdown_signal()).await?;
            Ok(())
        }
    }
}

/// Print the selectable plugins
fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let scanner = Scanner::new(LibraryProbe).with_excluded(config.plugins.exclude.clone());
    let catalog = Catalog::scan(&scanner, config);

    if catalog.records.is_empty() {
        println!("No selectable plugins found");
        return Ok(());
    }

    for record in &catalog.records {
        println!(
            "{:<32} {:<7} {}",
            record.name,
            record.plugin_type.to_string(),
            record.path.display()
        );
    }
    Ok(())
}

/// Print one plugin's info record
fn cmd_probe(file: &std::path::Path) -> anyhow::Result<()> {
    let record = LibraryProbe.probe(file)?;

    println!("name:        {}", record.name);
    println!("type:        {}", record.plugin_type);
    println!("author:      {}", record.author);
    println!("color model: {}", record.color_model.as_str());
    println!("frei0r:      {}", record.frei0r_version);
    println!("version:     {}.{}", record.major_version, record.minor_version);
    println!("params:      {}", record.num_params);
    if !record.explanation.is_empty() {
        println!("about:       {}", record.explanation);
    }
    Ok(())
}
