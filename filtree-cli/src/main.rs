mod render;

use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use filtree_lib::{Configuration, Manager, Node, Settings, ViewRegistry};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Filter and sort a JSON tree the way the dashboard filter does.
#[derive(Debug, Parser)]
#[command(name = "filtree", version)]
struct Cli {
    /// JSON file describing the tree
    tree: PathBuf,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Search text to apply
    #[arg(long, default_value = "")]
    filter: String,

    /// Print hidden nodes too
    #[arg(long)]
    all: bool,

    /// Debug log destination
    #[arg(long, default_value = "filtree.log")]
    log: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Ok(log_file) = File::create(&cli.log) {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let tree = fs::read_to_string(&cli.tree)
        .with_context(|| format!("failed to read {}", cli.tree.display()))?;
    let root = Node::from_json(&tree).context("invalid tree document")?;

    let settings = match &cli.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };

    let manager = Manager::new(
        root,
        Configuration::from_settings(&settings),
        ViewRegistry::headless(),
    )?;
    manager.on_filter_change(&cli.filter);
    log::debug!("Applied filter '{}'", cli.filter);

    print!("{}", render::render(&manager, cli.all));
    manager.close();
    Ok(())
}
