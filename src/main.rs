use anyhow::Result;
use arcade_snake::app::App;
use arcade_snake::commentary::{ArcadeAnnouncer, Commentator};
use arcade_snake::game::GameConfig;
use arcade_snake::storage::JsonScoreStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Terminal snake with post-game arcade commentary")]
struct Cli {
    /// Side length of the square game grid, in cells
    #[arg(long, default_value = "20")]
    grid_size: usize,

    /// File the best score is persisted to
    #[arg(long, default_value = "snake_highscore.json")]
    high_score_file: PathBuf,

    /// Skip the post-game commentary entirely
    #[arg(long)]
    no_commentary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the TUI.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = GameConfig::new(cli.grid_size);
    config.validate()?;

    let store = Box::new(JsonScoreStore::new(cli.high_score_file));
    let commentator = if cli.no_commentary {
        None
    } else {
        Some(Arc::new(ArcadeAnnouncer) as Arc<dyn Commentator>)
    };

    App::new(config, store, commentator).run().await
}
