mod board;
mod config;
mod food;
mod game;
mod input;
mod render;
mod snake;
mod term;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use crate::config::{GameConfig, Validate};
use crate::game::SnakeGame;
use crate::term::{Keyboard, TermManager};

pub type TermInt = u16;
pub type GridInt = u16;

#[derive(Parser)]
#[command(name = "torus-snake")]
#[command(version, about = "Snake on a wrap-around grid, in the terminal")]
struct Cli {
    /// YAML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<GridInt>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<GridInt>,

    /// Game ticks per second
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for food placement and reset directions
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective settings as YAML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_yaml_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(speed) = self.speed {
            config.ticks_per_second = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    info!(
        "starting on a {}x{} board at {} ticks/s",
        config.grid_width, config.grid_height, config.ticks_per_second
    );

    let mut game = SnakeGame::new(&config);
    let mut term = TermManager::new(game.board(), config.palette.background)?;

    term.setup()?;
    let result = game::run(&mut game, &mut term, &mut Keyboard, config.tick_interval());
    let restored = term.restore();

    if let (Err(run_err), Err(restore_err)) = (&result, &restored) {
        error!("terminal restore failed after game error {:#}: {:#}", run_err, restore_err);
    }

    info!("exited with snake length {}", game.snake().len());
    result.and(restored)
}
