//! Dyecraft - command line entry point
//!
//! Scores cloth files, inspects the level curve and reward table, and runs a
//! seeded workshop simulation against an in-memory store.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dyecraft::core::config::{set_config, EngineConfig};
use dyecraft::core::error::Result;
use dyecraft::core::types::OwnerId;
use dyecraft::craft::{random_cloth, Layer};
use dyecraft::progression::{level_info, reward_for_label, PlayerProgress};
use dyecraft::retention::InMemoryCreationStore;
use dyecraft::scoring::score_cloth;
use dyecraft::workshop::{ActivityFeed, Workshop};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tokio::runtime::Runtime;

/// Dye workshop scoring and progression tools
#[derive(Parser, Debug)]
#[command(name = "dyecraft")]
#[command(about = "Score dye cloths and inspect player progression")]
struct Args {
    /// Engine config TOML (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a cloth from a JSON array of layers ("-" reads stdin)
    Score { file: PathBuf },

    /// Show the level reached with a cumulative experience total
    Level {
        #[arg(allow_hyphen_values = true)]
        exp: i64,
    },

    /// Show the reward for a grade (C, B, A, S, SS, SSS)
    Reward { grade: String },

    /// Submit random cloths for one player and report progression
    Simulate {
        /// Random seed for deterministic runs
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of submissions
        #[arg(long, default_value_t = 10)]
        rounds: u32,

        /// Maximum layers per generated cloth
        #[arg(long, default_value_t = 6)]
        max_layers: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dyecraft=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if set_config(config.clone()).is_err() {
        tracing::warn!("Engine config already initialized; ignoring --config");
    }

    match args.command {
        Command::Score { file } => {
            let layers = read_layers(&file)?;
            let result = score_cloth(&layers);
            if args.json {
                print_json(&result)?;
            } else {
                println!("Layers:     {}", layers.len());
                println!("Color:      {:.1}", result.color);
                println!("Pattern:    {:.1}", result.pattern);
                println!("Creativity: {:.1}", result.creativity);
                println!("Technique:  {:.1}", result.technique);
                println!("Total:      {} ({})", result.total, result.grade);
            }
        }
        Command::Level { exp } => {
            let info = level_info(exp)?;
            if args.json {
                print_json(&info)?;
            } else {
                println!(
                    "Level {} - {}/{} exp ({:.0}%)",
                    info.level,
                    info.current_level_exp,
                    info.exp_to_next_level,
                    info.progress * 100.0
                );
            }
        }
        Command::Reward { grade } => {
            let reward = reward_for_label(&grade)?;
            if args.json {
                print_json(&reward)?;
            } else {
                println!(
                    "Grade {}: {} exp, {} currency",
                    grade.trim().to_ascii_uppercase(),
                    reward.exp,
                    reward.currency
                );
            }
        }
        Command::Simulate {
            seed,
            rounds,
            max_layers,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(simulate(config, seed, rounds, max_layers, args.json))?;
        }
    }

    Ok(())
}

fn read_layers(file: &PathBuf) -> Result<Vec<Layer>> {
    let content = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(file)?
    };
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn simulate(
    config: EngineConfig,
    seed: u64,
    rounds: u32,
    max_layers: usize,
    json: bool,
) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let feed = Arc::new(ActivityFeed::default());
    let workshop = Workshop::new(InMemoryCreationStore::new(), Arc::new(config), feed.clone());
    let mut player = PlayerProgress::new(OwnerId::new());

    let mut submissions = Vec::with_capacity(rounds as usize);
    for round in 1..=rounds {
        let layers = random_cloth(&mut rng, &workshop.config().scoring, max_layers);
        let layer_count = layers.len();
        let submission = workshop.submit(&mut player, layers).await?;

        if !json {
            println!(
                "#{:>3} {:>2} layers -> {:>3} {:<3} +{} exp +{} currency | level {} ({:.0}%)",
                round,
                layer_count,
                submission.score.total,
                submission.score.grade,
                submission.reward.exp,
                submission.reward.currency,
                submission.level_info.level,
                submission.level_info.progress * 100.0
            );
        }
        submissions.push(submission);
    }

    let recent = workshop.recent(player.owner).await?;
    if json {
        print_json(&submissions)?;
    } else {
        println!();
        println!(
            "Final: {} exp, {} currency, {} recent of {} stored, {} feed entries",
            player.experience(),
            player.currency(),
            recent.len(),
            workshop.store().len(),
            feed.len()
        );
    }

    Ok(())
}
