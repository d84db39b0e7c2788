//! Grade distribution sampler
//!
//! Scores a batch of random cloths and reports how they spread across grade
//! bands. Used to sanity-check threshold and weight changes before shipping a
//! new engine config.

use std::path::PathBuf;

use ahash::AHashMap;
use clap::Parser;
use dyecraft::core::config::EngineConfig;
use dyecraft::craft::random_cloth;
use dyecraft::scoring::{Grade, Scorer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Grade distribution sampler - random cloths through the scorer
#[derive(Parser, Debug)]
#[command(name = "grade_distribution")]
#[command(about = "Score random cloths and report the grade distribution")]
struct Args {
    /// Number of cloths to sample
    #[arg(long, default_value_t = 10_000)]
    samples: usize,

    /// Maximum layers per cloth
    #[arg(long, default_value_t = 8)]
    max_layers: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config TOML to score with
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct GradeCount {
    grade: Grade,
    count: usize,
    share: f64,
}

#[derive(Serialize)]
struct Distribution {
    seed: u64,
    samples: usize,
    mean_total: f64,
    grades: Vec<GradeCount>,
}

fn main() -> dyecraft::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dyecraft=warn".into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cloths: Vec<_> = (0..args.samples)
        .map(|_| random_cloth(&mut rng, &config.scoring, args.max_layers))
        .collect();

    let scorer = Scorer::from_config(&config);
    let results = scorer.score_batch(&cloths);

    let mut counts: AHashMap<Grade, usize> = AHashMap::new();
    for result in &results {
        *counts.entry(result.grade).or_insert(0) += 1;
    }

    let samples = results.len();
    let mean_total = if samples == 0 {
        0.0
    } else {
        results.iter().map(|r| r.total as f64).sum::<f64>() / samples as f64
    };

    let distribution = Distribution {
        seed,
        samples,
        mean_total,
        grades: Grade::ALL
            .iter()
            .map(|grade| {
                let count = counts.get(grade).copied().unwrap_or(0);
                GradeCount {
                    grade: *grade,
                    count,
                    share: if samples == 0 {
                        0.0
                    } else {
                        count as f64 / samples as f64
                    },
                }
            })
            .collect(),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&distribution)?);
    } else {
        println!(
            "{} cloths (seed {}), mean total {:.1}",
            distribution.samples, distribution.seed, distribution.mean_total
        );
        for entry in &distribution.grades {
            let bar = "#".repeat((entry.share * 50.0).round() as usize);
            println!(
                "{:>3} {:>6} {:>5.1}% {}",
                entry.grade.label(),
                entry.count,
                entry.share * 100.0,
                bar
            );
        }
    }

    Ok(())
}
