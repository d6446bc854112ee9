use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub mod access;
pub mod companion;
pub mod cross;
pub mod features;
pub mod groups;
pub mod materialize;
pub mod paths;
pub mod permute;
pub mod property;
pub mod settings;
pub mod tiles;
pub mod whole_file;

#[cfg(test)]
mod testutil;

pub use materialize::Materializer;
pub use settings::RandomiserSettings;
pub use tiles::TileGrid;

#[derive(Debug, Error)]
pub enum RandomiserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("image error in {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("tile grid {grid:?} does not fit the {width}x{height} image {}", .path.display())]
    TileOutOfBounds {
        path: PathBuf,
        grid: TileGrid,
        width: u32,
        height: u32,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RandomiserError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    Randomized(usize),
    Unknown,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub outcomes: Vec<(String, FeatureOutcome)>,
}

impl RunSummary {
    pub fn has_unknown(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| *outcome == FeatureOutcome::Unknown)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| matches!(outcome, FeatureOutcome::Failed(_)))
    }

    pub fn report(&self) -> String {
        let mut log = format!("Pack randomiser seed: {}\n", self.seed);
        for (name, outcome) in &self.outcomes {
            let line = match outcome {
                FeatureOutcome::Randomized(count) => format!("randomized {count} {name}\n"),
                FeatureOutcome::Unknown => format!("{name} could not be randomized\n"),
                FeatureOutcome::Failed(err) => format!("{name} failed: {err}\n"),
            };
            log.push_str(&line);
        }
        log.push_str("Finished randomizing!\n");
        log
    }
}

/// Seed for one feature, so that each feature's result depends only on the
/// run seed and its own name, not on what ran before it.
fn feature_seed(seed: u64, name: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325u64;
    for b in name.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001B3_u64);
    }
    seed ^ h
}

pub fn run(settings: &RandomiserSettings) -> Result<RunSummary> {
    if !settings.input_path.is_dir() {
        return Err(RandomiserError::Config(format!(
            "Input path does not exist: {}",
            settings.input_path.display()
        )));
    }

    if !settings.output_path.exists() {
        fs::create_dir_all(&settings.output_path)?;
    }

    let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(seed, input = %settings.input_path.display(), output = %settings.output_path.display(), "randomising pack");

    let io = Materializer::new(&settings.input_path, &settings.output_path);
    let registry = features::registry();
    let mut summary = RunSummary {
        seed,
        outcomes: Vec::with_capacity(settings.randomize.len()),
    };

    for name in &settings.randomize {
        let outcome = match registry.get(name.as_str()) {
            Some(feature) => {
                let mut rng = StdRng::seed_from_u64(feature_seed(seed, name));
                match feature(&io, &mut rng) {
                    Ok(count) => {
                        tracing::info!("randomized {count} {name}");
                        FeatureOutcome::Randomized(count)
                    }
                    Err(err) if settings.stop_on_error => return Err(err),
                    Err(err) => {
                        tracing::error!("{name} failed: {err}");
                        FeatureOutcome::Failed(err.to_string())
                    }
                }
            }
            None => {
                tracing::warn!("{name} could not be randomized");
                FeatureOutcome::Unknown
            }
        };
        summary.outcomes.push((name.clone(), outcome));
    }

    tracing::info!("Finished randomizing!");

    if settings.debug {
        let log_path = settings.output_path.join("randomiser_log.txt");
        fs::write(log_path, summary.report())?;
    }

    Ok(summary)
}
