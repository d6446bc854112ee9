use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pack_randomiser_core::{features, run, RandomiserSettings, Result, RunSummary};

const EXIT_FAILURE: i32 = 1;
const EXIT_UNKNOWN_FEATURE: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "pack-randomiser",
    version,
    about = "Shuffles the files, properties and textures of a game resource pack"
)]
struct Args {
    /// JSON settings file with inputPath, outputPath and randomize.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Feature to run. Repeat for several; replaces the config's list.
    #[arg(long = "feature", value_name = "NAME")]
    features: Vec<String>,

    #[arg(long, default_value_t = false)]
    stop_on_error: bool,

    /// Also write randomiser_log.txt into the output folder.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Exit non-zero when a feature was unknown or failed.
    #[arg(long, default_value_t = false)]
    strict: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Print the available feature names and exit.
    #[arg(long, default_value_t = false)]
    list_features: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Loads the config file, unless both roots were given on the command line
/// and there is no config to read, then applies the command-line overrides.
fn build_settings(args: &Args) -> Result<RandomiserSettings> {
    let mut settings = match (&args.input, &args.output) {
        (Some(input), Some(output)) if !args.config.exists() => {
            RandomiserSettings::new(input, output)
        }
        _ => RandomiserSettings::load(&args.config)?,
    };

    if let Some(input) = &args.input {
        settings.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        settings.output_path = output.clone();
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if !args.features.is_empty() {
        settings.randomize = args.features.clone();
    }
    settings.stop_on_error |= args.stop_on_error;
    settings.debug |= args.debug;

    Ok(settings)
}

fn strict_exit_code(summary: &RunSummary) -> Option<i32> {
    if summary.has_unknown() {
        Some(EXIT_UNKNOWN_FEATURE)
    } else if summary.has_failures() {
        Some(EXIT_FAILURE)
    } else {
        None
    }
}

fn main() {
    let args = Args::parse();

    if args.list_features {
        for name in features::names() {
            println!("{name}");
        }
        return;
    }

    init_logging(args.verbose);

    let settings = match build_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    };
    tracing::debug!(?settings, "resolved settings");

    match run(&settings) {
        Ok(summary) if args.strict => {
            if let Some(code) = strict_exit_code(&summary) {
                eprintln!("Error: not every requested feature was randomized");
                std::process::exit(code);
            }
        }
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pack_randomiser_core::FeatureOutcome;
    use std::fs;

    fn summary(outcomes: &[(&str, FeatureOutcome)]) -> RunSummary {
        RunSummary {
            seed: 0,
            outcomes: outcomes
                .iter()
                .map(|(name, outcome)| (name.to_string(), outcome.clone()))
                .collect(),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn roots_on_the_command_line_need_no_config() {
        let args = Args::try_parse_from([
            "pack-randomiser",
            "--config",
            "/definitely/not/here.json",
            "--input",
            "in",
            "--output",
            "out",
            "--feature",
            "recipes",
            "--feature",
            "tags",
            "--seed",
            "5",
        ])
        .unwrap();

        let settings = build_settings(&args).unwrap();
        assert_eq!(settings.input_path, PathBuf::from("in"));
        assert_eq!(settings.output_path, PathBuf::from("out"));
        assert_eq!(settings.randomize, vec!["recipes", "tags"]);
        assert_eq!(settings.seed, Some(5));
    }

    #[test]
    fn flags_override_the_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = temp.path().join("config.json");
        fs::write(
            &config,
            r#"{"inputPath": "a", "outputPath": "b", "randomize": ["lootTables"], "seed": 1}"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "pack-randomiser",
            "--config",
            config.to_str().unwrap(),
            "--output",
            "elsewhere",
            "--stop-on-error",
        ])
        .unwrap();

        let settings = build_settings(&args).unwrap();
        assert_eq!(settings.input_path, PathBuf::from("a"));
        assert_eq!(settings.output_path, PathBuf::from("elsewhere"));
        assert_eq!(settings.randomize, vec!["lootTables"]);
        assert_eq!(settings.seed, Some(1));
        assert!(settings.stop_on_error);
    }

    #[test]
    fn strict_exit_codes() {
        let clean = summary(&[("recipes", FeatureOutcome::Randomized(3))]);
        assert_eq!(strict_exit_code(&clean), None);

        let failed = summary(&[
            ("recipes", FeatureOutcome::Randomized(3)),
            ("sounds", FeatureOutcome::Failed("IO error".to_string())),
        ]);
        assert_eq!(strict_exit_code(&failed), Some(EXIT_FAILURE));

        let both = summary(&[
            ("dragons", FeatureOutcome::Unknown),
            ("sounds", FeatureOutcome::Failed("IO error".to_string())),
        ]);
        assert_eq!(strict_exit_code(&both), Some(EXIT_UNKNOWN_FEATURE));
    }

    #[test]
    fn missing_config_without_roots_fails() {
        let args =
            Args::try_parse_from(["pack-randomiser", "--config", "/definitely/not/here.json"])
                .unwrap();
        assert!(build_settings(&args).is_err());
    }
}
