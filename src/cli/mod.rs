//! CLI command definitions and handlers

mod predict;
mod serve;
mod train;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate the held-out split fraction.
fn parse_split(s: &str) -> Result<f64, String> {
    let v: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..0.9).contains(&v) {
        Err("test split must be in [0.0, 0.9)".to_string())
    } else {
        Ok(v)
    }
}

/// Aerosat - airline passenger satisfaction prediction
#[derive(Parser, Debug)]
#[command(name = "aerosat")]
#[command(
    version,
    about = "Train a passenger satisfaction tree model and serve predictions",
    after_help = "\
Examples:
  aerosat train survey.csv                  Train and save artifacts to ./artifacts
  aerosat train survey.csv -o models/v2     Train into a custom directory
  aerosat serve                             Serve predictions on 127.0.0.1:5000
  aerosat predict batch.csv -o scored.csv   Score a CSV offline"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the satisfaction model from a survey CSV and save the artifacts
    Train {
        /// Path to the training CSV
        data: PathBuf,

        /// Directory to write the artifact bundle into
        #[arg(long, short = 'o', default_value = "artifacts")]
        output: PathBuf,

        /// Number of boosting iterations
        #[arg(long, default_value = "60")]
        trees: usize,

        /// Maximum tree depth
        #[arg(long, default_value = "6")]
        max_depth: u32,

        /// Shrinkage per iteration
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,

        /// Held-out fraction for evaluation
        #[arg(long, default_value = "0.2", value_parser = parse_split)]
        test_split: f64,

        /// Shuffle seed for the train/test split
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Serve the web form and prediction API
    Serve {
        /// Directory holding the trained artifact bundle
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(long, short = 'p', default_value = "5000")]
        port: u16,
    },

    /// Score a CSV offline and write the annotated rows
    Predict {
        /// Path to the input CSV
        input: PathBuf,

        /// Directory holding the trained artifact bundle
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,

        /// Output CSV path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Train {
            data,
            output,
            trees,
            max_depth,
            learning_rate,
            test_split,
            seed,
        } => train::run(&data, &output, trees, max_depth, learning_rate, test_split, seed),

        Commands::Serve {
            artifacts,
            host,
            port,
        } => serve::run(&artifacts, &host, port),

        Commands::Predict {
            input,
            artifacts,
            output,
        } => predict::run(&input, &artifacts, output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split_bounds() {
        assert!(parse_split("0.2").is_ok());
        assert!(parse_split("0.0").is_ok());
        assert!(parse_split("0.9").is_err());
        assert!(parse_split("abc").is_err());
    }

    #[test]
    fn test_cli_parses_train_defaults() {
        let cli = Cli::try_parse_from(["aerosat", "train", "data.csv"]).unwrap();
        match cli.command {
            Commands::Train { trees, seed, .. } => {
                assert_eq!(trees, 60);
                assert_eq!(seed, 42);
            }
            _ => panic!("expected train command"),
        }
    }

    #[test]
    fn test_cli_parses_serve_port() {
        let cli = Cli::try_parse_from(["aerosat", "serve", "-p", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, 8080),
            _ => panic!("expected serve command"),
        }
    }
}
