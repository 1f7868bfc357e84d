//! Train command - fit the model and persist the artifact bundle

use anyhow::Result;
use std::path::Path;

use crate::classifier::TreeParams;
use crate::train::{self, TrainConfig};

#[allow(clippy::too_many_arguments)]
pub fn run(
    data: &Path,
    output: &Path,
    trees: usize,
    max_depth: u32,
    learning_rate: f64,
    test_split: f64,
    seed: u64,
) -> Result<()> {
    let config = TrainConfig {
        params: TreeParams {
            trees,
            max_depth,
            learning_rate,
        },
        test_split,
        seed,
    };

    let report = train::train(data, output, &config)?;

    println!("Training complete.");
    println!(
        "  Rows: {} loaded, {} usable",
        report.rows_loaded, report.rows_kept
    );
    println!(
        "  Split: {} train / {} test",
        report.train_size, report.test_size
    );
    println!("  Held-out accuracy: {:.2}%", report.accuracy * 100.0);
    println!("  Artifacts written to {}", output.display());
    Ok(())
}
