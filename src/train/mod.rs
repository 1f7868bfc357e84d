//! Training orchestrator
//!
//! Offline pipeline: load the raw survey CSV, clean it, derive the binning
//! config and label encoders from the observed data, fit the tree on an
//! 80/20 split, evaluate on the held-out portion, and persist the artifact
//! bundle the prediction service consumes.
//!
//! Training and inference share the binning/encoding code in
//! `crate::pipeline`, so the persisted artifacts are byte-identical
//! reconstructions of what the model saw during fitting.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::bundle::ArtifactBundle;
use crate::classifier::{train_tree, SatisfactionModel, TreeParams};
use crate::dataset::RawTable;
use crate::models::{PassengerRecord, DROP_COLUMNS, TARGET_COLUMN};
use crate::pipeline::{build_vector, BinningConfig, EncoderTable, LabelEncoders};

/// Training run configuration.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub params: TreeParams,
    /// Held-out fraction for evaluation (0.0 - 0.9).
    pub test_split: f64,
    /// Shuffle seed, for reproducible splits.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            params: TreeParams::default(),
            test_split: 0.2,
            seed: 42,
        }
    }
}

/// Summary of a completed training run.
#[derive(Debug)]
pub struct TrainReport {
    pub rows_loaded: usize,
    pub rows_kept: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
}

/// Run the full training pipeline and persist the bundle to `out_dir`.
pub fn train(data_path: &Path, out_dir: &Path, config: &TrainConfig) -> Result<TrainReport> {
    info!(path = %data_path.display(), "loading training data");
    let table = RawTable::read_path(data_path)?;
    let rows_loaded = table.rows.len();
    info!(rows = rows_loaded, "loaded training data");

    let target_idx = table
        .column_index(TARGET_COLUMN)
        .with_context(|| format!("training data has no {TARGET_COLUMN:?} column"))?;

    // Parse + clean: rows with missing or unparsable values are dropped,
    // like the reference pipeline's dropna().
    let mut records: Vec<(PassengerRecord, String)> = Vec::with_capacity(rows_loaded);
    let mut dropped = 0usize;
    for row in &table.rows {
        let target = row.get(target_idx).map(|s| s.trim()).unwrap_or_default();
        if target.is_empty() {
            dropped += 1;
            continue;
        }
        match PassengerRecord::from_row(&table, row) {
            Ok(record) => records.push((record, target.to_string())),
            Err(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "dropped rows with missing or invalid values");
    }
    if records.len() < 10 {
        bail!(
            "need at least 10 usable training rows, found {}",
            records.len()
        );
    }
    let rows_kept = records.len();

    // Binning boundaries cover the observed domain; the distance tail is
    // data-dependent.
    let max_distance = records
        .iter()
        .map(|(r, _)| r.flight_distance)
        .fold(0.0_f64, f64::max);
    let binning = BinningConfig::standard(max_distance);

    let encoders = fit_encoders(&records, &binning);
    let feature_columns = feature_columns_from(&table);
    info!(
        features = feature_columns.len(),
        encoders = encoders.len(),
        "fitted binning and encoders"
    );

    // Encode every record up front; encoding failures here would mean the
    // encoders were not fitted from this very data, so propagate hard.
    let satisfaction = encoders
        .table(TARGET_COLUMN)
        .context("satisfaction encoder missing")?;
    let mut encoded: Vec<(Vec<f32>, u32)> = Vec::with_capacity(records.len());
    for (record, target) in &records {
        let vector = build_vector(record, &feature_columns, &binning, &encoders)?;
        let label = satisfaction.encode(TARGET_COLUMN, target)?;
        encoded.push((vector, label));
    }

    // Reproducible shuffle + split.
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    encoded.shuffle(&mut rng);
    let test_size = (encoded.len() as f64 * config.test_split) as usize;
    let (test_set, train_set) = encoded.split_at(test_size);
    info!(train = train_set.len(), test = test_set.len(), "split data");

    let satisfied_code = satisfaction.encode(TARGET_COLUMN, crate::models::SATISFIED)?;
    let dissatisfied_code = satisfaction.encode(TARGET_COLUMN, crate::models::DISSATISFIED)?;

    let vectors: Vec<Vec<f32>> = train_set.iter().map(|(v, _)| v.clone()).collect();
    let labels: Vec<u32> = train_set.iter().map(|(_, l)| *l).collect();

    info!(
        trees = config.params.trees,
        max_depth = config.params.max_depth,
        learning_rate = config.params.learning_rate,
        "training tree ensemble"
    );
    let model = train_tree(
        &vectors,
        &labels,
        satisfied_code,
        dissatisfied_code,
        &config.params,
    )?;

    let accuracy = evaluate(&model, test_set);
    info!("held-out accuracy: {:.4}", accuracy);

    let bundle = ArtifactBundle {
        encoders,
        binning,
        feature_columns,
        model,
    };
    bundle.save(out_dir)?;

    Ok(TrainReport {
        rows_loaded,
        rows_kept,
        train_size: train_set.len(),
        test_size: test_set.len(),
        accuracy,
    })
}

/// Fit one encoder table per categorical field over the observed (binned)
/// values, plus the satisfaction target.
fn fit_encoders(records: &[(PassengerRecord, String)], binning: &BinningConfig) -> LabelEncoders {
    let mut encoders = LabelEncoders::new();

    let collect = |f: &dyn Fn(&PassengerRecord) -> String| -> EncoderTable {
        let values: Vec<String> = records.iter().map(|(r, _)| f(r)).collect();
        EncoderTable::fit(values.iter().map(String::as_str))
    };

    encoders.insert("Gender", collect(&|r| r.gender.clone()));
    encoders.insert("Customer Type", collect(&|r| r.customer_type.clone()));
    encoders.insert("Type of Travel", collect(&|r| r.travel_type.clone()));
    encoders.insert("Class", collect(&|r| r.class.clone()));
    encoders.insert("Age", collect(&|r| binning.bin_age(r.age).to_string()));
    encoders.insert(
        "Flight Distance",
        collect(&|r| binning.bin_distance(r.flight_distance).to_string()),
    );
    encoders.insert(
        "Departure Delay in Minutes",
        collect(&|r| binning.bin_delay(r.departure_delay).to_string()),
    );
    encoders.insert(
        "Arrival Delay in Minutes",
        collect(&|r| binning.bin_delay(r.arrival_delay).to_string()),
    );
    encoders.insert(
        TARGET_COLUMN,
        EncoderTable::fit(records.iter().map(|(_, t)| t.as_str())),
    );

    encoders
}

/// The feature order is the training table's column order minus the dropped
/// id columns and the target; this exact sequence is persisted and replayed
/// at inference.
fn feature_columns_from(table: &RawTable) -> Vec<String> {
    table
        .headers
        .iter()
        .filter(|h| !DROP_COLUMNS.contains(&h.as_str()) && h.as_str() != TARGET_COLUMN)
        .cloned()
        .collect()
}

fn evaluate(model: &impl SatisfactionModel, test_set: &[(Vec<f32>, u32)]) -> f64 {
    if test_set.is_empty() {
        return 0.0;
    }
    let correct = test_set
        .iter()
        .filter(|(vector, label)| model.predict(vector).map(|p| p == *label).unwrap_or(false))
        .count();
    correct as f64 / test_set.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_columns_drop_id_and_target() {
        let table = RawTable::new(
            vec![
                "id".into(),
                "Gender".into(),
                "Age".into(),
                "satisfaction".into(),
            ],
            vec![],
        );
        assert_eq!(feature_columns_from(&table), vec!["Gender", "Age"]);
    }

    #[test]
    fn test_train_config_default() {
        let config = TrainConfig::default();
        assert!(config.params.trees > 0);
        assert!(config.test_split > 0.0 && config.test_split < 1.0);
    }
}
