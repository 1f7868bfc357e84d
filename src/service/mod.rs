//! Prediction service
//!
//! Wraps the loaded artifacts and the trained classifier behind two
//! operations: `predict_one` for a single record and `predict_batch` for a
//! tabular file. Batch processing has partial-failure semantics: one
//! malformed row records an error marker and never aborts the rest.

mod explain;

pub use explain::main_reason;

use serde::Serialize;
use thiserror::Error;

use crate::bundle::ArtifactBundle;
use crate::classifier::SatisfactionModel;
use crate::dataset::RawTable;
use crate::models::{
    PassengerRecord, Prediction, DISSATISFIED, REQUIRED_COLUMNS, SATISFIED, TARGET_COLUMN,
};
use crate::pipeline::{build_vector, BinningConfig, LabelEncoders, PipelineError, PipelineResult};

/// Errors that reject a whole batch before any row is processed.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Per-row batch outcome: a prediction with its explanation, or the error
/// that row produced. Partial failure is a value, not an exception.
#[derive(Debug, Clone, Serialize)]
pub enum RowOutcome {
    Predicted { label: String, reason: String },
    Failed { error: String },
}

impl RowOutcome {
    /// Display string for the appended `Prediction` column.
    pub fn result_text(&self) -> String {
        match self {
            RowOutcome::Predicted { label, .. } => label.clone(),
            RowOutcome::Failed { error } => format!("Error: {error}"),
        }
    }

    /// Display string for the appended `Main Reason` column.
    pub fn reason_text(&self) -> &str {
        match self {
            RowOutcome::Predicted { reason, .. } => reason,
            RowOutcome::Failed { .. } => "N/A",
        }
    }
}

/// Aggregated batch result.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub satisfied: usize,
    pub dissatisfied: usize,
    pub errors: usize,
    /// Rounded to two decimals; denominator includes errored rows.
    pub satisfied_percentage: f64,
    pub dissatisfied_percentage: f64,
    /// One outcome per input row, in order.
    pub outcomes: Vec<RowOutcome>,
}

/// How many annotated rows batch responses display at most.
pub const BATCH_DISPLAY_LIMIT: usize = 100;

/// The online prediction path: immutable after construction, shared
/// read-only by all requests.
pub struct PredictionService {
    encoders: LabelEncoders,
    binning: BinningConfig,
    feature_columns: Vec<String>,
    model: Box<dyn SatisfactionModel>,
}

impl PredictionService {
    pub fn new(
        encoders: LabelEncoders,
        binning: BinningConfig,
        feature_columns: Vec<String>,
        model: Box<dyn SatisfactionModel>,
    ) -> Self {
        Self {
            encoders,
            binning,
            feature_columns,
            model,
        }
    }

    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self::new(
            bundle.encoders,
            bundle.binning,
            bundle.feature_columns,
            Box::new(bundle.model),
        )
    }

    /// Dropdown options for a categorical field, when loaded.
    pub fn classes(&self, field: &str) -> Option<&[String]> {
        self.encoders.table(field).map(|t| t.classes())
    }

    /// Predict one record: encode, infer, decode, and validate that the
    /// decoded label is inside the two-valued satisfaction domain.
    pub fn predict_one(&self, record: &PassengerRecord) -> PipelineResult<Prediction> {
        let vector = build_vector(record, &self.feature_columns, &self.binning, &self.encoders)?;
        let code = self.model.predict(&vector)?;
        let label = self.encoders.decode(TARGET_COLUMN, code)?;

        let satisfied = label.eq_ignore_ascii_case(SATISFIED);
        if !satisfied && !label.eq_ignore_ascii_case(DISSATISFIED) {
            return Err(PipelineError::ModelOutput(label.to_string()));
        }

        Ok(Prediction {
            label: label.to_string(),
            satisfied,
        })
    }

    /// Predict every row of a table independently.
    ///
    /// The whole batch is rejected when required columns are absent from the
    /// header; after that, a failing row only marks its own outcome.
    pub fn predict_batch(&self, table: &RawTable) -> Result<BatchReport, BatchError> {
        let missing = table.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(BatchError::MissingColumns(missing));
        }

        let mut outcomes = Vec::with_capacity(table.rows.len());
        let mut satisfied = 0usize;
        let mut dissatisfied = 0usize;
        let mut errors = 0usize;

        for row in &table.rows {
            let outcome = match self.predict_row(table, row) {
                Ok((prediction, reason)) => {
                    if prediction.satisfied {
                        satisfied += 1;
                    } else {
                        dissatisfied += 1;
                    }
                    RowOutcome::Predicted {
                        label: prediction.label,
                        reason,
                    }
                }
                Err(e) => {
                    errors += 1;
                    RowOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let total = outcomes.len();
        Ok(BatchReport {
            total,
            satisfied,
            dissatisfied,
            errors,
            satisfied_percentage: percentage(satisfied, total),
            dissatisfied_percentage: percentage(dissatisfied, total),
            outcomes,
        })
    }

    fn predict_row(
        &self,
        table: &RawTable,
        row: &[String],
    ) -> PipelineResult<(Prediction, String)> {
        let record = PassengerRecord::from_row(table, row)?;
        let prediction = self.predict_one(&record)?;
        let reason = main_reason(&record, &prediction.label);
        Ok((prediction, reason))
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = count as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}
