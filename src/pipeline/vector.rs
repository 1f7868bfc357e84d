//! Feature vector assembly
//!
//! Replays the training-time column order against one record: the four
//! numeric fields are binned then encoded, the raw categoricals are encoded
//! directly, and the fourteen service ratings pass through unchanged. The
//! gbdt crate works in f32 internally, so the vector is built as `Vec<f32>`
//! at the crate boundary.

use crate::models::PassengerRecord;

use super::{BinningConfig, LabelEncoders, PipelineError, PipelineResult};

/// Build the encoded feature vector for one record, in `feature_columns`
/// order. The result always has exactly `feature_columns.len()` entries.
pub fn build_vector(
    record: &PassengerRecord,
    feature_columns: &[String],
    binning: &BinningConfig,
    encoders: &LabelEncoders,
) -> PipelineResult<Vec<f32>> {
    let mut vector = Vec::with_capacity(feature_columns.len());

    for column in feature_columns {
        let value = match column.as_str() {
            "Age" => encoders.encode(column, binning.bin_age(record.age))? as f32,
            "Flight Distance" => {
                encoders.encode(column, binning.bin_distance(record.flight_distance))? as f32
            }
            "Departure Delay in Minutes" => {
                encoders.encode(column, binning.bin_delay(record.departure_delay))? as f32
            }
            "Arrival Delay in Minutes" => {
                encoders.encode(column, binning.bin_delay(record.arrival_delay))? as f32
            }
            other => {
                if let Some(raw) = record.categorical(other) {
                    encoders.encode(other, raw)? as f32
                } else if let Some(rating) = record.rating(other) {
                    rating as f32
                } else {
                    return Err(PipelineError::UnknownColumn(other.to_string()));
                }
            }
        };
        vector.push(value);
    }

    Ok(vector)
}
