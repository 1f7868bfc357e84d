//! Core data models for Aerosat
//!
//! Canonical column tables, satisfaction labels, and the typed passenger
//! record that every prediction path is built from. The record replaces the
//! ad-hoc per-field dictionary lookups of the reference implementation with
//! a single validated construction point.

use serde::{Deserialize, Serialize};

use crate::dataset::RawTable;
use crate::pipeline::PipelineError;

/// Decoded satisfaction label for a happy passenger.
pub const SATISFIED: &str = "satisfied";

/// Decoded satisfaction label for everyone else.
pub const DISSATISFIED: &str = "neutral or dissatisfied";

/// Target column in the training data.
pub const TARGET_COLUMN: &str = "satisfaction";

/// Columns dropped from the training data before any processing.
pub const DROP_COLUMNS: [&str; 2] = ["id", "Unnamed: 0"];

/// The fourteen 1-5 service ratings, in canonical declaration order.
///
/// Pairs of (CSV column name, display name). The order is load-bearing:
/// it fixes both the feature-vector layout for rating columns and the
/// tie-breaking of the main-reason heuristic (first listed wins ties).
pub const SERVICE_FEATURES: [(&str, &str); 14] = [
    ("Inflight wifi service", "Wifi"),
    ("Departure/Arrival time convenient", "Time Convenience"),
    ("Ease of Online booking", "Online Booking"),
    ("Gate location", "Gate Location"),
    ("Food and drink", "Food & Drink"),
    ("Online boarding", "Online Boarding"),
    ("Seat comfort", "Seat Comfort"),
    ("Inflight entertainment", "Entertainment"),
    ("On-board service", "Onboard Service"),
    ("Leg room service", "Leg Room"),
    ("Baggage handling", "Baggage"),
    ("Checkin service", "Check-in"),
    ("Inflight service", "Inflight Service"),
    ("Cleanliness", "Cleanliness"),
];

/// Every column a prediction input must provide (batch files are rejected
/// wholesale when any of these is missing from the header).
pub const REQUIRED_COLUMNS: [&str; 22] = [
    "Gender",
    "Customer Type",
    "Age",
    "Type of Travel",
    "Class",
    "Flight Distance",
    "Inflight wifi service",
    "Departure/Arrival time convenient",
    "Ease of Online booking",
    "Gate location",
    "Food and drink",
    "Online boarding",
    "Seat comfort",
    "Inflight entertainment",
    "On-board service",
    "Leg room service",
    "Baggage handling",
    "Checkin service",
    "Inflight service",
    "Cleanliness",
    "Departure Delay in Minutes",
    "Arrival Delay in Minutes",
];

/// One prediction input: raw survey and flight fields for a single passenger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerRecord {
    pub gender: String,
    pub customer_type: String,
    pub age: f64,
    pub travel_type: String,
    pub class: String,
    pub flight_distance: f64,
    /// Raw 1-5 ratings, indexed by [`SERVICE_FEATURES`] order.
    pub ratings: [f64; 14],
    pub departure_delay: f64,
    pub arrival_delay: f64,
}

impl PassengerRecord {
    /// Parse a record from one row of a tabular file.
    ///
    /// This is the single validation point: a column absent from the header
    /// or an empty cell is `MissingField`, a cell that fails numeric parsing
    /// is `InvalidInput`.
    pub fn from_row(table: &RawTable, row: &[String]) -> Result<Self, PipelineError> {
        let text = |column: &str| -> Result<&str, PipelineError> {
            let idx = table
                .column_index(column)
                .ok_or_else(|| PipelineError::MissingField(column.to_string()))?;
            let value = row
                .get(idx)
                .map(|s| s.trim())
                .ok_or_else(|| PipelineError::MissingField(column.to_string()))?;
            if value.is_empty() {
                return Err(PipelineError::MissingField(column.to_string()));
            }
            Ok(value)
        };
        let number = |column: &str| -> Result<f64, PipelineError> {
            let raw = text(column)?;
            let value: f64 = raw.parse().map_err(|_| PipelineError::InvalidInput {
                field: column.to_string(),
                value: raw.to_string(),
            })?;
            if !value.is_finite() {
                return Err(PipelineError::InvalidInput {
                    field: column.to_string(),
                    value: raw.to_string(),
                });
            }
            Ok(value)
        };

        let mut ratings = [0.0; 14];
        for (slot, (column, _)) in ratings.iter_mut().zip(SERVICE_FEATURES.iter()) {
            *slot = number(column)?;
        }

        Ok(Self {
            gender: text("Gender")?.to_string(),
            customer_type: text("Customer Type")?.to_string(),
            age: number("Age")?,
            travel_type: text("Type of Travel")?.to_string(),
            class: text("Class")?.to_string(),
            flight_distance: number("Flight Distance")?,
            ratings,
            departure_delay: number("Departure Delay in Minutes")?,
            arrival_delay: number("Arrival Delay in Minutes")?,
        })
    }

    /// Raw categorical value for a column, if the column is one of the four
    /// pass-through string fields.
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "Gender" => Some(&self.gender),
            "Customer Type" => Some(&self.customer_type),
            "Type of Travel" => Some(&self.travel_type),
            "Class" => Some(&self.class),
            _ => None,
        }
    }

    /// Raw rating for a service column, if the column is one of the fourteen.
    pub fn rating(&self, column: &str) -> Option<f64> {
        SERVICE_FEATURES
            .iter()
            .position(|(name, _)| *name == column)
            .map(|idx| self.ratings[idx])
    }
}

/// Outcome of a single prediction, decoded back to the human label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Decoded satisfaction label.
    pub label: String,
    /// True iff the label case-insensitively equals "satisfied".
    pub satisfied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RawTable;

    fn sample_table() -> RawTable {
        let headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let row: Vec<String> = vec![
            "Male",
            "Loyal Customer",
            "34",
            "Business travel",
            "Business",
            "1200",
            "4",
            "3",
            "4",
            "2",
            "5",
            "4",
            "5",
            "4",
            "4",
            "3",
            "4",
            "4",
            "5",
            "5",
            "0",
            "5",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        RawTable::new(headers, vec![row])
    }

    #[test]
    fn test_record_from_row() {
        let table = sample_table();
        let record = PassengerRecord::from_row(&table, &table.rows[0]).unwrap();
        assert_eq!(record.gender, "Male");
        assert_eq!(record.age, 34.0);
        assert_eq!(record.rating("Inflight wifi service"), Some(4.0));
        assert_eq!(record.rating("Cleanliness"), Some(5.0));
        assert_eq!(record.arrival_delay, 5.0);
    }

    #[test]
    fn test_record_missing_column() {
        let mut table = sample_table();
        table.headers.retain(|h| h != "Age");
        for row in &mut table.rows {
            row.remove(2);
        }
        let err = PassengerRecord::from_row(&table, &table.rows[0].clone()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField(f) if f == "Age"));
    }

    #[test]
    fn test_record_non_numeric_age() {
        let mut table = sample_table();
        table.rows[0][2] = "abc".to_string();
        let err = PassengerRecord::from_row(&table, &table.rows[0].clone()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { ref field, .. } if field == "Age"));
    }

    #[test]
    fn test_categorical_lookup() {
        let table = sample_table();
        let record = PassengerRecord::from_row(&table, &table.rows[0]).unwrap();
        assert_eq!(record.categorical("Class"), Some("Business"));
        assert_eq!(record.categorical("Age"), None);
    }
}
