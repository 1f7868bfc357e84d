//! Label encoding for categorical fields
//!
//! Each categorical field gets a bijection between its observed string
//! values and dense integer codes `[0, k)`. Tables are fitted once from the
//! training data (sorted-unique, so codes are stable across runs) and are
//! purely functional lookups afterwards. A value never seen at training time
//! is an error, not a silent default.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{PipelineError, PipelineResult};

/// Bidirectional string <-> code mapping for one categorical field.
///
/// Serialized as the ordered class list; the reverse index is rebuilt on
/// deserialization, so persisted tables round-trip codes exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct EncoderTable {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl EncoderTable {
    /// Fit a table from observed values: sorted unique, codes assigned in
    /// ascending order.
    pub fn fit<'a, I: IntoIterator<Item = &'a str>>(values: I) -> Self {
        let unique: BTreeSet<&str> = values.into_iter().collect();
        let classes: Vec<String> = unique.into_iter().map(String::from).collect();
        Self::from(classes)
    }

    pub fn encode(&self, field: &str, value: &str) -> PipelineResult<u32> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| PipelineError::UnknownCategory {
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    pub fn decode(&self, field: &str, code: u32) -> PipelineResult<&str> {
        self.classes
            .get(code as usize)
            .map(String::as_str)
            .ok_or_else(|| PipelineError::UnknownCode {
                field: field.to_string(),
                code,
            })
    }

    /// The ordered class list (dropdown options on the form page).
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl From<Vec<String>> for EncoderTable {
    fn from(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i as u32))
            .collect();
        Self { classes, index }
    }
}

impl From<EncoderTable> for Vec<String> {
    fn from(table: EncoderTable) -> Self {
        table.classes
    }
}

/// All fitted encoder tables, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoders {
    tables: BTreeMap<String, EncoderTable>,
}

impl LabelEncoders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, table: EncoderTable) {
        self.tables.insert(field.into(), table);
    }

    pub fn table(&self, field: &str) -> Option<&EncoderTable> {
        self.tables.get(field)
    }

    /// Encode a value for a field. The field must have a fitted table;
    /// callers check [`Self::table`] first when pass-through is a valid
    /// alternative.
    pub fn encode(&self, field: &str, value: &str) -> PipelineResult<u32> {
        let table = self
            .tables
            .get(field)
            .ok_or_else(|| PipelineError::UnknownColumn(field.to_string()))?;
        table.encode(field, value)
    }

    pub fn decode(&self, field: &str, code: u32) -> PipelineResult<&str> {
        let table = self
            .tables
            .get(field)
            .ok_or_else(|| PipelineError::UnknownColumn(field.to_string()))?;
        table.decode(field, code)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_sorts_and_dedups() {
        let table = EncoderTable::fit(["Male", "Female", "Male", "Female"]);
        assert_eq!(table.classes(), ["Female", "Male"]);
        assert_eq!(table.encode("Gender", "Female").unwrap(), 0);
        assert_eq!(table.encode("Gender", "Male").unwrap(), 1);
    }

    #[test]
    fn test_roundtrip_every_fitted_value() {
        let table = EncoderTable::fit(["Business", "Eco", "Eco Plus"]);
        for value in table.classes().to_vec() {
            let code = table.encode("Class", &value).unwrap();
            assert_eq!(table.decode("Class", code).unwrap(), value);
        }
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let table = EncoderTable::fit(["satisfied", "neutral or dissatisfied"]);
        let err = table.encode("satisfaction", "NeverSeenValue").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCategory { .. }));
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let table = EncoderTable::fit(["a", "b"]);
        let err = table.decode("field", 2).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCode { code: 2, .. }));
    }

    #[test]
    fn test_serde_preserves_codes() {
        let mut encoders = LabelEncoders::new();
        encoders.insert("Gender", EncoderTable::fit(["Male", "Female"]));
        encoders.insert("Class", EncoderTable::fit(["Eco", "Business", "Eco Plus"]));

        let json = serde_json::to_string(&encoders).unwrap();
        let back: LabelEncoders = serde_json::from_str(&json).unwrap();

        assert_eq!(back.encode("Gender", "Male").unwrap(), 1);
        assert_eq!(back.encode("Class", "Business").unwrap(), 0);
        assert_eq!(back.decode("Class", 2).unwrap(), "Eco Plus");
    }

    #[test]
    fn test_encode_without_table_is_unknown_column() {
        let encoders = LabelEncoders::new();
        let err = encoders.encode("Gender", "Male").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn(_)));
    }
}
