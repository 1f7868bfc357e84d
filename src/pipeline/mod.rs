//! Feature pipeline: binning, label encoding, and vector assembly
//!
//! Converts raw survey/flight fields into the encoded feature vector the
//! classifier was trained on. The exact same code path runs at training and
//! at inference, so the encoding can never silently diverge between the two.

mod binning;
mod encoding;
mod vector;

pub use binning::BinningConfig;
pub use encoding::{EncoderTable, LabelEncoders};
pub use vector::build_vector;

use thiserror::Error;

/// Errors produced while turning a raw record into an encoded vector and
/// while decoding the classifier's answer.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {value:?} (expected a number)")]
    InvalidInput { field: String, value: String },

    #[error("unknown category for {field}: {value:?} was not seen at training time")]
    UnknownCategory { field: String, value: String },

    #[error("unknown code for {field}: {code} is outside the trained range")]
    UnknownCode { field: String, code: u32 },

    #[error("unknown feature column: {0} (feature order does not match the trained model)")]
    UnknownColumn(String),

    #[error("model inference failed: {0}")]
    ModelInference(String),

    #[error("model produced a label outside the satisfaction domain: {0:?}")]
    ModelOutput(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
