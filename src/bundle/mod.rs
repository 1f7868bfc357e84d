//! Artifact bundle persistence
//!
//! One trained, servable configuration is four artifacts that only make
//! sense together: the label encoders, the binning config, the feature
//! column order, and the fitted model. They are written as a directory of
//! JSON files plus a manifest carrying a SHA-256 fingerprint over the
//! artifact bytes. Loading recomputes the fingerprint and refuses a bundle
//! whose pieces do not match, so a stale encoder can never be paired with a
//! newer model and silently produce wrong predictions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::classifier::GbdtSatisfactionModel;
use crate::pipeline::{BinningConfig, LabelEncoders};

const MANIFEST_FILE: &str = "manifest.json";
const ENCODERS_FILE: &str = "label_encoders.json";
const BINNING_FILE: &str = "binning_config.json";
const COLUMNS_FILE: &str = "feature_columns.json";
const MODEL_FILE: &str = "model.json";

/// Bundle format version; bump on any incompatible artifact change.
const SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("artifact bundle not found at {0}")]
    NotFound(String),

    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported bundle schema version {found} (expected {SCHEMA_VERSION})")]
    SchemaVersion { found: u32 },

    #[error("bundle fingerprint mismatch: manifest says {expected}, artifacts hash to {actual}")]
    FingerprintMismatch { expected: String, actual: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    schema_version: u32,
    fingerprint: String,
    created_at: String,
}

/// The four persisted artifacts of one trained configuration.
#[derive(Debug)]
pub struct ArtifactBundle {
    pub encoders: LabelEncoders,
    pub binning: BinningConfig,
    pub feature_columns: Vec<String>,
    pub model: GbdtSatisfactionModel,
}

impl ArtifactBundle {
    /// Write the bundle to `dir` (created if absent), manifest last.
    pub fn save(&self, dir: &Path) -> Result<(), BundleError> {
        fs::create_dir_all(dir).map_err(|e| BundleError::Io {
            file: dir.display().to_string(),
            source: e,
        })?;

        let encoders = to_json(ENCODERS_FILE, &self.encoders)?;
        let binning = to_json(BINNING_FILE, &self.binning)?;
        let columns = to_json(COLUMNS_FILE, &self.feature_columns)?;
        let model = to_json(MODEL_FILE, &self.model)?;

        let manifest = Manifest {
            schema_version: SCHEMA_VERSION,
            fingerprint: fingerprint(&encoders, &binning, &columns, &model),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let manifest_json = to_json(MANIFEST_FILE, &manifest)?;

        write_file(dir, ENCODERS_FILE, &encoders)?;
        write_file(dir, BINNING_FILE, &binning)?;
        write_file(dir, COLUMNS_FILE, &columns)?;
        write_file(dir, MODEL_FILE, &model)?;
        write_file(dir, MANIFEST_FILE, &manifest_json)?;

        info!(
            dir = %dir.display(),
            fingerprint = %manifest.fingerprint,
            "saved artifact bundle"
        );
        Ok(())
    }

    /// Load and verify a bundle from `dir`.
    pub fn load(dir: &Path) -> Result<Self, BundleError> {
        if !dir.join(MANIFEST_FILE).exists() {
            return Err(BundleError::NotFound(dir.display().to_string()));
        }

        let manifest: Manifest = read_json(dir, MANIFEST_FILE)?;
        if manifest.schema_version != SCHEMA_VERSION {
            return Err(BundleError::SchemaVersion {
                found: manifest.schema_version,
            });
        }

        let encoders_raw = read_file(dir, ENCODERS_FILE)?;
        let binning_raw = read_file(dir, BINNING_FILE)?;
        let columns_raw = read_file(dir, COLUMNS_FILE)?;
        let model_raw = read_file(dir, MODEL_FILE)?;

        let actual = fingerprint(&encoders_raw, &binning_raw, &columns_raw, &model_raw);
        if actual != manifest.fingerprint {
            return Err(BundleError::FingerprintMismatch {
                expected: manifest.fingerprint,
                actual,
            });
        }

        Ok(Self {
            encoders: parse_json(ENCODERS_FILE, &encoders_raw)?,
            binning: parse_json(BINNING_FILE, &binning_raw)?,
            feature_columns: parse_json(COLUMNS_FILE, &columns_raw)?,
            model: parse_json(MODEL_FILE, &model_raw)?,
        })
    }
}

/// Stable content hash over the four artifact payloads, length-prefixed so
/// boundaries cannot be ambiguous.
fn fingerprint(encoders: &str, binning: &str, columns: &str, model: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [encoders, binning, columns, model] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn to_json<T: Serialize>(file: &str, value: &T) -> Result<String, BundleError> {
    serde_json::to_string(value).map_err(|e| BundleError::Parse {
        file: file.to_string(),
        source: e,
    })
}

fn parse_json<T: for<'de> Deserialize<'de>>(file: &str, raw: &str) -> Result<T, BundleError> {
    serde_json::from_str(raw).map_err(|e| BundleError::Parse {
        file: file.to_string(),
        source: e,
    })
}

fn write_file(dir: &Path, file: &str, content: &str) -> Result<(), BundleError> {
    fs::write(dir.join(file), content).map_err(|e| BundleError::Io {
        file: file.to_string(),
        source: e,
    })
}

fn read_file(dir: &Path, file: &str) -> Result<String, BundleError> {
    fs::read_to_string(dir.join(file)).map_err(|e| BundleError::Io {
        file: file.to_string(),
        source: e,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(dir: &Path, file: &str) -> Result<T, BundleError> {
    parse_json(file, &read_file(dir, file)?)
}
