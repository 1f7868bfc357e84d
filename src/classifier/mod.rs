//! Satisfaction classifier
//!
//! The tree learner is a pluggable strategy behind a single `predict`
//! contract: encoded feature vector in, encoded satisfaction code out. The
//! shipped implementation wraps the `gbdt` crate; tests exercise the service
//! through a fixed stub, which is all the seam requires.

mod gbdt_model;

pub use gbdt_model::{train_tree, GbdtSatisfactionModel, TreeParams};

use crate::pipeline::PipelineResult;

/// A trained classifier that maps an encoded feature vector to an encoded
/// satisfaction label. Implementations are immutable after construction and
/// safe for concurrent read-only inference.
pub trait SatisfactionModel: Send + Sync {
    fn predict(&self, features: &[f32]) -> PipelineResult<u32>;
}
