//! GBDT-backed satisfaction model
//!
//! Wraps `gbdt::gradient_boost::GBDT` as the concrete tree strategy. Binary
//! classification uses the `LogLikelyhood` loss with label 1.0 for the
//! satisfied class and -1.0 for the rest; at inference the calibrated
//! probability is thresholded at 0.5 and mapped back to the encoded
//! satisfaction code.
//!
//! Note: the gbdt crate internally uses `f32` (`ValueType`); vectors arrive
//! already converted at the pipeline boundary.

use gbdt::config::Config;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineError, PipelineResult};

use super::SatisfactionModel;

/// Tree training hyperparameters.
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Number of boosting iterations.
    pub trees: usize,
    /// Maximum tree depth.
    pub max_depth: u32,
    /// Shrinkage / step size.
    pub learning_rate: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            trees: 60,
            max_depth: 6,
            learning_rate: 0.1,
        }
    }
}

/// A trained GBDT plus the two satisfaction codes it discriminates between.
///
/// Serializable as-is: the artifact bundle persists this whole struct, so
/// the code mapping can never drift apart from the tree ensemble.
#[derive(Serialize, Deserialize)]
pub struct GbdtSatisfactionModel {
    model: GBDT,
    satisfied_code: u32,
    dissatisfied_code: u32,
}

impl std::fmt::Debug for GbdtSatisfactionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `gbdt::GBDT` has no `Debug` impl, so the ensemble is elided.
        f.debug_struct("GbdtSatisfactionModel")
            .field("satisfied_code", &self.satisfied_code)
            .field("dissatisfied_code", &self.dissatisfied_code)
            .finish_non_exhaustive()
    }
}

impl GbdtSatisfactionModel {
    pub fn satisfied_code(&self) -> u32 {
        self.satisfied_code
    }

    pub fn dissatisfied_code(&self) -> u32 {
        self.dissatisfied_code
    }
}

impl SatisfactionModel for GbdtSatisfactionModel {
    fn predict(&self, features: &[f32]) -> PipelineResult<u32> {
        let data = vec![Data::new_test_data(features.to_vec(), None)];
        let preds = self.model.predict(&data);
        let probability = preds
            .first()
            .copied()
            .ok_or_else(|| PipelineError::ModelInference("empty prediction output".into()))?;
        if !probability.is_finite() {
            return Err(PipelineError::ModelInference(format!(
                "non-finite probability: {probability}"
            )));
        }
        Ok(if probability >= 0.5 {
            self.satisfied_code
        } else {
            self.dissatisfied_code
        })
    }
}

/// Train a GBDT from encoded vectors and encoded satisfaction labels.
///
/// `satisfied_code`/`dissatisfied_code` come from the fitted satisfaction
/// encoder table; labels equal to `satisfied_code` become 1.0, everything
/// else -1.0 (the LogLikelyhood convention).
pub fn train_tree(
    vectors: &[Vec<f32>],
    labels: &[u32],
    satisfied_code: u32,
    dissatisfied_code: u32,
    params: &TreeParams,
) -> PipelineResult<GbdtSatisfactionModel> {
    if vectors.is_empty() {
        return Err(PipelineError::ModelInference(
            "no training samples provided".into(),
        ));
    }
    if vectors.len() != labels.len() {
        return Err(PipelineError::ModelInference(format!(
            "feature count ({}) does not match label count ({})",
            vectors.len(),
            labels.len()
        )));
    }

    let feature_size = vectors[0].len();

    let mut cfg = Config::new();
    cfg.set_feature_size(feature_size);
    cfg.set_max_depth(params.max_depth);
    cfg.set_iterations(params.trees);
    cfg.set_shrinkage(params.learning_rate as f32);
    cfg.set_loss("LogLikelyhood");
    cfg.set_debug(false);
    cfg.set_training_optimization_level(2);
    cfg.set_min_leaf_size(1);

    let mut model = GBDT::new(&cfg);

    let mut training_data: Vec<Data> = vectors
        .iter()
        .zip(labels.iter())
        .map(|(v, &label)| {
            let target = if label == satisfied_code { 1.0 } else { -1.0 };
            Data::new_training_data(v.clone(), 1.0, target, None)
        })
        .collect();

    model.fit(&mut training_data);

    Ok(GbdtSatisfactionModel {
        model,
        satisfied_code,
        dissatisfied_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well-separated synthetic clusters over 22 features.
    fn make_vector(seed: f32) -> Vec<f32> {
        (0..22).map(|i| (seed + i as f32 * 0.1).sin().abs()).collect()
    }

    fn separable_data() -> (Vec<Vec<f32>>, Vec<u32>) {
        let mut vectors = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30 {
            // Satisfied cluster: a large first feature.
            let mut v = make_vector(i as f32);
            v[0] = 10.0;
            vectors.push(v);
            labels.push(1);
        }
        for i in 0..30 {
            let mut v = make_vector(100.0 + i as f32);
            v[0] = -10.0;
            vectors.push(v);
            labels.push(0);
        }
        (vectors, labels)
    }

    #[test]
    fn test_train_and_predict_separable() {
        let (vectors, labels) = separable_data();
        let params = TreeParams {
            trees: 20,
            max_depth: 3,
            learning_rate: 0.3,
        };
        let model = train_tree(&vectors, &labels, 1, 0, &params).unwrap();

        let mut good = make_vector(5.0);
        good[0] = 10.0;
        let mut bad = make_vector(105.0);
        bad[0] = -10.0;

        assert_eq!(model.predict(&good).unwrap(), 1);
        assert_eq!(model.predict(&bad).unwrap(), 0);
    }

    #[test]
    fn test_train_validation_errors() {
        let err = train_tree(&[], &[], 1, 0, &TreeParams::default()).unwrap_err();
        assert!(err.to_string().contains("no training samples"));

        let vectors = vec![make_vector(1.0), make_vector(2.0)];
        let labels = vec![1];
        let err = train_tree(&vectors, &labels, 1, 0, &TreeParams::default()).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_serde_roundtrip_preserves_predictions() {
        let (vectors, labels) = separable_data();
        let params = TreeParams {
            trees: 10,
            max_depth: 2,
            learning_rate: 0.3,
        };
        let model = train_tree(&vectors, &labels, 1, 0, &params).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let loaded: GbdtSatisfactionModel = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.satisfied_code(), 1);
        for v in vectors.iter().take(10) {
            assert_eq!(loaded.predict(v).unwrap(), model.predict(v).unwrap());
        }
    }
}
