//! Model predictor: owns the loaded artifact and runs predictions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::{StressLevel, WorkerFeatures};
use crate::error::{GigstressError, Result};
use crate::model::{argmax, ModelArtifact};
use crate::preprocess;

/// Outcome of a single prediction.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub stress_level: StressLevel,
    /// Per-class probability, keyed by class label. BTreeMap keeps the JSON
    /// key order deterministic.
    pub probabilities: BTreeMap<String, f64>,
}

/// Detailed model description for the info endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub n_estimators: usize,
    pub max_depth: Option<u32>,
    pub n_features: usize,
    pub feature_names: Vec<String>,
    pub target_classes: Vec<String>,
    pub numerical_features: Vec<String>,
    pub categorical_features: Vec<String>,
}

/// Predictor for financial stress classification.
///
/// Loads the artifact once; all inference is `&self` and shared behind an
/// `Arc` across request handlers.
#[derive(Debug)]
pub struct StressPredictor {
    artifact: ModelArtifact,
    path: PathBuf,
}

impl StressPredictor {
    /// Load and validate the model artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Loading model artifact from {}", path.display());

        let artifact = ModelArtifact::from_file(&path)?;
        preprocess::check_schema(&artifact)?;

        info!(
            "Model loaded: {} with {} trees over {} features",
            artifact.model_type,
            artifact.forest.n_estimators(),
            artifact.feature_names.len()
        );
        Ok(Self { artifact, path })
    }

    pub fn artifact_path(&self) -> &Path {
        &self.path
    }

    /// Make a prediction for a single worker.
    pub fn predict_single(&self, features: &WorkerFeatures) -> Result<Prediction> {
        let vector = preprocess::build_feature_vector(features, &self.artifact)?;
        let probs = self
            .artifact
            .forest
            .predict_proba(&vector, self.artifact.n_classes())?;

        let winner = argmax(&probs);
        let label = &self.artifact.classes[winner];
        let stress_level = StressLevel::from_label(label).ok_or_else(|| {
            GigstressError::Internal(format!("model produced unknown class {label:?}"))
        })?;

        let probabilities = self
            .artifact
            .classes
            .iter()
            .cloned()
            .zip(probs)
            .collect::<BTreeMap<_, _>>();

        Ok(Prediction {
            stress_level,
            probabilities,
        })
    }

    /// Make predictions for multiple workers, preserving input order.
    ///
    /// The first record that fails preprocessing fails the whole batch.
    pub fn predict_batch(&self, workers: &[WorkerFeatures]) -> Result<Vec<Prediction>> {
        workers.iter().map(|w| self.predict_single(w)).collect()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_type: self.artifact.model_type.clone(),
            n_estimators: self.artifact.forest.n_estimators(),
            max_depth: self.artifact.forest.max_depth,
            n_features: self.artifact.feature_names.len(),
            feature_names: self.artifact.feature_names.clone(),
            target_classes: self.artifact.classes.clone(),
            numerical_features: self.artifact.numerical_features.clone(),
            categorical_features: self.artifact.categorical_features.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, EncoderParams, RandomForest, ScalerParams};
    use std::io::Write;

    fn fixture_artifact() -> ModelArtifact {
        // Single stump: scaled worker_age <= 0 leans Low, otherwise High.
        let tree = DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.0, 0.0, 0.0],
            value: vec![
                vec![0.4, 0.3, 0.3],
                vec![0.1, 0.7, 0.2],
                vec![0.6, 0.2, 0.2],
            ],
        };
        ModelArtifact {
            model_type: "RandomForestClassifier".to_string(),
            classes: vec!["High".into(), "Low".into(), "Moderate".into()],
            feature_names: vec!["worker_age".into(), "min_payment_flag".into()],
            numerical_features: vec!["worker_age".into()],
            categorical_features: vec!["min_payment_flag".into()],
            train_medians: [("worker_age".to_string(), 30.0)].into(),
            train_means: [("worker_age".to_string(), 35.0)].into(),
            outlier_columns: vec![],
            scaler: ScalerParams {
                mean: [("worker_age".to_string(), 35.0)].into(),
                std: [("worker_age".to_string(), 10.0)].into(),
            },
            encoder: EncoderParams {
                categories: [(
                    "min_payment_flag".to_string(),
                    vec!["NM".into(), "No".into(), "Yes".into()],
                )]
                .into(),
            },
            forest: RandomForest {
                trees: vec![tree],
                max_depth: Some(1),
            },
        }
    }

    fn write_artifact(artifact: &ModelArtifact) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(artifact).unwrap().as_bytes())
            .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_and_predicts() {
        let file = write_artifact(&fixture_artifact());
        let predictor = StressPredictor::load(file.path()).unwrap();

        let young = WorkerFeatures {
            worker_age: Some(25.0),
            ..Default::default()
        };
        let prediction = predictor.predict_single(&young).unwrap();
        assert_eq!(prediction.stress_level, StressLevel::Low);

        let total: f64 = prediction.probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(prediction.probabilities["Low"], 0.7);
    }

    #[test]
    fn batch_preserves_order() {
        let file = write_artifact(&fixture_artifact());
        let predictor = StressPredictor::load(file.path()).unwrap();

        let workers = vec![
            WorkerFeatures {
                worker_age: Some(25.0),
                ..Default::default()
            },
            WorkerFeatures {
                worker_age: Some(60.0),
                ..Default::default()
            },
        ];
        let predictions = predictor.predict_batch(&workers).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].stress_level, StressLevel::Low);
        assert_eq!(predictions[1].stress_level, StressLevel::High);
    }

    #[test]
    fn refuses_artifact_with_foreign_schema() {
        let mut artifact = fixture_artifact();
        artifact.feature_names.push("shoe_size".into());
        artifact.numerical_features.push("shoe_size".into());
        artifact.train_medians.insert("shoe_size".into(), 42.0);
        artifact.train_means.insert("shoe_size".into(), 42.0);
        artifact.scaler.mean.insert("shoe_size".into(), 42.0);
        artifact.scaler.std.insert("shoe_size".into(), 1.0);

        let file = write_artifact(&artifact);
        let err = StressPredictor::load(file.path()).unwrap_err();
        assert!(matches!(err, GigstressError::InvalidArtifact(_)));
    }

    #[test]
    fn model_info_reports_forest_shape() {
        let file = write_artifact(&fixture_artifact());
        let predictor = StressPredictor::load(file.path()).unwrap();
        let info = predictor.model_info();
        assert_eq!(info.model_type, "RandomForestClassifier");
        assert_eq!(info.n_estimators, 1);
        assert_eq!(info.n_features, 2);
        assert_eq!(info.target_classes, vec!["High", "Low", "Moderate"]);
    }
}
