//! Serialized model bundle: fitted forest plus the preprocessing state
//! (imputation statistics, scaler parameters, category lists) captured at
//! training time.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::StressLevel;
use crate::error::{GigstressError, Result};
use crate::model::forest::RandomForest;

/// Fitted standard-scaler parameters, keyed by numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: HashMap<String, f64>,
    pub std: HashMap<String, f64>,
}

/// One-hot encoder state.
///
/// Category lists are ordered as fitted; the first category of each column is
/// dropped during encoding and unknown categories produce an all-zero block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderParams {
    pub categories: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    /// Ordered class labels, matching the label-encoder fitted at training.
    pub classes: Vec<String>,
    /// Post-credit-age column order the model was trained on.
    pub feature_names: Vec<String>,
    pub numerical_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub train_medians: HashMap<String, f64>,
    pub train_means: HashMap<String, f64>,
    /// Numeric columns imputed with the median (IQR outliers at training
    /// time); all others use the mean.
    pub outlier_columns: Vec<String>,
    pub scaler: ScalerParams,
    pub encoder: EncoderParams,
    pub forest: RandomForest,
}

fn default_model_type() -> String {
    "RandomForestClassifier".to_string()
}

impl ModelArtifact {
    /// Read, deserialize and validate an artifact file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GigstressError::ArtifactMissing(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&content)?;
        artifact.validate().map_err(GigstressError::InvalidArtifact)?;
        Ok(artifact)
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Width of the encoded feature vector the forest was fitted on:
    /// one slot per numeric column plus the drop-first one-hot blocks.
    pub fn encoded_width(&self) -> usize {
        let one_hot: usize = self
            .categorical_features
            .iter()
            .filter_map(|col| self.encoder.categories.get(col))
            .map(|cats| cats.len().saturating_sub(1))
            .sum();
        self.numerical_features.len() + one_hot
    }

    /// Imputation fallback for a numeric column: median for columns flagged
    /// as outlier-heavy at training time, mean otherwise.
    pub fn imputation_value(&self, column: &str) -> Option<f64> {
        if self.outlier_columns.iter().any(|c| c == column) {
            self.train_medians.get(column).copied()
        } else {
            self.train_means.get(column).copied()
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        for label in &self.classes {
            if StressLevel::from_label(label).is_none() {
                return Err(format!("unknown class label {label:?}"));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for label in &self.classes {
            if !seen.insert(label) {
                return Err(format!("duplicate class label {label:?}"));
            }
        }

        if self.feature_names.is_empty() {
            return Err("feature_names must not be empty".to_string());
        }
        let expected = self.numerical_features.len() + self.categorical_features.len();
        if self.feature_names.len() != expected {
            return Err(format!(
                "feature_names has {} entries but {} numeric + {} categorical columns are declared",
                self.feature_names.len(),
                self.numerical_features.len(),
                self.categorical_features.len()
            ));
        }
        for col in &self.numerical_features {
            if self.categorical_features.iter().any(|c| c == col) {
                return Err(format!("column {col:?} is both numeric and categorical"));
            }
            if !self.feature_names.iter().any(|c| c == col) {
                return Err(format!("numeric column {col:?} missing from feature_names"));
            }
        }
        for col in &self.categorical_features {
            if !self.feature_names.iter().any(|c| c == col) {
                return Err(format!(
                    "categorical column {col:?} missing from feature_names"
                ));
            }
        }

        for col in &self.numerical_features {
            let median = self.train_medians.get(col);
            let mean = self.train_means.get(col);
            match (median, mean) {
                (Some(md), Some(mn)) if md.is_finite() && mn.is_finite() => {}
                _ => {
                    return Err(format!(
                        "numeric column {col:?} lacks finite imputation statistics"
                    ))
                }
            }
            let scale_mean = self.scaler.mean.get(col);
            let scale_std = self.scaler.std.get(col);
            match (scale_mean, scale_std) {
                (Some(m), Some(s)) if m.is_finite() && s.is_finite() && *s > 0.0 => {}
                _ => {
                    return Err(format!(
                        "numeric column {col:?} lacks valid scaler parameters"
                    ))
                }
            }
        }

        for col in &self.outlier_columns {
            if !self.numerical_features.iter().any(|c| c == col) {
                return Err(format!("outlier column {col:?} is not a numeric column"));
            }
        }

        for col in &self.categorical_features {
            let Some(cats) = self.encoder.categories.get(col) else {
                return Err(format!("categorical column {col:?} has no category list"));
            };
            if cats.is_empty() {
                return Err(format!("categorical column {col:?} has an empty category list"));
            }
            let mut seen = std::collections::HashSet::new();
            for cat in cats {
                if !seen.insert(cat) {
                    return Err(format!("categorical column {col:?} repeats category {cat:?}"));
                }
            }
        }

        self.forest
            .validate(self.encoded_width(), self.n_classes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forest::DecisionTree;

    fn minimal_artifact() -> ModelArtifact {
        let tree = DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.0, 0.0, 0.0],
            value: vec![
                vec![0.5, 0.25, 0.25],
                vec![0.7, 0.2, 0.1],
                vec![0.1, 0.3, 0.6],
            ],
        };
        ModelArtifact {
            model_type: "RandomForestClassifier".to_string(),
            classes: vec!["High".into(), "Low".into(), "Moderate".into()],
            feature_names: vec!["worker_age".into(), "min_payment_flag".into()],
            numerical_features: vec!["worker_age".into()],
            categorical_features: vec!["min_payment_flag".into()],
            train_medians: [("worker_age".to_string(), 33.0)].into(),
            train_means: [("worker_age".to_string(), 35.2)].into(),
            outlier_columns: vec![],
            scaler: ScalerParams {
                mean: [("worker_age".to_string(), 35.2)].into(),
                std: [("worker_age".to_string(), 9.4)].into(),
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

    #[test]
    fn minimal_artifact_validates() {
        let artifact = minimal_artifact();
        artifact.validate().unwrap();
        assert_eq!(artifact.encoded_width(), 3);
    }

    #[test]
    fn imputation_prefers_median_for_outlier_columns() {
        let mut artifact = minimal_artifact();
        assert_eq!(artifact.imputation_value("worker_age"), Some(35.2));
        artifact.outlier_columns = vec!["worker_age".into()];
        assert_eq!(artifact.imputation_value("worker_age"), Some(33.0));
    }

    #[test]
    fn rejects_unknown_class_label() {
        let mut artifact = minimal_artifact();
        artifact.classes = vec!["Low".into(), "Severe".into()];
        let err = artifact.validate().unwrap_err();
        assert!(err.contains("Severe"));
    }

    #[test]
    fn rejects_zero_scaler_std() {
        let mut artifact = minimal_artifact();
        artifact.scaler.std.insert("worker_age".into(), 0.0);
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn rejects_missing_category_list() {
        let mut artifact = minimal_artifact();
        artifact.encoder.categories.clear();
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn missing_file_maps_to_artifact_missing() {
        let err = ModelArtifact::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, GigstressError::ArtifactMissing(_)));
    }

    #[test]
    fn round_trips_through_json() {
        let artifact = minimal_artifact();
        let json = serde_json::to_string(&artifact).unwrap();
        let back: ModelArtifact = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.classes, artifact.classes);
    }
}
