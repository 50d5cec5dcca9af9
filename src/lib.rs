pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod model;
pub mod predictor;
pub mod preprocess;
pub mod services;

pub use config::AppConfig;
pub use domain::{StressLevel, WorkerFeatures};
pub use error::{GigstressError, Result};
pub use model::ModelArtifact;
pub use predictor::{Prediction, StressPredictor};
