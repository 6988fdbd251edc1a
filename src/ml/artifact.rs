use crate::ml::elastic_net::ElasticNet;
use crate::utils::error::{MlopsError, Result};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Serialized form of a trained model, as written by the trainer stage and
/// read back by the prediction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_columns: Vec<String>,
    pub target_column: String,
    pub trained_at: DateTime<Utc>,
    pub estimator: ElasticNet,
}

impl ModelArtifact {
    pub fn new(feature_columns: Vec<String>, target_column: String, estimator: ElasticNet) -> Result<Self> {
        if !estimator.is_fitted() {
            return Err(MlopsError::ModelNotFitted);
        }
        Ok(Self {
            feature_columns,
            target_column,
            trained_at: Utc::now(),
            estimator,
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let artifact: Self = serde_json::from_slice(data)?;
        let width = artifact.estimator.coefficients().map(|c| c.len());
        if width != Some(artifact.feature_columns.len()) {
            return Err(MlopsError::ProcessingError {
                message: format!(
                    "Model artifact is inconsistent: {} feature columns, {:?} coefficients",
                    artifact.feature_columns.len(),
                    width
                ),
            });
        }
        Ok(artifact)
    }

    pub fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        self.estimator.predict(features)
    }
}
