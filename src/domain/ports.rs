use crate::domain::model::{StageReport, TrainingOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use ndarray::{Array1, Array2};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// A single step of the training pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self) -> Result<StageReport>;
}

#[async_trait]
pub trait Predictor: Send + Sync {
    /// Predict one value per row of `features` (shape `n × 11`).
    async fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>>;
}

#[async_trait]
pub trait TrainingLauncher: Send + Sync {
    async fn launch(&self) -> Result<TrainingOutcome>;
}
