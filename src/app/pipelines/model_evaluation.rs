use crate::app::tracking::{LocalTracker, RunRecord};
use crate::domain::model::{EvaluationMetrics, ModelEvaluationConfig, StageReport};
use crate::domain::ports::{Stage, Storage};
use crate::ml::{metrics, Dataset, ModelArtifact};
use crate::utils::error::Result;

pub const STAGE_NAME: &str = "Model Evaluation Stage";

const MODEL_NAME: &str = "ElasticNetModel";

pub struct ModelEvaluation<S: Storage + Clone> {
    pub(crate) storage: S,
    pub(crate) config: ModelEvaluationConfig,
}

impl<S: Storage + Clone> ModelEvaluation<S> {
    pub fn new(storage: S, config: ModelEvaluationConfig) -> Self {
        Self { storage, config }
    }

    pub async fn evaluate(&self) -> Result<EvaluationMetrics> {
        let test = Dataset::from_csv_bytes(&self.storage.read_file(&self.config.test_data_path).await?)?;
        let model = ModelArtifact::from_json(&self.storage.read_file(&self.config.model_path).await?)?;

        let x = test.select(&model.feature_columns)?;
        let y = test.column(&self.config.target_column)?;
        let predicted = model.predict(&x)?;

        let scores = metrics::evaluate(&y, &predicted)?;
        tracing::info!(
            "📈 rmse={:.4} mae={:.4} r2={:.4} on {} rows",
            scores.rmse,
            scores.mae,
            scores.r2,
            y.len()
        );

        self.storage
            .write_file(&self.config.metric_file_name, &serde_json::to_vec_pretty(&scores)?)
            .await?;

        Ok(scores)
    }

    /// Evaluate and record the run with the tracker.
    pub async fn log_into_tracker(&self) -> Result<String> {
        let scores = self.evaluate().await?;

        let tracker = LocalTracker::new(self.storage.clone(), self.config.tracking_dir.clone());
        let record = RunRecord::new(
            MODEL_NAME,
            self.config.all_params.clone(),
            scores,
            &self.config.model_path,
        );
        tracker.log_run(&record).await
    }
}

#[async_trait::async_trait]
impl<S: Storage + Clone> Stage for ModelEvaluation<S> {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    async fn run(&self) -> Result<StageReport> {
        let run_path = self.log_into_tracker().await?;
        Ok(StageReport::new(STAGE_NAME)
            .with_artifact(self.config.metric_file_name.clone())
            .with_artifact(run_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::ml::ElasticNet;
    use crate::utils::error::MlopsError;
    use ndarray::array;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn config() -> ModelEvaluationConfig {
        ModelEvaluationConfig {
            root_dir: "artifacts/model_evaluation".to_string(),
            test_data_path: "test.csv".to_string(),
            model_path: "model.json".to_string(),
            all_params: BTreeMap::from([("alpha".to_string(), 0.0)]),
            metric_file_name: "artifacts/model_evaluation/metrics.json".to_string(),
            target_column: "quality".to_string(),
            tracking_dir: "artifacts/model_evaluation/runs".to_string(),
        }
    }

    async fn storage_with_model(dir: &TempDir) -> LocalStorage {
        let storage = LocalStorage::new(dir.path());
        let mut estimator = ElasticNet::new(0.0, 0.5).with_max_iter(5000);
        // quality = alcohol - 4
        estimator
            .fit(&array![[9.0], [10.0], [11.0], [12.0]], &array![5.0, 6.0, 7.0, 8.0])
            .unwrap();
        let artifact =
            ModelArtifact::new(vec!["alcohol".to_string()], "quality".to_string(), estimator).unwrap();
        storage.write_file("model.json", &artifact.to_json().unwrap()).await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_metrics_and_run_record_written() {
        let dir = TempDir::new().unwrap();
        let storage = storage_with_model(&dir).await;
        storage
            .write_file("test.csv", b"alcohol,quality\n9.5,5\n10.5,7\n")
            .await
            .unwrap();

        let stage = ModelEvaluation::new(storage.clone(), config());
        let report = stage.run().await.unwrap();

        let metrics: EvaluationMetrics = serde_json::from_slice(
            &storage.read_file("artifacts/model_evaluation/metrics.json").await.unwrap(),
        )
        .unwrap();
        // 預測 5.5 與 6.5，誤差皆為 0.5
        assert!((metrics.mae - 0.5).abs() < 1e-6);
        assert!((metrics.rmse - 0.5).abs() < 1e-6);

        let run_path = &report.artifacts[1];
        assert!(run_path.starts_with("artifacts/model_evaluation/runs/"));
        let record: RunRecord = serde_json::from_slice(&storage.read_file(run_path).await.unwrap()).unwrap();
        assert_eq!(record.model_name, MODEL_NAME);
        assert_eq!(record.params.get("alpha"), Some(&0.0));
    }

    #[tokio::test]
    async fn test_missing_model() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write_file("test.csv", b"alcohol,quality\n9.5,5\n").await.unwrap();

        let err = ModelEvaluation::new(storage, config()).evaluate().await.unwrap_err();
        assert!(matches!(err, MlopsError::IoError(_)));
    }
}
