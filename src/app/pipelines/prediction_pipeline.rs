use crate::domain::model::{feature_index, FEATURE_COUNT};
use crate::domain::ports::{Predictor, Storage};
use crate::ml::ModelArtifact;
use crate::utils::error::{MlopsError, Result};
use async_trait::async_trait;
use ndarray::{Array1, Array2, Axis};

/// Loads the trained model from storage on every call, so a retrained model
/// is served without a restart.
pub struct PredictionPipeline<S: Storage> {
    storage: S,
    model_path: String,
}

impl<S: Storage> PredictionPipeline<S> {
    pub fn new(storage: S, model_path: impl Into<String>) -> Self {
        Self {
            storage,
            model_path: model_path.into(),
        }
    }

    async fn load_model(&self) -> Result<ModelArtifact> {
        if !self.storage.exists(&self.model_path).await {
            tracing::warn!("No model artifact at {}", self.model_path);
            return Err(MlopsError::ModelNotFitted);
        }
        ModelArtifact::from_json(&self.storage.read_file(&self.model_path).await?)
    }
}

/// 模型欄位順序依訓練資料而定，這裡把表單順序的欄位重新排列成模型的順序
fn model_column_order(model: &ModelArtifact) -> Result<Vec<usize>> {
    if model.feature_columns.len() != FEATURE_COUNT {
        return Err(MlopsError::DimensionMismatch {
            expected: format!("{} model feature columns", FEATURE_COUNT),
            actual: format!("{} model feature columns", model.feature_columns.len()),
        });
    }

    let mut order = Vec::with_capacity(FEATURE_COUNT);
    for column in &model.feature_columns {
        let index = feature_index(column).ok_or_else(|| MlopsError::SchemaValidationError {
            message: format!("Model feature column '{}' has no matching form field", column),
        })?;
        if order.contains(&index) {
            return Err(MlopsError::SchemaValidationError {
                message: format!("Model feature column '{}' appears more than once", column),
            });
        }
        order.push(index);
    }
    Ok(order)
}

#[async_trait]
impl<S: Storage> Predictor for PredictionPipeline<S> {
    async fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        if features.ncols() != FEATURE_COUNT {
            return Err(MlopsError::DimensionMismatch {
                expected: format!("{} feature columns", FEATURE_COUNT),
                actual: format!("{} feature columns", features.ncols()),
            });
        }

        let model = self.load_model().await?;
        let order = model_column_order(&model)?;
        model.predict(&features.select(Axis(1), &order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::app::pipelines::ModelTrainer;
    use crate::domain::model::{FeatureVector, ModelTrainerConfig, FEATURE_FIELDS};
    use crate::ml::ElasticNet;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const DATASET_COLUMNS: [&str; FEATURE_COUNT] = [
        "fixed acidity",
        "volatile acidity",
        "citric acid",
        "residual sugar",
        "chlorides",
        "free sulfur dioxide",
        "total sulfur dioxide",
        "density",
        "pH",
        "sulphates",
        "alcohol",
    ];

    fn sample_form() -> HashMap<String, String> {
        FEATURE_FIELDS
            .iter()
            .zip(["7.4", "0.7", "0", "1.9", "0.076", "11", "34", "0.9978", "3.51", "0.56", "9.4"])
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_predicts_with_saved_model() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        // 目標值等於 alcohol 欄位，其餘欄位為常數
        let x = Array2::from_shape_fn((20, FEATURE_COUNT), |(i, j)| if j == 10 { i as f64 } else { 1.0 });
        let y = x.column(10).to_owned();
        let mut estimator = ElasticNet::new(0.0, 0.5).with_max_iter(10_000);
        estimator.fit(&x, &y).unwrap();
        let columns = DATASET_COLUMNS.iter().map(|c| c.to_string()).collect();
        let artifact = ModelArtifact::new(columns, "quality".to_string(), estimator).unwrap();
        storage.write_file("model.json", &artifact.to_json().unwrap()).await.unwrap();

        let pipeline = PredictionPipeline::new(storage, "model.json");
        let mut sample = Array2::zeros((1, FEATURE_COUNT));
        sample[[0, 10]] = 9.4;
        let prediction = pipeline.predict(&sample).await.unwrap();
        assert_eq!(prediction.len(), 1);
        assert!((prediction[0] - 9.4).abs() < 0.05);
    }

    #[tokio::test]
    async fn test_reordered_training_columns_follow_form_fields() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        // alcohol 放在第一欄；quality = alcohol - 4，其餘欄位為常數
        let mut header = vec!["alcohol"];
        header.extend(&DATASET_COLUMNS[..10]);
        header.push("quality");
        let mut csv = header.join(",");
        csv.push('\n');
        let others = vec!["1"; 10].join(",");
        for i in 0..30 {
            let alcohol = 9.0 + (i % 6) as f64 * 0.5;
            csv.push_str(&format!("{},{},{}\n", alcohol, others, alcohol - 4.0));
        }
        storage.write_file("train.csv", csv.as_bytes()).await.unwrap();

        let trainer = ModelTrainer::new(
            storage.clone(),
            ModelTrainerConfig {
                root_dir: "artifacts/model_trainer".to_string(),
                train_data_path: "train.csv".to_string(),
                test_data_path: "test.csv".to_string(),
                model_name: "model.json".to_string(),
                alpha: 0.0,
                l1_ratio: 0.5,
                max_iter: 20_000,
                tol: 1e-9,
                target_column: "quality".to_string(),
            },
        );
        let artifact = trainer.train().await.unwrap();
        assert_eq!(artifact.feature_columns[0], "alcohol");

        let pipeline = PredictionPipeline::new(storage, "artifacts/model_trainer/model.json");
        let features = FeatureVector::from_form(&sample_form()).unwrap();
        let prediction = pipeline.predict(&features.to_matrix()).await.unwrap();
        assert!((prediction[0] - 5.4).abs() < 0.05, "got {}", prediction[0]);
    }

    #[tokio::test]
    async fn test_unknown_model_column_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let x = Array2::from_shape_fn((5, FEATURE_COUNT), |(i, j)| (i + j) as f64);
        let y = x.column(0).to_owned();
        let mut estimator = ElasticNet::new(0.1, 0.5);
        estimator.fit(&x, &y).unwrap();
        let mut columns: Vec<String> = DATASET_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns[3] = "colour".to_string();
        let artifact = ModelArtifact::new(columns, "quality".to_string(), estimator).unwrap();
        storage.write_file("model.json", &artifact.to_json().unwrap()).await.unwrap();

        let pipeline = PredictionPipeline::new(storage, "model.json");
        let err = pipeline.predict(&Array2::zeros((1, FEATURE_COUNT))).await.unwrap_err();
        assert!(matches!(err, MlopsError::SchemaValidationError { .. }));
    }

    #[tokio::test]
    async fn test_missing_model_artifact() {
        let dir = TempDir::new().unwrap();
        let pipeline = PredictionPipeline::new(LocalStorage::new(dir.path()), "model.json");
        let err = pipeline.predict(&Array2::zeros((1, FEATURE_COUNT))).await.unwrap_err();
        assert!(matches!(err, MlopsError::ModelNotFitted));
    }

    #[tokio::test]
    async fn test_wrong_width_rejected() {
        let dir = TempDir::new().unwrap();
        let pipeline = PredictionPipeline::new(LocalStorage::new(dir.path()), "model.json");
        assert!(pipeline.predict(&Array2::zeros((1, 3))).await.is_err());
    }
}
