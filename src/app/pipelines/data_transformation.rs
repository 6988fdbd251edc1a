use crate::domain::model::{DataTransformationConfig, StageReport, ValidationStatus};
use crate::domain::ports::{Stage, Storage};
use crate::ml::split::train_test_split;
use crate::ml::Dataset;
use crate::utils::error::{MlopsError, Result};

pub const STAGE_NAME: &str = "Data Transformation Stage";

pub struct DataTransformation<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: DataTransformationConfig,
}

impl<S: Storage> DataTransformation<S> {
    pub fn new(storage: S, config: DataTransformationConfig) -> Self {
        Self { storage, config }
    }

    pub fn train_path(&self) -> String {
        format!("{}/train.csv", self.config.root_dir)
    }

    pub fn test_path(&self) -> String {
        format!("{}/test.csv", self.config.root_dir)
    }

    async fn ensure_validated(&self) -> Result<()> {
        if !self.storage.exists(&self.config.status_file).await {
            return Err(MlopsError::SchemaValidationError {
                message: format!(
                    "No validation status at {}; run the data validation stage first",
                    self.config.status_file
                ),
            });
        }

        let content = self.storage.read_file(&self.config.status_file).await?;
        let status = ValidationStatus::parse(&String::from_utf8_lossy(&content))?;
        if !status.is_valid() {
            return Err(MlopsError::SchemaValidationError {
                message: "Your data schema is not valid".to_string(),
            });
        }
        Ok(())
    }

    pub async fn train_test_splitting(&self) -> Result<(Dataset, Dataset)> {
        let data = self.storage.read_file(&self.config.data_path).await?;
        let dataset = Dataset::from_csv_bytes(&data)?;

        let (train_rows, test_rows) =
            train_test_split(dataset.rows(), self.config.test_size, self.config.random_state)?;
        let train = dataset.with_rows(train_rows)?;
        let test = dataset.with_rows(test_rows)?;

        self.storage.write_file(&self.train_path(), &train.to_csv_bytes()?).await?;
        self.storage.write_file(&self.test_path(), &test.to_csv_bytes()?).await?;

        tracing::info!("Split data into training and test sets");
        tracing::info!("train shape: ({}, {})", train.len(), train.headers().len());
        tracing::info!("test shape: ({}, {})", test.len(), test.headers().len());

        Ok((train, test))
    }
}

#[async_trait::async_trait]
impl<S: Storage> Stage for DataTransformation<S> {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    async fn run(&self) -> Result<StageReport> {
        self.ensure_validated().await?;
        self.train_test_splitting().await?;
        Ok(StageReport::new(STAGE_NAME)
            .with_artifact(self.train_path())
            .with_artifact(self.test_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use tempfile::TempDir;

    const CSV: &str = "alcohol,quality\n9.4,5\n9.8,5\n10.0,6\n11.2,6\n9.1,4\n12.0,7\n10.5,6\n9.9,5\n";

    async fn stage(dir: &TempDir, status: Option<bool>) -> DataTransformation<LocalStorage> {
        let storage = LocalStorage::new(dir.path());
        storage.write_file("data/wine.csv", CSV.as_bytes()).await.unwrap();
        if let Some(valid) = status {
            storage
                .write_file("status.txt", ValidationStatus(valid).render().as_bytes())
                .await
                .unwrap();
        }

        DataTransformation::new(
            storage,
            DataTransformationConfig {
                root_dir: "artifacts/data_transformation".to_string(),
                data_path: "data/wine.csv".to_string(),
                status_file: "status.txt".to_string(),
                test_size: 0.25,
                random_state: 42,
            },
        )
    }

    #[tokio::test]
    async fn test_split_written_with_headers() {
        let dir = TempDir::new().unwrap();
        let stage = stage(&dir, Some(true)).await;
        let report = stage.run().await.unwrap();
        assert_eq!(report.artifacts.len(), 2);

        let train = std::fs::read_to_string(dir.path().join("artifacts/data_transformation/train.csv")).unwrap();
        let test = std::fs::read_to_string(dir.path().join("artifacts/data_transformation/test.csv")).unwrap();
        assert!(train.starts_with("alcohol,quality\n"));
        assert!(test.starts_with("alcohol,quality\n"));
        // 8 筆資料，測試集 ceil(0.25 * 8) = 2
        assert_eq!(train.lines().count(), 1 + 6);
        assert_eq!(test.lines().count(), 1 + 2);
    }

    #[tokio::test]
    async fn test_refuses_invalid_schema() {
        let dir = TempDir::new().unwrap();
        let stage = stage(&dir, Some(false)).await;
        let err = stage.run().await.unwrap_err();
        assert!(matches!(err, MlopsError::SchemaValidationError { .. }));
        assert!(!dir.path().join("artifacts/data_transformation/train.csv").exists());
    }

    #[tokio::test]
    async fn test_refuses_without_status() {
        let dir = TempDir::new().unwrap();
        let stage = stage(&dir, None).await;
        assert!(stage.run().await.is_err());
    }
}
