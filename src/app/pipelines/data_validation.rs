use crate::domain::model::{DataValidationConfig, StageReport, ValidationStatus};
use crate::domain::ports::{Stage, Storage};
use crate::ml::Dataset;
use crate::utils::error::{MlopsError, Result};

pub const STAGE_NAME: &str = "Data Validation Stage";

pub struct DataValidation<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: DataValidationConfig,
}

impl<S: Storage> DataValidation<S> {
    pub fn new(storage: S, config: DataValidationConfig) -> Self {
        Self { storage, config }
    }

    /// Check the extracted dataset against the schema and write the status
    /// file. A mismatch is reported through the status, not as an error.
    pub async fn validate_all_columns(&self) -> Result<ValidationStatus> {
        let data = self.storage.read_file(&self.config.unzip_data_dir).await?;

        let problems = match Dataset::from_csv_bytes(&data) {
            Ok(dataset) => self.schema_problems(&dataset),
            Err(MlopsError::ProcessingError { message }) => vec![message],
            Err(e) => return Err(e),
        };

        for problem in &problems {
            tracing::warn!("⚠️  Schema check: {}", problem);
        }
        let status = ValidationStatus(problems.is_empty());

        self.storage
            .write_file(&self.config.status_file, status.render().as_bytes())
            .await?;
        tracing::info!("Validation status: {}", status.is_valid());

        Ok(status)
    }

    fn schema_problems(&self, dataset: &Dataset) -> Vec<String> {
        let mut problems = Vec::new();

        for column in dataset.headers() {
            if !self.config.schema.contains_key(column) {
                problems.push(format!("column '{}' is not declared in the schema", column));
            }
        }

        for (column, dtype) in &self.config.schema {
            let Ok(values) = dataset.column(column) else {
                problems.push(format!("schema column '{}' is missing from the data", column));
                continue;
            };
            // float64 欄位已在解析時確認為數值
            if dtype.starts_with("int") && values.iter().any(|v| v.fract() != 0.0) {
                problems.push(format!("column '{}' is declared {} but holds fractional values", column, dtype));
            }
        }

        problems
    }
}

#[async_trait::async_trait]
impl<S: Storage> Stage for DataValidation<S> {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    async fn run(&self) -> Result<StageReport> {
        self.validate_all_columns().await?;
        Ok(StageReport::new(STAGE_NAME).with_artifact(self.config.status_file.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn schema() -> BTreeMap<String, String> {
        [("alcohol", "float64"), ("quality", "int64")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn run_with(csv: &str) -> (ValidationStatus, String) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write_file("data/wine.csv", csv.as_bytes()).await.unwrap();

        let stage = DataValidation::new(
            storage.clone(),
            DataValidationConfig {
                root_dir: "artifacts/data_validation".to_string(),
                unzip_data_dir: "data/wine.csv".to_string(),
                status_file: "artifacts/data_validation/status.txt".to_string(),
                schema: schema(),
            },
        );
        let status = stage.validate_all_columns().await.unwrap();
        let written = storage
            .read_file("artifacts/data_validation/status.txt")
            .await
            .unwrap();
        (status, String::from_utf8(written).unwrap())
    }

    #[tokio::test]
    async fn test_matching_schema() {
        let (status, file) = run_with("alcohol,quality\n9.4,5\n10.1,6\n").await;
        assert!(status.is_valid());
        assert_eq!(file, "Validation status: true\n");
    }

    #[tokio::test]
    async fn test_undeclared_column() {
        let (status, file) = run_with("alcohol,colour,quality\n9.4,1,5\n").await;
        assert!(!status.is_valid());
        assert_eq!(file, "Validation status: false\n");
    }

    #[tokio::test]
    async fn test_missing_schema_column() {
        let (status, _) = run_with("alcohol\n9.4\n").await;
        assert!(!status.is_valid());
    }

    #[tokio::test]
    async fn test_fractional_integer_column() {
        let (status, _) = run_with("alcohol,quality\n9.4,5.5\n").await;
        assert!(!status.is_valid());
    }

    #[tokio::test]
    async fn test_non_numeric_cell_is_invalid_not_error() {
        let (status, _) = run_with("alcohol,quality\nhigh,5\n").await;
        assert!(!status.is_valid());
    }
}
