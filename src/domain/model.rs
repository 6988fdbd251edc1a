use crate::utils::error::{MlopsError, Result};
use crate::utils::validation::parse_float_field;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const FEATURE_COUNT: usize = 11;

/// 表單欄位名稱，順序即模型輸入順序
pub const FEATURE_FIELDS: [&str; FEATURE_COUNT] = [
    "fixed_acidity",
    "volatile_acidity",
    "citric_acid",
    "residual_sugar",
    "chlorides",
    "free_sulfur_dioxide",
    "total_sulfur_dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
];

/// Position of a dataset column (e.g. `fixed acidity`) among the form fields.
/// Spaces and underscores are interchangeable and case is ignored.
pub fn feature_index(column: &str) -> Option<usize> {
    let normalized = column.trim().replace(' ', "_");
    FEATURE_FIELDS
        .iter()
        .position(|field| field.eq_ignore_ascii_case(&normalized))
}

/// One set of wine measurements, in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Parse all eleven fields from submitted form data. Fails on the first
    /// missing or non-numeric field.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, field) in values.iter_mut().zip(FEATURE_FIELDS) {
            *slot = parse_float_field(field, form.get(field).map(String::as_str))?;
        }
        Ok(Self { values })
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let values: [f64; FEATURE_COUNT] =
            values
                .try_into()
                .map_err(|_| MlopsError::DimensionMismatch {
                    expected: format!("{} values", FEATURE_COUNT),
                    actual: format!("{} values", values.len()),
                })?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// 轉為 1×11 矩陣
    pub fn to_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| self.values[j])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataIngestionConfig {
    pub root_dir: String,
    pub source_url: String,
    pub local_data_file: String,
    pub unzip_dir: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataValidationConfig {
    pub root_dir: String,
    pub unzip_data_dir: String,
    pub status_file: String,
    pub schema: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTransformationConfig {
    pub root_dir: String,
    pub data_path: String,
    pub status_file: String,
    pub test_size: f64,
    pub random_state: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelTrainerConfig {
    pub root_dir: String,
    pub train_data_path: String,
    pub test_data_path: String,
    pub model_name: String,
    pub alpha: f64,
    pub l1_ratio: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub target_column: String,
}

impl ModelTrainerConfig {
    pub fn model_path(&self) -> String {
        format!("{}/{}", self.root_dir, self.model_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEvaluationConfig {
    pub root_dir: String,
    pub test_data_path: String,
    pub model_path: String,
    pub all_params: BTreeMap<String, f64>,
    pub metric_file_name: String,
    pub target_column: String,
    pub tracking_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// 驗證狀態檔的內容格式: `Validation status: true`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationStatus(pub bool);

impl ValidationStatus {
    const PREFIX: &'static str = "Validation status:";

    pub fn render(&self) -> String {
        format!("{} {}\n", Self::PREFIX, self.0)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let value = content
            .lines()
            .last()
            .and_then(|line| line.trim().strip_prefix(Self::PREFIX))
            .map(str::trim)
            .ok_or_else(|| MlopsError::ProcessingError {
                message: format!("Unrecognised validation status file: '{}'", content.trim()),
            })?;

        match value.to_ascii_lowercase().as_str() {
            "true" => Ok(Self(true)),
            "false" => Ok(Self(false)),
            other => Err(MlopsError::ProcessingError {
                message: format!("Unrecognised validation status value: '{}'", other),
            }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub artifacts: Vec<String>,
}

impl StageReport {
    pub fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, path: impl Into<String>) -> Self {
        self.artifacts.push(path.into());
        self
    }
}

/// 外部訓練指令的執行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingOutcome {
    Succeeded,
    Failed {
        exit_code: Option<i32>,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> HashMap<String, String> {
        [
            ("fixed_acidity", "7.4"),
            ("volatile_acidity", "0.7"),
            ("citric_acid", "0"),
            ("residual_sugar", "1.9"),
            ("chlorides", "0.076"),
            ("free_sulfur_dioxide", "11"),
            ("total_sulfur_dioxide", "34"),
            ("density", "0.9978"),
            ("pH", "3.51"),
            ("sulphates", "0.56"),
            ("alcohol", "9.4"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_feature_index_matches_dataset_names() {
        assert_eq!(feature_index("fixed acidity"), Some(0));
        assert_eq!(feature_index("free_sulfur_dioxide"), Some(5));
        assert_eq!(feature_index("pH"), Some(8));
        assert_eq!(feature_index("PH"), Some(8));
        assert_eq!(feature_index(" alcohol "), Some(10));
        assert_eq!(feature_index("quality"), None);
    }

    #[test]
    fn test_form_parsed_in_field_order() {
        let features = FeatureVector::from_form(&sample_form()).unwrap();
        assert_eq!(
            features.values(),
            &[7.4, 0.7, 0.0, 1.9, 0.076, 11.0, 34.0, 0.9978, 3.51, 0.56, 9.4]
        );

        let matrix = features.to_matrix();
        assert_eq!(matrix.dim(), (1, 11));
        assert_eq!(matrix[[0, 8]], 3.51);
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut form = sample_form();
        form.remove("sulphates");
        let err = FeatureVector::from_form(&form).unwrap_err();
        assert!(matches!(err, MlopsError::InvalidInputError { ref field, .. } if field == "sulphates"));
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert!(FeatureVector::from_slice(&[1.0, 2.0]).is_err());
        assert!(FeatureVector::from_slice(&[0.0; 11]).is_ok());
    }

    #[test]
    fn test_validation_status_round_trip() {
        assert_eq!(ValidationStatus(true).render(), "Validation status: true\n");
        assert!(ValidationStatus::parse("Validation status: True").unwrap().is_valid());
        assert!(!ValidationStatus::parse("Validation status: false\n").unwrap().is_valid());
        assert!(ValidationStatus::parse("garbage").is_err());
    }
}
