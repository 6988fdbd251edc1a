use crate::domain::model::{
    DataIngestionConfig, DataTransformationConfig, DataValidationConfig, ModelEvaluationConfig,
    ModelTrainerConfig,
};
use crate::utils::error::{MlopsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// 內建預設配置，與 `config/config.toml` 相同
pub const DEFAULT_CONFIG: &str = include_str!("../../config/config.toml");

const DEFAULT_TOL: f64 = 1e-6;

/// Configuration manager: one TOML file describing every stage, the model
/// parameters, the dataset schema and the web server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub artifacts: ArtifactsConfig,
    pub data_ingestion: DataIngestionSection,
    pub data_validation: DataValidationSection,
    pub data_transformation: DataTransformationSection,
    pub model_trainer: ModelTrainerSection,
    pub model_evaluation: ModelEvaluationSection,
    pub params: ParamsConfig,
    pub schema: SchemaConfig,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub training: TrainingSection,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataIngestionSection {
    pub root_dir: String,
    pub source_url: String,
    pub local_data_file: String,
    pub unzip_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataValidationSection {
    pub root_dir: String,
    pub unzip_data_dir: String,
    pub status_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTransformationSection {
    pub root_dir: String,
    pub data_path: String,
    pub test_size: Option<f64>,
    pub random_state: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTrainerSection {
    pub root_dir: String,
    pub train_data_path: String,
    pub test_data_path: String,
    pub model_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEvaluationSection {
    pub root_dir: String,
    pub test_data_path: String,
    pub model_path: String,
    pub metric_file_name: String,
    pub tracking_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsConfig {
    pub elastic_net: ElasticNetParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNetParams {
    pub alpha: f64,
    pub l1_ratio: f64,
    pub max_iter: Option<usize>,
    pub tol: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub target_column: String,
    pub columns: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub template_dir: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            template_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingSection {
    #[serde(default)]
    pub command: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub file_name: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MlopsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MlopsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn embedded_default() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// 替換環境變數 (例如 ${DATA_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::{Captures, Regex};
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern is valid")
        });

        re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("data_ingestion.source_url", &self.data_ingestion.source_url)?;

        for (field, path) in [
            ("artifacts.root", &self.artifacts.root),
            ("data_ingestion.local_data_file", &self.data_ingestion.local_data_file),
            ("data_ingestion.unzip_dir", &self.data_ingestion.unzip_dir),
            ("data_validation.unzip_data_dir", &self.data_validation.unzip_data_dir),
            ("data_validation.status_file", &self.data_validation.status_file),
            ("data_transformation.data_path", &self.data_transformation.data_path),
            ("model_trainer.train_data_path", &self.model_trainer.train_data_path),
            ("model_trainer.model_name", &self.model_trainer.model_name),
            ("model_evaluation.test_data_path", &self.model_evaluation.test_data_path),
            ("model_evaluation.model_path", &self.model_evaluation.model_path),
            ("model_evaluation.metric_file_name", &self.model_evaluation.metric_file_name),
        ] {
            validation::validate_path(field, path)?;
        }

        let params = &self.params.elastic_net;
        if !params.alpha.is_finite() || params.alpha < 0.0 {
            return Err(MlopsError::InvalidConfigValueError {
                field: "params.elastic_net.alpha".to_string(),
                value: params.alpha.to_string(),
                reason: "Value must be a non-negative number".to_string(),
            });
        }
        validation::validate_range("params.elastic_net.l1_ratio", params.l1_ratio, 0.0, 1.0)?;
        if let Some(max_iter) = params.max_iter {
            validation::validate_positive_number("params.elastic_net.max_iter", max_iter, 1)?;
        }
        if let Some(tol) = params.tol {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(MlopsError::InvalidConfigValueError {
                    field: "params.elastic_net.tol".to_string(),
                    value: tol.to_string(),
                    reason: "Value must be a positive number".to_string(),
                });
            }
        }

        let test_size = self.test_size();
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(MlopsError::InvalidConfigValueError {
                field: "data_transformation.test_size".to_string(),
                value: test_size.to_string(),
                reason: "Value must be strictly between 0 and 1".to_string(),
            });
        }

        validation::validate_non_empty_string("schema.target_column", &self.schema.target_column)?;
        if !self.schema.columns.contains_key(&self.schema.target_column) {
            return Err(MlopsError::ConfigValidationError {
                field: "schema.columns".to_string(),
                message: format!(
                    "Target column '{}' is not declared in the schema",
                    self.schema.target_column
                ),
            });
        }

        validation::validate_positive_number("server.port", self.server.port as usize, 1)?;

        Ok(())
    }

    pub fn test_size(&self) -> f64 {
        self.data_transformation.test_size.unwrap_or(0.25)
    }

    pub fn random_state(&self) -> u64 {
        self.data_transformation.random_state.unwrap_or(42)
    }

    pub fn tracking_dir(&self) -> String {
        self.model_evaluation
            .tracking_dir
            .clone()
            .unwrap_or_else(|| format!("{}/runs", self.model_evaluation.root_dir))
    }

    pub fn training_timeout(&self) -> Option<Duration> {
        self.training.timeout_seconds.map(Duration::from_secs)
    }

    /// Host and port, with `API_HOST` / `API_PORT` taking precedence.
    pub fn server_address(&self) -> (String, u16) {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| self.server.host.clone());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.server.port);
        (host, port)
    }

    pub fn get_data_ingestion_config(&self) -> DataIngestionConfig {
        let section = &self.data_ingestion;
        DataIngestionConfig {
            root_dir: section.root_dir.clone(),
            source_url: section.source_url.clone(),
            local_data_file: section.local_data_file.clone(),
            unzip_dir: section.unzip_dir.clone(),
        }
    }

    pub fn get_data_validation_config(&self) -> DataValidationConfig {
        let section = &self.data_validation;
        DataValidationConfig {
            root_dir: section.root_dir.clone(),
            unzip_data_dir: section.unzip_data_dir.clone(),
            status_file: section.status_file.clone(),
            schema: self.schema.columns.clone(),
        }
    }

    pub fn get_data_transformation_config(&self) -> DataTransformationConfig {
        let section = &self.data_transformation;
        DataTransformationConfig {
            root_dir: section.root_dir.clone(),
            data_path: section.data_path.clone(),
            status_file: self.data_validation.status_file.clone(),
            test_size: self.test_size(),
            random_state: self.random_state(),
        }
    }

    pub fn get_model_trainer_config(&self) -> ModelTrainerConfig {
        let section = &self.model_trainer;
        let params = &self.params.elastic_net;
        ModelTrainerConfig {
            root_dir: section.root_dir.clone(),
            train_data_path: section.train_data_path.clone(),
            test_data_path: section.test_data_path.clone(),
            model_name: section.model_name.clone(),
            alpha: params.alpha,
            l1_ratio: params.l1_ratio,
            max_iter: params.max_iter.unwrap_or(1000),
            tol: params.tol.unwrap_or(DEFAULT_TOL),
            target_column: self.schema.target_column.clone(),
        }
    }

    pub fn get_model_evaluation_config(&self) -> ModelEvaluationConfig {
        let section = &self.model_evaluation;
        let params = &self.params.elastic_net;

        let mut all_params = BTreeMap::new();
        all_params.insert("alpha".to_string(), params.alpha);
        all_params.insert("l1_ratio".to_string(), params.l1_ratio);
        all_params.insert("max_iter".to_string(), params.max_iter.unwrap_or(1000) as f64);
        all_params.insert("tol".to_string(), params.tol.unwrap_or(DEFAULT_TOL));

        ModelEvaluationConfig {
            root_dir: section.root_dir.clone(),
            test_data_path: section.test_data_path.clone(),
            model_path: section.model_path.clone(),
            all_params,
            metric_file_name: section.metric_file_name.clone(),
            target_column: self.schema.target_column.clone(),
            tracking_dir: self.tracking_dir(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
