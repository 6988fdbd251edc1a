//! Application state shared across handlers

use super::templates::load_templates;
use crate::adapters::{CommandLauncher, LocalStorage};
use crate::app::pipelines::PredictionPipeline;
use crate::config::TomlConfig;
use crate::domain::ports::{Predictor, TrainingLauncher};
use crate::utils::error::{MlopsError, Result};
use std::path::Path;
use std::sync::Arc;
use tera::Tera;

pub struct AppState {
    pub templates: Tera,
    pub predictor: Arc<dyn Predictor>,
    pub launcher: Arc<dyn TrainingLauncher>,
}

impl AppState {
    pub fn new(templates: Tera, predictor: Arc<dyn Predictor>, launcher: Arc<dyn TrainingLauncher>) -> Self {
        Self {
            templates,
            predictor,
            launcher,
        }
    }

    /// Wire the production collaborators: the model artifact under
    /// `project_root`, and the training command from the configuration.
    pub fn from_config(config: &TomlConfig, config_path: &str, project_root: &Path) -> Result<Self> {
        let templates = load_templates(config.server.template_dir.as_deref()).map_err(|e| {
            MlopsError::ConfigValidationError {
                field: "server.template_dir".to_string(),
                message: e.to_string(),
            }
        })?;

        let storage = LocalStorage::new(project_root);
        let predictor = PredictionPipeline::new(storage, config.get_model_trainer_config().model_path());

        let launcher = CommandLauncher::from_argv(&training_argv(config, config_path)?)?
            .with_working_dir(project_root)
            .with_timeout(config.training_timeout());

        Ok(Self::new(templates, Arc::new(predictor), Arc::new(launcher)))
    }
}

/// 未設定 `training.command` 時，以目前執行檔重跑 `train`
fn training_argv(config: &TomlConfig, config_path: &str) -> Result<Vec<String>> {
    if !config.training.command.is_empty() {
        return Ok(config.training.command.clone());
    }

    let exe = std::env::current_exe()?;
    Ok(vec![
        exe.to_string_lossy().into_owned(),
        "train".to_string(),
        "--config".to_string(),
        config_path.to_string(),
    ])
}
