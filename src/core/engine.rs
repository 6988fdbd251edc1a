use crate::app::pipelines::{
    DataIngestion, DataTransformation, DataValidation, ModelEvaluation, ModelTrainer,
};
use crate::config::TomlConfig;
use crate::domain::model::StageReport;
use crate::domain::ports::{Stage, Storage};
use crate::utils::error::{MlopsError, Result};
use crate::utils::monitor::SystemMonitor;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    DataIngestion,
    DataValidation,
    DataTransformation,
    ModelTrainer,
    ModelEvaluation,
}

impl StageKind {
    /// 執行順序
    pub const ALL: [StageKind; 5] = [
        StageKind::DataIngestion,
        StageKind::DataValidation,
        StageKind::DataTransformation,
        StageKind::ModelTrainer,
        StageKind::ModelEvaluation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::DataIngestion => "data_ingestion",
            StageKind::DataValidation => "data_validation",
            StageKind::DataTransformation => "data_transformation",
            StageKind::ModelTrainer => "model_trainer",
            StageKind::ModelEvaluation => "model_evaluation",
        }
    }

    pub fn build<S>(&self, config: &TomlConfig, storage: S) -> Box<dyn Stage>
    where
        S: Storage + Clone + 'static,
    {
        match self {
            StageKind::DataIngestion => {
                Box::new(DataIngestion::new(storage, config.get_data_ingestion_config()))
            }
            StageKind::DataValidation => {
                Box::new(DataValidation::new(storage, config.get_data_validation_config()))
            }
            StageKind::DataTransformation => Box::new(DataTransformation::new(
                storage,
                config.get_data_transformation_config(),
            )),
            StageKind::ModelTrainer => {
                Box::new(ModelTrainer::new(storage, config.get_model_trainer_config()))
            }
            StageKind::ModelEvaluation => {
                Box::new(ModelEvaluation::new(storage, config.get_model_evaluation_config()))
            }
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageKind {
    type Err = MlopsError;

    fn from_str(s: &str) -> Result<Self> {
        StageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| MlopsError::InvalidConfigValueError {
                field: "stage".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown stage. Valid stages: {}",
                    StageKind::ALL.map(|k| k.as_str()).join(", ")
                ),
            })
    }
}

/// Run one stage between start / completion banners. Errors are logged and
/// handed back unchanged.
pub async fn run_stage(stage: &dyn Stage) -> Result<StageReport> {
    tracing::info!(">>>>>> stage {} started <<<<<<", stage.name());

    match stage.run().await {
        Ok(report) => {
            tracing::info!(">>>>>> stage {} completed <<<<<<\n\nx==========x", stage.name());
            Ok(report)
        }
        Err(e) => {
            tracing::error!(
                "❌ stage {} failed: {} (Category: {:?}, Severity: {:?})",
                stage.name(),
                e,
                e.category(),
                e.severity()
            );
            Err(e)
        }
    }
}

pub struct TrainingEngine {
    stages: Vec<Box<dyn Stage>>,
    monitor: SystemMonitor,
}

impl TrainingEngine {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self::new_with_monitoring(stages, false)
    }

    pub fn new_with_monitoring(stages: Vec<Box<dyn Stage>>, monitor_enabled: bool) -> Self {
        Self {
            stages,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// The full pipeline, in execution order.
    pub fn from_config<S>(config: &TomlConfig, storage: S, monitor_enabled: bool) -> Self
    where
        S: Storage + Clone + 'static,
    {
        let stages = StageKind::ALL
            .iter()
            .map(|kind| kind.build(config, storage.clone()))
            .collect();
        Self::new_with_monitoring(stages, monitor_enabled)
    }

    /// Run every stage in order, stopping at the first failure.
    pub async fn run(&self) -> Result<Vec<StageReport>> {
        let mut reports = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let report = run_stage(stage.as_ref()).await?;
            if self.monitor.is_enabled() {
                self.monitor.log_stats(stage.name());
            }
            reports.push(report);
        }

        if self.monitor.is_enabled() {
            self.monitor.log_final_stats();
        }
        Ok(reports)
    }
}
