//! Local experiment tracking: each evaluation run is recorded as one JSON
//! document (parameters, metrics, model path) under the tracking directory.

use crate::domain::model::EvaluationMetrics;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub recorded_at: DateTime<Utc>,
    pub model_name: String,
    pub params: BTreeMap<String, f64>,
    pub metrics: EvaluationMetrics,
    pub model_path: String,
}

impl RunRecord {
    pub fn new(
        model_name: &str,
        params: BTreeMap<String, f64>,
        metrics: EvaluationMetrics,
        model_path: &str,
    ) -> Self {
        let recorded_at = Utc::now();
        Self {
            run_id: recorded_at.format("%Y%m%dT%H%M%S%.3fZ").to_string(),
            recorded_at,
            model_name: model_name.to_string(),
            params,
            metrics,
            model_path: model_path.to_string(),
        }
    }
}

pub struct LocalTracker<S: Storage> {
    storage: S,
    tracking_dir: String,
}

impl<S: Storage> LocalTracker<S> {
    pub fn new(storage: S, tracking_dir: impl Into<String>) -> Self {
        Self {
            storage,
            tracking_dir: tracking_dir.into(),
        }
    }

    /// Persist `record`; returns the path it was written to.
    pub async fn log_run(&self, record: &RunRecord) -> Result<String> {
        let path = format!("{}/{}.json", self.tracking_dir, record.run_id);
        self.storage
            .write_file(&path, &serde_json::to_vec_pretty(record)?)
            .await?;
        tracing::info!("📝 Recorded run {} at {}", record.run_id, path);
        Ok(path)
    }
}
