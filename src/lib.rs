pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod ml;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{CommandLauncher, LocalStorage};
pub use app::pipelines::PredictionPipeline;
pub use config::TomlConfig;
pub use core::{run_stage, StageKind, TrainingEngine};
pub use domain::model::{FeatureVector, TrainingOutcome};
pub use utils::error::{MlopsError, Result};
pub use web::{create_router, run_server, AppState};
