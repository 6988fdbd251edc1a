pub mod engine;

pub use crate::domain::model::StageReport;
pub use crate::domain::ports::{Predictor, Stage, Storage, TrainingLauncher};
pub use crate::utils::error::Result;
pub use engine::{run_stage, StageKind, TrainingEngine};
