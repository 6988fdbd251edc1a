pub mod data_ingestion;
pub mod data_transformation;
pub mod data_validation;
pub mod model_evaluation;
pub mod model_trainer;
pub mod prediction_pipeline;

pub use data_ingestion::DataIngestion;
pub use data_transformation::DataTransformation;
pub use data_validation::DataValidation;
pub use model_evaluation::ModelEvaluation;
pub use model_trainer::ModelTrainer;
pub use prediction_pipeline::PredictionPipeline;
