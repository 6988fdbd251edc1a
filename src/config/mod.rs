pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "wine-mlops")]
#[command(about = "Wine quality training pipeline and prediction web app")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "config/config.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the prediction web app
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the training pipeline (all stages, or one)
    Train {
        /// data_ingestion, data_validation, data_transformation, model_trainer or model_evaluation
        #[arg(long)]
        stage: Option<String>,

        #[arg(long, help = "Log CPU and memory usage after each stage")]
        monitor: bool,
    },

    /// Predict quality for one sample
    Predict {
        /// Eleven comma-separated values in form field order
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_stage() {
        let cli = CliConfig::parse_from(["wine-mlops", "train", "--stage", "model_trainer", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, "config/config.toml");
        assert!(matches!(
            cli.command,
            Command::Train { stage: Some(ref s), monitor: false } if s == "model_trainer"
        ));
    }

    #[test]
    fn test_parse_predict_values() {
        let cli = CliConfig::parse_from([
            "wine-mlops",
            "predict",
            "--values",
            "7.4,0.7,0,1.9,0.076,11,34,0.9978,3.51,0.56,9.4",
        ]);
        match cli.command {
            Command::Predict { values } => assert_eq!(values.len(), 11),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
