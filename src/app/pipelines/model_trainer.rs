use crate::domain::model::{ModelTrainerConfig, StageReport};
use crate::domain::ports::{Stage, Storage};
use crate::ml::{Dataset, ElasticNet, ModelArtifact};
use crate::utils::error::Result;

pub const STAGE_NAME: &str = "Model Trainer Stage";

pub struct ModelTrainer<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: ModelTrainerConfig,
}

impl<S: Storage> ModelTrainer<S> {
    pub fn new(storage: S, config: ModelTrainerConfig) -> Self {
        Self { storage, config }
    }

    pub async fn train(&self) -> Result<ModelArtifact> {
        let data = self.storage.read_file(&self.config.train_data_path).await?;
        let train = Dataset::from_csv_bytes(&data)?;

        let target = &self.config.target_column;
        let feature_columns = train.feature_columns(target)?;
        let x = train.select(&feature_columns)?;
        let y = train.column(target)?;

        tracing::info!(
            "Fitting ElasticNet(alpha={}, l1_ratio={}) on {} rows x {} features",
            self.config.alpha,
            self.config.l1_ratio,
            x.nrows(),
            x.ncols()
        );

        let mut estimator =
            ElasticNet::new(self.config.alpha, self.config.l1_ratio)
            .with_max_iter(self.config.max_iter)
            .with_tol(self.config.tol);
        estimator.fit(&x, &y)?;

        let artifact = ModelArtifact::new(feature_columns, target.clone(), estimator)?;
        let model_path = self.config.model_path();
        self.storage.write_file(&model_path, &artifact.to_json()?).await?;
        tracing::info!("💾 Model saved to {}", model_path);

        Ok(artifact)
    }
}

#[async_trait::async_trait]
impl<S: Storage> Stage for ModelTrainer<S> {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    async fn run(&self) -> Result<StageReport> {
        self.train().await?;
        Ok(StageReport::new(STAGE_NAME).with_artifact(self.config.model_path()))
    }
}
