use crate::domain::model::{DataIngestionConfig, StageReport};
use crate::domain::ports::{Stage, Storage};
use crate::utils::error::Result;
use reqwest::Client;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub const STAGE_NAME: &str = "Data Ingestion Stage";

/// 下載資料集壓縮檔並解壓
pub struct DataIngestion<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: DataIngestionConfig,
    pub(crate) client: Client,
}

impl<S: Storage> DataIngestion<S> {
    pub fn new(storage: S, config: DataIngestionConfig) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    /// Download the archive unless it is already present.
    pub async fn download_file(&self) -> Result<()> {
        let local = &self.config.local_data_file;

        if self.storage.exists(local).await {
            let size = self.storage.read_file(local).await?.len();
            tracing::info!("📦 File already exists: {} ({} bytes)", local, size);
            return Ok(());
        }

        tracing::info!("⬇️  Downloading {}", self.config.source_url);
        let response = self
            .client
            .get(&self.config.source_url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        self.storage.write_file(local, &bytes).await?;
        tracing::info!("📦 Saved {} bytes to {}", bytes.len(), local);
        Ok(())
    }

    /// Extract every regular file of the archive into `unzip_dir`. Returns
    /// the written paths.
    pub async fn extract_zip_file(&self) -> Result<Vec<String>> {
        let data = self.storage.read_file(&self.config.local_data_file).await?;
        let entries = read_zip_entries(data)?;

        let mut written = Vec::with_capacity(entries.len());
        for (name, contents) in entries {
            let target = Path::new(&self.config.unzip_dir)
                .join(&name)
                .to_string_lossy()
                .into_owned();
            self.storage.write_file(&target, &contents).await?;
            tracing::debug!("Extracted {} ({} bytes)", target, contents.len());
            written.push(target);
        }

        Ok(written)
    }
}

fn read_zip_entries(data: Vec<u8>) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        // 拒絕 `../` 之類逃出解壓目錄的路徑
        let Some(name) = file.enclosed_name() else {
            tracing::warn!("Skipping zip entry with unsafe path: {}", file.name());
            continue;
        };

        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)?;
        entries.push((name, contents));
    }

    Ok(entries)
}

#[async_trait::async_trait]
impl<S: Storage> Stage for DataIngestion<S> {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    async fn run(&self) -> Result<StageReport> {
        self.download_file().await?;
        let extracted = self.extract_zip_file().await?;

        let mut report = StageReport::new(STAGE_NAME).with_artifact(self.config.local_data_file.clone());
        report.artifacts.extend(extracted);
        Ok(report)
    }
}
