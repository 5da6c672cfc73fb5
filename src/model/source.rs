use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use log::info;

use super::ClassifierModel;
use crate::error::ScoreError;

/// Default timeout around the remote model fetch. The fetch must fail with
/// [`ScoreError::ModelLoad`] rather than hang.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// File name of the model artifact shipped next to the executable.
pub const DEFAULT_MODEL_FILE: &str = "model_final.json";

// ---------------------------------------------------------------------------
// ModelSource – where the serialized model comes from
// ---------------------------------------------------------------------------

/// Strategy for obtaining the trained model. The pipeline is injected with
/// one of these at startup; it never branches on where the model came from.
pub trait ModelSource {
    fn load(&self) -> Result<ClassifierModel, ScoreError>;
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

/// Reads the serialized model from local storage.
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> LocalFile {
        LocalFile { path: path.into() }
    }

    /// The co-located artifact: `file_name` next to the running executable.
    pub fn beside_executable(file_name: &str) -> Result<LocalFile> {
        let exe = std::env::current_exe().context("locating the running executable")?;
        let dir = exe
            .parent()
            .ok_or_else(|| anyhow!("executable has no parent directory"))?;
        Ok(LocalFile::new(dir.join(file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for LocalFile {
    fn load(&self) -> Result<ClassifierModel, ScoreError> {
        let origin = self.path.display().to_string();
        let read = || -> Result<ClassifierModel> {
            let bytes = std::fs::read(&self.path).context("reading model file")?;
            ClassifierModel::from_bytes(&bytes)
        };
        let model = read().map_err(|e| ScoreError::model_load(&origin, e))?;
        info!("loaded model from {origin} ({} features)", model.features.len());
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Remote fetch
// ---------------------------------------------------------------------------

/// Fetches the serialized model with a single HTTP GET. No retry, no
/// integrity check beyond successful deserialization.
pub struct RemoteUrl {
    url: String,
    timeout: Duration,
}

impl RemoteUrl {
    pub fn new(url: impl Into<String>) -> RemoteUrl {
        RemoteUrl {
            url: url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> RemoteUrl {
        self.timeout = timeout;
        self
    }

    fn fetch(&self) -> Result<ClassifierModel> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("building HTTP client")?;
        let response = client
            .get(&self.url)
            .send()
            .context("fetching model")?;
        if !response.status().is_success() {
            bail!("server answered {}", response.status());
        }
        let bytes = response.bytes().context("reading response body")?;
        ClassifierModel::from_bytes(&bytes)
    }
}

impl ModelSource for RemoteUrl {
    fn load(&self) -> Result<ClassifierModel, ScoreError> {
        let model = self
            .fetch()
            .map_err(|e| ScoreError::model_load(&self.url, e))?;
        info!("fetched model from {} ({} features)", self.url, model.features.len());
        Ok(model)
    }
}
