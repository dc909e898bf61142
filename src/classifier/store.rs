//! Local store of classifier bundles, with download from the Hugging Face Hub

use super::artifacts::{BundleConfig, BUNDLE_FILES, CONFIG_FILE};
use super::{ClassificationArtifacts, RoleClassifier};
use crate::error::{Result, ResumeInsightError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Summary of an installed bundle for display
#[derive(Debug, Clone, Serialize)]
pub struct BundleInfo {
    pub name: String,
    pub path: PathBuf,
    pub model_type: String,
    pub vocabulary_size: usize,
    pub n_classes: usize,
    pub size_bytes: u64,
}

/// Tracks bundles installed under the models directory
pub struct ArtifactStore {
    models_dir: PathBuf,
    installed: BTreeSet<String>,
}

impl ArtifactStore {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ResumeInsightError::ModelLoading(format!("Failed to create artifacts directory: {}", e))
            })?;
        }

        let mut store = Self {
            models_dir,
            installed: BTreeSet::new(),
        };
        store.scan().await?;

        Ok(store)
    }

    async fn scan(&mut self) -> Result<()> {
        self.installed.clear();

        let mut entries = fs::read_dir(&self.models_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !entry.file_type().await?.is_dir() {
                continue;
            }
            if Self::is_complete_bundle(&entry.path()).await {
                self.installed.insert(name);
            }
        }

        Ok(())
    }

    /// A bundle directory is listed when every bundle file is present and its
    /// `config.json` parses. Tensor and vocabulary contents are checked on load.
    pub async fn is_complete_bundle(path: &Path) -> bool {
        for file in BUNDLE_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }

        match fs::read_to_string(path.join(CONFIG_FILE)).await {
            Ok(content) => serde_json::from_str::<BundleConfig>(&content).is_ok(),
            Err(_) => false,
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn list_bundles(&self) -> Vec<&str> {
        self.installed.iter().map(String::as_str).collect()
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(name)
    }

    pub fn bundle_path(&self, name: &str) -> Option<PathBuf> {
        self.installed.contains(name).then(|| self.models_dir.join(name))
    }

    /// Load and describe an installed bundle
    pub async fn info(&self, name: &str) -> Result<BundleInfo> {
        let path = self.bundle_path(name).ok_or_else(|| {
            ResumeInsightError::ArtifactsNotFound(format!(
                "Bundle '{}' is not installed in {}",
                name,
                self.models_dir.display()
            ))
        })?;

        let config_content = fs::read_to_string(path.join(CONFIG_FILE)).await?;
        let config: BundleConfig = serde_json::from_str(&config_content)?;

        let mut size_bytes = 0;
        for file in BUNDLE_FILES {
            size_bytes += fs::metadata(path.join(file)).await?.len();
        }

        let artifacts = ClassificationArtifacts::from_dir(&path)?;

        Ok(BundleInfo {
            name: name.to_string(),
            path,
            model_type: config.model_type,
            vocabulary_size: artifacts.vectorizer.vocabulary_size(),
            n_classes: artifacts.classifier.n_classes(),
            size_bytes,
        })
    }

    /// Fetch a bundle from a Hub model repository into `<models_dir>/<name>`
    pub async fn download(&mut self, repo_id: &str, name: &str, force: bool) -> Result<PathBuf> {
        if self.installed.contains(name) && !force {
            let bundle_dir = self.models_dir.join(name);
            info!("Bundle '{}' already installed at {}", name, bundle_dir.display());
            return Ok(bundle_dir);
        }

        let api = Api::new()
            .map_err(|e| ResumeInsightError::Network(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(hf_hub::Repo::model(repo_id.to_string()));

        info!("Downloading bundle '{}' from {}", name, repo_id);
        let mut sources = Vec::with_capacity(BUNDLE_FILES.len());
        for file in BUNDLE_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ResumeInsightError::Network(format!("Failed to download {} from {}: {}", file, repo_id, e))
            })?;
            info!("Downloaded {}", file);
            sources.push(cached);
        }

        self.install(name, &sources).await
    }

    /// Install bundle files (in `BUNDLE_FILES` order) as `<models_dir>/<name>`.
    ///
    /// The files are staged and validated next to the target first; an invalid
    /// bundle is discarded and any existing bundle of that name is kept.
    pub async fn install(&mut self, name: &str, sources: &[PathBuf]) -> Result<PathBuf> {
        if sources.len() != BUNDLE_FILES.len() {
            return Err(ResumeInsightError::InvalidInput(format!(
                "A bundle needs {} files, got {}",
                BUNDLE_FILES.len(),
                sources.len()
            )));
        }

        let bundle_dir = self.models_dir.join(name);
        let staging_dir = self.models_dir.join(format!(".{}.staging", name));
        if fs::metadata(&staging_dir).await.is_ok() {
            fs::remove_dir_all(&staging_dir).await?;
        }
        fs::create_dir_all(&staging_dir).await?;

        if let Err(e) = Self::stage(&staging_dir, sources).await {
            warn!("Bundle '{}' rejected: {}", name, e);
            fs::remove_dir_all(&staging_dir).await?;
            return Err(e);
        }

        if fs::metadata(&bundle_dir).await.is_ok() {
            fs::remove_dir_all(&bundle_dir).await?;
        }
        fs::rename(&staging_dir, &bundle_dir).await?;

        info!("Bundle '{}' installed at {}", name, bundle_dir.display());
        self.installed.insert(name.to_string());
        Ok(bundle_dir)
    }

    async fn stage(staging_dir: &Path, sources: &[PathBuf]) -> Result<()> {
        for (file, source) in BUNDLE_FILES.iter().zip(sources) {
            fs::copy(source, staging_dir.join(file)).await?;
        }

        // Refuse anything that would fail at start-up
        let artifacts = ClassificationArtifacts::from_dir(staging_dir)?;
        RoleClassifier::load(artifacts)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::classifier::artifacts::test_support::write_bundle;
    use crate::classifier::artifacts::LABELS_FILE;
    use super::*;
    use tempfile::TempDir;

    fn bundle_sources(dir: &Path) -> Vec<PathBuf> {
        BUNDLE_FILES.iter().map(|file| dir.join(file)).collect()
    }

    /// Valid bundle files for the java/spring/python vocabulary
    fn valid_sources(dir: &Path) -> Vec<PathBuf> {
        std::fs::create_dir_all(dir).unwrap();
        write_bundle(dir, &[2.0, 2.0, 0.0, 0.0, 0.0, 3.0], 2, 3, &[0.0, 0.0]);
        bundle_sources(dir)
    }

    async fn touch_bundle(dir: &Path, files: &[&str]) {
        fs::create_dir_all(dir).await.unwrap();
        for file in files {
            fs::write(dir.join(file), b"{}").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_store_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("nested").join("artifacts");

        let store = ArtifactStore::new(models_dir.clone()).await.unwrap();
        assert!(models_dir.is_dir());
        assert!(store.list_bundles().is_empty());
    }

    #[tokio::test]
    async fn test_scan_only_lists_complete_bundles() {
        let temp_dir = TempDir::new().unwrap();
        touch_bundle(&temp_dir.path().join("complete"), &BUNDLE_FILES).await;
        touch_bundle(&temp_dir.path().join("partial"), &[CONFIG_FILE]).await;
        fs::write(temp_dir.path().join("stray.txt"), b"x").await.unwrap();

        let store = ArtifactStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(store.list_bundles(), vec!["complete"]);
        assert!(store.bundle_path("complete").is_some());
        assert!(store.bundle_path("partial").is_none());
    }

    #[tokio::test]
    async fn test_info_for_missing_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        let err = store.info("nope").await.unwrap_err();
        assert!(matches!(err, ResumeInsightError::ArtifactsNotFound(_)));
    }

    #[tokio::test]
    async fn test_scan_skips_bundle_with_unreadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let broken = temp_dir.path().join("broken");
        fs::create_dir_all(&broken).await.unwrap();
        for file in BUNDLE_FILES {
            fs::write(broken.join(file), b"\x00garbage").await.unwrap();
        }

        let store = ArtifactStore::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(store.list_bundles().is_empty());
        assert!(store.info("broken").await.is_err());
    }

    #[tokio::test]
    async fn test_install_registers_valid_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");
        let sources = valid_sources(&temp_dir.path().join("download"));

        let mut store = ArtifactStore::new(models_dir.clone()).await.unwrap();
        let path = store.install("roles", &sources).await.unwrap();

        assert_eq!(path, models_dir.join("roles"));
        assert_eq!(store.list_bundles(), vec!["roles"]);
        assert_eq!(store.info("roles").await.unwrap().n_classes, 2);
        assert!(!models_dir.join(".roles.staging").exists());
    }

    #[tokio::test]
    async fn test_rejected_bundle_keeps_existing_install() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");
        let good = valid_sources(&temp_dir.path().join("good"));

        let mut store = ArtifactStore::new(models_dir.clone()).await.unwrap();
        store.install("roles", &good).await.unwrap();

        // three labels for a two-row classifier fails validation
        let bad_dir = temp_dir.path().join("bad");
        let bad = valid_sources(&bad_dir);
        std::fs::write(bad_dir.join(LABELS_FILE), r#"["A", "B", "C"]"#).unwrap();

        let err = store.install("roles", &bad).await.unwrap_err();
        assert!(matches!(err, ResumeInsightError::Configuration(_)));
        assert!(!models_dir.join(".roles.staging").exists());
        assert_eq!(store.info("roles").await.unwrap().n_classes, 2);

        // a rejected first install leaves nothing behind to be listed
        let err = store.install("fresh", &bad).await;
        assert!(err.is_err());
        let rescanned = ArtifactStore::new(models_dir.clone()).await.unwrap();
        assert_eq!(rescanned.list_bundles(), vec!["roles"]);
        assert!(!models_dir.join("fresh").exists());
    }

    #[tokio::test]
    async fn test_install_requires_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ArtifactStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        let result = store.install("partial", &[temp_dir.path().join("config.json")]).await;
        assert!(matches!(result, Err(ResumeInsightError::InvalidInput(_))));
    }
}
