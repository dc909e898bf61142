//! Input manager for reading resumes from disk

use crate::error::{Result, ResumeInsightError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Reads resumes from disk, keeping extracted text per path for the manager's lifetime
pub struct InputManager {
    cache: HashMap<String, String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if let Some(cached_text) = self.cache.get(&path_str) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(ResumeInsightError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeInsightError::UnsupportedFormat(format!("{} has no extension", path.display()))
            })?;

        let file_type = FileType::from_extension(extension);
        if !file_type.is_supported() {
            return Err(ResumeInsightError::UnsupportedFormat(extension.to_string()));
        }

        info!("Extracting {} text from: {}", file_type, path.display());
        let bytes = fs::read(path).await?;
        let text = text_extractor::extract(&bytes, extension)?;

        self.cache.insert(path_str, text.clone());

        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
