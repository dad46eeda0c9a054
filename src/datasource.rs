use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// A source of documents. Collecting copies or downloads them into the
/// data directory and returns the resulting paths.
#[async_trait]
pub trait DataSource {
    async fn collect(&self, data_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Text formats the pipeline consumes. PDF extraction happens upstream;
/// by the time a file lands here it is plain text.
pub fn is_supported_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref(),
        Some("txt" | "md" | "text")
    )
}

pub struct UrlSource {
    url: Url,
}

impl UrlSource {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
        })
    }
}

#[async_trait]
impl DataSource for UrlSource {
    async fn collect(&self, data_dir: &Path) -> Result<Vec<PathBuf>> {
        let client = Client::new();
        let response = client.get(self.url.as_str()).send().await?;
        let content = response.text().await?;

        let filename = self
            .url
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .unwrap_or("downloaded_content.txt");

        let output_path = data_dir.join(filename);
        std::fs::write(&output_path, content)?;

        Ok(vec![output_path])
    }
}

pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

#[async_trait]
impl DataSource for LocalSource {
    async fn collect(&self, data_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut collected = Vec::new();

        if self.path.is_file() {
            let filename = self
                .path
                .file_name()
                .ok_or_else(|| anyhow!("Invalid filename"))?;
            let dest_path = data_dir.join(filename);
            std::fs::copy(&self.path, &dest_path)?;
            collected.push(dest_path);
        } else if self.path.is_dir() {
            for entry in WalkDir::new(&self.path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && is_supported_file(entry.path()) {
                    let relative_path = entry.path().strip_prefix(&self.path)?;
                    let dest_path = data_dir.join(relative_path);
                    if let Some(parent) = dest_path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::copy(entry.path(), &dest_path)?;
                    collected.push(dest_path);
                }
            }
        } else {
            return Err(anyhow!("Path does not exist: {}", self.path.display()));
        }

        Ok(collected)
    }
}
