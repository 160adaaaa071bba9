use std::fs;
use std::path::{Path, PathBuf};

use site_index::{GenerateRequest, SiteConfig};
use tempfile::TempDir;

/// A throwaway Hugo site on disk.
///
/// The directory is removed when this struct is dropped.
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    /// Create an empty site with a `config.toml` and a `content/` directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("content")).expect("Failed to create content dir");
        fs::write(
            dir.path().join("config.toml"),
            "baseURL = \"https://vector.dev/\"\ntitle = \"Vector\"\n",
        )
        .expect("Failed to write config.toml");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a content file at `path`, relative to `content/`.
    pub fn page(&self, path: &str, source: &str) -> &Self {
        let full = self.root().join("content").join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create page dir");
        }
        fs::write(full, source).expect("Failed to write page");
        self
    }

    pub fn config(&self) -> SiteConfig {
        SiteConfig::load(&self.root().join("config.toml"), true).expect("Failed to load config")
    }

    pub fn request(&self) -> GenerateRequest {
        GenerateRequest {
            site_root: self.root().to_path_buf(),
            output: None,
            dry_run: false,
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.root().join("public/search.json")
    }

    /// Parse the generated index document.
    pub fn read_index(&self) -> Vec<serde_json::Value> {
        let raw = fs::read_to_string(self.index_path()).expect("Failed to read index");
        serde_json::from_str(&raw).expect("Index is not a JSON array")
    }
}
