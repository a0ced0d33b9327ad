use gist_common::{ArticleResult, ArticleStore, StoreError};
use std::fs;
use std::path::PathBuf;

/// History kept as one pretty-printed JSON array, newest first.
pub struct JsonFileStore {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<ArticleResult>,
}

impl JsonFileStore {
    /// Open `path`; a missing file is an empty history.
    pub fn open(path: impl Into<PathBuf>, max_entries: usize) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "history.opened");
        Ok(Self {
            path,
            max_entries: max_entries.max(1),
            entries,
        })
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gist")
            .join("history.json")
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ArticleStore for JsonFileStore {
    fn add(&mut self, article: ArticleResult) -> Result<(), StoreError> {
        self.entries.retain(|a| a.url != article.url);
        self.entries.insert(0, article);
        self.entries.truncate(self.max_entries);
        self.persist()
    }

    fn update(&mut self, article: ArticleResult) -> Result<bool, StoreError> {
        let Some(slot) = self.entries.iter_mut().find(|a| a.url == article.url) else {
            return Ok(false);
        };
        *slot = article;
        self.persist()?;
        Ok(true)
    }

    fn remove(&mut self, url: &str) -> Result<bool, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|a| a.url != url);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn list(&self) -> Vec<ArticleResult> {
        self.entries.clone()
    }
}
