//! Taxonomy configuration: the six code→label maps behind MapID, their
//! built-in defaults, and the store that persists them as one JSON document.
//!
//! The store performs no I/O at construction. The owning process calls
//! `load()` at startup; the first load seeds the built-in default when the
//! resource holds nothing yet. Every read-modify-write (`update`, `import`,
//! `reset`, first-use seeding) runs under the store's write lock so two
//! writers can never interleave partial writes. Single-process only; two
//! server instances sharing one file are not coordinated.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::domain::{Dimension, Level};

type DimensionMap = BTreeMap<String, String>;

/// The full taxonomy: one code→label map per dimension. All six keys are
/// always present after any successful load, import, or reset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
  pub grade: DimensionMap,
  pub subject: DimensionMap,
  pub chapter: DimensionMap,
  pub level: DimensionMap,
  pub lesson: DimensionMap,
  pub form: DimensionMap,
}

/// Administrative update payload. A dimension that is present replaces that
/// dimension's whole map; an absent dimension is left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PartialTaxonomyConfig {
  #[serde(default)] pub grade: Option<DimensionMap>,
  #[serde(default)] pub subject: Option<DimensionMap>,
  #[serde(default)] pub chapter: Option<DimensionMap>,
  #[serde(default)] pub level: Option<DimensionMap>,
  #[serde(default)] pub lesson: Option<DimensionMap>,
  #[serde(default)] pub form: Option<DimensionMap>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// Payload (or persisted document) is not a JSON object of the expected shape.
  #[error("invalid taxonomy document: {0}")]
  InvalidFormat(String),
  /// Payload parsed but top-level dimensions are missing.
  #[error("taxonomy document is missing dimensions: {}", .missing.join(", "))]
  Validation { missing: Vec<String> },
  /// The underlying resource read/write failed. Never retried here.
  #[error("taxonomy persistence failed: {source}")]
  Persistence {
    #[from]
    source: io::Error,
  },
}

impl TaxonomyConfig {
  fn dimension_mut(&mut self, dim: Dimension) -> &mut DimensionMap {
    match dim {
      Dimension::Grade => &mut self.grade,
      Dimension::Subject => &mut self.subject,
      Dimension::Chapter => &mut self.chapter,
      Dimension::Level => &mut self.level,
      Dimension::Lesson => &mut self.lesson,
      Dimension::Form => &mut self.form,
    }
  }

  pub fn dimension(&self, dim: Dimension) -> &DimensionMap {
    match dim {
      Dimension::Grade => &self.grade,
      Dimension::Subject => &self.subject,
      Dimension::Chapter => &self.chapter,
      Dimension::Level => &self.level,
      Dimension::Lesson => &self.lesson,
      Dimension::Form => &self.form,
    }
  }

  /// Built-in default taxonomy: grade-10 mathematics seed content, with
  /// labels for every canonical difficulty level.
  pub fn built_in_default() -> Self {
    fn map(pairs: &[(&str, &str)]) -> DimensionMap {
      pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    let level = Level::ALL
      .iter()
      .map(|l| {
        let label = match l {
          Level::N => "Nhận biết",
          Level::H => "Thông Hiểu",
          Level::V => "VD",
          Level::C => "VD Cao",
          Level::T => "VIP",
          Level::M => "Note",
        };
        (l.code().to_string(), label.to_string())
      })
      .collect();

    TaxonomyConfig {
      grade: map(&[
        ("0", "Lớp 10"),
        ("1", "Lớp 11"),
        ("2", "Lớp 12"),
        ("6", "Lớp 6"),
        ("7", "Lớp 7"),
        ("8", "Lớp 8"),
        ("9", "Lớp 9"),
      ]),
      subject: map(&[
        ("P", "10-NGÂN HÀNG CHÍNH"),
        ("D", "Đại số"),
        ("H", "Hình học"),
        ("G", "Giải tích"),
      ]),
      chapter: map(&[
        ("1", "Mệnh đề và tập hợp"),
        ("2", "Bất phương trình và hệ bất phương trình bậc nhất hai ẩn"),
        ("3", "Hàm số bậc hai và đồ thị"),
      ]),
      level,
      lesson: map(&[
        ("1", "Mệnh đề"),
        ("2", "Tập hợp và các phép toán trên tập hợp"),
      ]),
      form: map(&[
        ("1", "Xác định mệnh đề, mệnh đề chứa biến"),
        ("2", "Mệnh đề kéo theo, mệnh đề đảo"),
      ]),
    }
  }
}

/// Parse and structurally validate a taxonomy document: must be a JSON
/// object carrying all six dimension keys (maps may be empty).
pub fn parse_config_document(text: &str) -> Result<TaxonomyConfig, ConfigError> {
  let value: serde_json::Value =
    serde_json::from_str(text).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
  let object = value
    .as_object()
    .ok_or_else(|| ConfigError::InvalidFormat("top level is not an object".into()))?;

  let missing: Vec<String> = Dimension::ALL
    .iter()
    .filter(|dim| !object.contains_key(dim.key()))
    .map(|dim| dim.key().to_string())
    .collect();
  if !missing.is_empty() {
    return Err(ConfigError::Validation { missing });
  }

  serde_json::from_value(value).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
}

/// Durable key/value-style resource behind the store. Kept as a trait so
/// tests inject an in-memory resource instead of touching disk.
pub trait ConfigResource: Send + Sync {
  /// Returns None when no document has ever been written.
  fn read(&self) -> io::Result<Option<Vec<u8>>>;
  fn write(&self, bytes: &[u8]) -> io::Result<()>;
}

/// File-backed resource at MAPID_CONFIG_PATH. The parent directory is
/// created on first write.
pub struct FileResource {
  path: PathBuf,
}

impl FileResource {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  /// Resolve the path from MAPID_CONFIG_PATH or fall back to ./data/taxonomy.json.
  pub fn from_env() -> Self {
    let path = std::env::var("MAPID_CONFIG_PATH")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from("./data/taxonomy.json"));
    info!(target: "taxonomy", path = %path.display(), "Taxonomy resource location");
    Self::new(path)
  }
}

impl ConfigResource for FileResource {
  fn read(&self) -> io::Result<Option<Vec<u8>>> {
    match std::fs::read(&self.path) {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn write(&self, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&self.path, bytes)
  }
}

/// In-memory resource for tests. Cloning shares the underlying cell, so two
/// stores can observe each other's writes.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryResource {
  cell: std::sync::Arc<std::sync::Mutex<Option<Vec<u8>>>>,
}

#[cfg(test)]
impl ConfigResource for MemoryResource {
  fn read(&self) -> io::Result<Option<Vec<u8>>> {
    Ok(self.cell.lock().unwrap().clone())
  }

  fn write(&self, bytes: &[u8]) -> io::Result<()> {
    *self.cell.lock().unwrap() = Some(bytes.to_vec());
    Ok(())
  }
}

/// The taxonomy configuration store: current config in memory behind a
/// RwLock, every write persisted through the injected resource.
pub struct ConfigStore {
  resource: Box<dyn ConfigResource>,
  current: RwLock<Option<TaxonomyConfig>>,
}

impl ConfigStore {
  /// No I/O happens here; the first `load()` does the seeding.
  pub fn new(resource: Box<dyn ConfigResource>) -> Self {
    Self { resource, current: RwLock::new(None) }
  }

  /// Current configuration. On first use with an empty resource, persists
  /// and returns the built-in default.
  #[instrument(level = "debug", skip(self))]
  pub async fn load(&self) -> Result<TaxonomyConfig, ConfigError> {
    if let Some(cfg) = self.current.read().await.as_ref() {
      return Ok(cfg.clone());
    }
    let mut guard = self.current.write().await;
    self.fill_from_resource(&mut guard)
  }

  /// Replace the whole map of each dimension present in `partial`; absent
  /// dimensions are untouched. Persists and returns the result.
  #[instrument(level = "info", skip(self, partial))]
  pub async fn update(&self, partial: PartialTaxonomyConfig) -> Result<TaxonomyConfig, ConfigError> {
    let mut guard = self.current.write().await;
    let mut cfg = self.fill_from_resource(&mut guard)?;

    let replacements = [
      (Dimension::Grade, partial.grade),
      (Dimension::Subject, partial.subject),
      (Dimension::Chapter, partial.chapter),
      (Dimension::Level, partial.level),
      (Dimension::Lesson, partial.lesson),
      (Dimension::Form, partial.form),
    ];
    for (dim, replacement) in replacements {
      if let Some(map) = replacement {
        info!(target: "taxonomy", dimension = dim.key(), entries = map.len(), "Dimension map replaced");
        *cfg.dimension_mut(dim) = map;
      }
    }

    self.persist(&cfg)?;
    *guard = Some(cfg.clone());
    Ok(cfg)
  }

  /// Full replacement from a serialized document. The document must be a
  /// JSON object carrying all six dimensions.
  #[instrument(level = "info", skip(self, text), fields(text_len = text.len()))]
  pub async fn import_from_text(&self, text: &str) -> Result<TaxonomyConfig, ConfigError> {
    let cfg = parse_config_document(text)?;
    let mut guard = self.current.write().await;
    self.persist(&cfg)?;
    *guard = Some(cfg.clone());
    info!(target: "taxonomy", "Taxonomy configuration imported");
    Ok(cfg)
  }

  /// Pretty-printed document of the current configuration. Feeding the
  /// output back into `import_from_text` reproduces an equal configuration.
  #[instrument(level = "debug", skip(self))]
  pub async fn export_to_text(&self) -> Result<String, ConfigError> {
    let cfg = self.load().await?;
    serde_json::to_string_pretty(&cfg).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
  }

  /// Discard any customization: persist and return the built-in default.
  #[instrument(level = "info", skip(self))]
  pub async fn reset(&self) -> Result<TaxonomyConfig, ConfigError> {
    let mut guard = self.current.write().await;
    let cfg = TaxonomyConfig::built_in_default();
    self.persist(&cfg)?;
    *guard = Some(cfg.clone());
    info!(target: "taxonomy", "Taxonomy configuration reset to built-in default");
    Ok(cfg)
  }

  /// Shared slow path, caller holds the write lock. Reads the resource, or
  /// seeds the default when the resource holds nothing yet.
  fn fill_from_resource(
    &self,
    guard: &mut Option<TaxonomyConfig>,
  ) -> Result<TaxonomyConfig, ConfigError> {
    if let Some(cfg) = guard.as_ref() {
      return Ok(cfg.clone());
    }
    let cfg = match self.resource.read()? {
      Some(bytes) => {
        let text = String::from_utf8(bytes)
          .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        parse_config_document(&text)?
      }
      None => {
        let default = TaxonomyConfig::built_in_default();
        self.persist(&default)?;
        info!(target: "taxonomy", "No persisted taxonomy found; seeded built-in default");
        default
      }
    };
    *guard = Some(cfg.clone());
    Ok(cfg)
  }

  fn persist(&self, cfg: &TaxonomyConfig) -> Result<(), ConfigError> {
    let text =
      serde_json::to_string_pretty(cfg).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
    self.resource.write(text.as_bytes())?;
    Ok(())
  }
}
