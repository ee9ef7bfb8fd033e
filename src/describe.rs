//! Description resolution: composes the codec's structural parse with the
//! taxonomy configuration's label lookup.
//!
//! The store is consulted on every call, so configuration changes show up
//! immediately. Codes with no entry in the current configuration are
//! silently omitted, which keeps partially-populated taxonomies usable
//! during onboarding.

use serde::Serialize;

use crate::codec::{self, CodecError};
use crate::config::{ConfigError, ConfigStore, TaxonomyConfig};
use crate::domain::{Dimension, Identifier};

/// Separator between description entries in the joined text.
const ENTRY_SEPARATOR: &str = " | ";

#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
  #[error(transparent)]
  Codec(#[from] CodecError),
  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// One resolved `(dimension, code, label)` tuple.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DescriptionEntry {
  pub dimension: Dimension,
  pub code: String,
  pub label: String,
}

/// Derived, never-persisted view of an identifier under the current
/// taxonomy. Recomputed on demand.
#[derive(Clone, Debug, Serialize)]
pub struct Description {
  pub identifier: Identifier,
  pub entries: Vec<DescriptionEntry>,
  pub text: String,
}

/// Resolve a raw identifier into labeled entries and a joined display line.
///
/// Parse failures propagate as-is: describe is defined on any structurally
/// decomposable string, valid alphabet or not.
pub async fn describe(store: &ConfigStore, raw: &str) -> Result<Description, DescribeError> {
  let identifier = codec::parse(raw)?;
  let cfg = store.load().await?;

  let mut entries = Vec::new();
  for dim in Dimension::ALL {
    let Some(c) = identifier.field(dim) else { continue };
    let code = c.to_string();
    if let Some(label) = cfg.dimension(dim).get(&code) {
      entries.push(DescriptionEntry { dimension: dim, code, label: label.clone() });
    }
  }

  let text = entries
    .iter()
    .map(|e| format!("{}: {}", e.dimension.display(), e.label))
    .collect::<Vec<_>>()
    .join(ENTRY_SEPARATOR);

  Ok(Description { identifier, entries, text })
}

/// Read-only passthrough to the full taxonomy, for clients that need the
/// whole structure at once (e.g. to populate a picker UI).
pub async fn structure(store: &ConfigStore) -> Result<TaxonomyConfig, ConfigError> {
  store.load().await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{MemoryResource, PartialTaxonomyConfig};

  fn store() -> ConfigStore {
    ConfigStore::new(Box::new(MemoryResource::default()))
  }

  #[tokio::test]
  async fn describes_default_id6_end_to_end() {
    let store = store();
    let d = describe(&store, "0P1N1-1").await.unwrap();
    assert_eq!(d.entries.len(), 6);
    assert_eq!(
      d.text,
      "Lớp: Lớp 10 | Môn: 10-NGÂN HÀNG CHÍNH | Chương: Mệnh đề và tập hợp | \
       Mức độ: Nhận biết | Bài: Mệnh đề | Dạng: Xác định mệnh đề, mệnh đề chứa biến"
    );
  }

  #[tokio::test]
  async fn brackets_and_percent_do_not_change_the_description() {
    let store = store();
    let plain = describe(&store, "0P1N1-1").await.unwrap();
    let wrapped = describe(&store, "[0P1N1-1]%").await.unwrap();
    assert_eq!(plain.text, wrapped.text);
  }

  #[tokio::test]
  async fn unknown_codes_are_silently_omitted() {
    let store = store();
    // Grade '5' and lesson '7' are not in the default taxonomy.
    let d = describe(&store, "5P1N7").await.unwrap();
    assert!(d.entries.iter().all(|e| e.dimension != Dimension::Grade));
    assert!(d.entries.iter().all(|e| e.dimension != Dimension::Lesson));
    assert_eq!(d.entries.len(), 3);
  }

  #[tokio::test]
  async fn parse_errors_propagate() {
    let store = store();
    match describe(&store, "0P1").await {
      Err(DescribeError::Codec(CodecError::MalformedLength { actual: 3, .. })) => {}
      other => panic!("expected MalformedLength, got {:?}", other.map(|d| d.text)),
    }
  }

  #[tokio::test]
  async fn rejects_identifier_with_two_separators() {
    let store = store();
    match describe(&store, "0P1N1--").await {
      Err(DescribeError::Codec(CodecError::MalformedLength { segment, .. })) => {
        assert_eq!(segment, "ID6 separator");
      }
      other => panic!("expected MalformedLength, got {:?}", other.map(|d| d.text)),
    }
  }

  #[tokio::test]
  async fn structure_returns_the_full_current_taxonomy() {
    let store = store();
    let cfg = structure(&store).await.unwrap();
    assert_eq!(cfg, TaxonomyConfig::built_in_default());
  }

  #[tokio::test]
  async fn configuration_changes_take_effect_immediately() {
    let store = store();
    let before = describe(&store, "0P1N1").await.unwrap();
    assert!(before.text.starts_with("Lớp: Lớp 10"));

    let partial = PartialTaxonomyConfig {
      grade: Some([("0".to_string(), "Khối 10".to_string())].into_iter().collect()),
      ..Default::default()
    };
    store.update(partial).await.unwrap();

    let after = describe(&store, "0P1N1").await.unwrap();
    assert!(after.text.starts_with("Lớp: Khối 10"));
  }
}
