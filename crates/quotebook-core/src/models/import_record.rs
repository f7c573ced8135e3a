//! Import record model

use serde::{Deserialize, Deserializer, Serialize};

/// One element of an import file.
///
/// Fields are lenient here; the store rejects records with empty
/// text or category for the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

impl ImportRecord {
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Ids written by hand are often bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(id) => id,
        RawId::Integer(id) => id.to_string(),
        RawId::Float(id) => id.to_string(),
    }))
}
