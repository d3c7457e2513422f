//! Item model representing a bibliographic record owned by the library.

use serde::{Deserialize, Serialize};

/// Fields of an item that citation retrieval reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Doi,
    Url,
    Extra,
}

impl Field {
    /// Returns the field name as the library stores it
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Doi => "DOI",
            Field::Url => "url",
            Field::Extra => "extra",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A bibliographic record
///
/// Only the fields relevant to citation retrieval are modelled. `extra` is a
/// free-text, newline-delimited annotation field where every line is an
/// independent note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique key of the item within its library
    pub key: String,

    /// Item title
    #[serde(default)]
    pub title: String,

    /// Digital Object Identifier
    #[serde(default, rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Item URL (may embed an arXiv identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-text annotations, one per line
    #[serde(default)]
    pub extra: String,

    /// Transient items coming from a feed rather than the library proper
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub feed: bool,
}

impl Item {
    /// Create a new item with the given key and title
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Read a field, treating empty values as absent
    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Title => Some(self.title.as_str()),
            Field::Doi => self.doi.as_deref(),
            Field::Url => self.url.as_deref(),
            Field::Extra => Some(self.extra.as_str()),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Overwrite a field
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Doi => self.doi = Some(value),
            Field::Url => self.url = Some(value),
            Field::Extra => self.extra = value,
        }
    }

    /// Whether this is a transient feed item
    pub fn is_feed_item(&self) -> bool {
        self.feed
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    pub fn feed_item(mut self) -> Self {
        self.feed = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_absent() {
        let item = Item::new("A1", "Title").with_doi("  ").with_url("");
        assert_eq!(item.field(Field::Doi), None);
        assert_eq!(item.field(Field::Url), None);
        assert_eq!(item.field(Field::Extra), None);
        assert_eq!(item.field(Field::Title), Some("Title"));
    }

    #[test]
    fn test_set_field() {
        let mut item = Item::new("A1", "Title");
        item.set_field(Field::Extra, "note");
        item.set_field(Field::Doi, "10.1/xyz");
        assert_eq!(item.extra, "note");
        assert_eq!(item.field(Field::Doi), Some("10.1/xyz"));
    }

    #[test]
    fn test_item_json_uses_library_field_names() {
        let item: Item = serde_json::from_str(
            r#"{"key": "K", "title": "T", "DOI": "10.1/a", "url": "https://arxiv.org/abs/1234.5678"}"#,
        )
        .unwrap();

        assert_eq!(item.doi.as_deref(), Some("10.1/a"));
        assert!(item.extra.is_empty());
        assert!(!item.is_feed_item());

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["DOI"], "10.1/a");
        assert!(json.get("feed").is_none());
    }
}
