//! Identifier extraction from item fields.

use regex::Regex;
use std::sync::OnceLock;

use super::RetrievalError;
use crate::models::{Field, Identifier, Item};

static ARXIV_PATTERN: OnceLock<Regex> = OnceLock::new();

/// `arxiv.org/abs/<id>` or `arXiv:<id>`, where `<id>` is old-style
/// `<category>/<digits>` or new-style `<digits>.<digits>`
fn arxiv_pattern() -> &'static Regex {
    ARXIV_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:arxiv\.org/abs/|arxiv:)([a-z.-]+/\d+|\d+\.\d+)")
            .expect("arXiv pattern is valid")
    })
}

/// Read the item's DOI field.
pub fn extract_doi(item: &Item) -> Result<Identifier, RetrievalError> {
    item.field(Field::Doi)
        .map(Identifier::doi)
        .ok_or(RetrievalError::NoDoi)
}

/// Find an arXiv identifier in the item's URL field.
pub fn extract_arxiv(item: &Item) -> Result<Identifier, RetrievalError> {
    item.field(Field::Url)
        .and_then(|url| arxiv_pattern().captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| Identifier::arxiv(m.as_str()))
        .ok_or(RetrievalError::NoArxiv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> Item {
        Item::new("K", "T").with_url(url)
    }

    #[test]
    fn test_extract_doi() {
        let item = Item::new("K", "T").with_doi("10.1/xyz");
        assert_eq!(extract_doi(&item), Ok(Identifier::Doi("10.1%2Fxyz".into())));
    }

    #[test]
    fn test_extract_doi_missing() {
        assert_eq!(extract_doi(&Item::new("K", "T")), Err(RetrievalError::NoDoi));
        assert_eq!(
            extract_doi(&Item::new("K", "T").with_doi("")),
            Err(RetrievalError::NoDoi)
        );
    }

    #[test]
    fn test_blank_doi_is_absent_and_padding_is_trimmed() {
        let blank = Item::new("K", "T").with_doi("   ");
        assert_eq!(extract_doi(&blank), Err(RetrievalError::NoDoi));

        let padded = Item::new("K", "T").with_doi(" 10.1/xyz\n");
        assert_eq!(extract_doi(&padded), Ok(Identifier::Doi("10.1%2Fxyz".into())));
    }

    #[test]
    fn test_extract_arxiv_new_style() {
        let id = extract_arxiv(&with_url("https://arxiv.org/abs/1234.5678")).unwrap();
        assert_eq!(id, Identifier::Arxiv("1234.5678".into()));
    }

    #[test]
    fn test_extract_arxiv_old_style_is_encoded() {
        let id = extract_arxiv(&with_url("http://arxiv.org/abs/hep-th/9901001")).unwrap();
        assert_eq!(id.value(), "hep-th%2F9901001");
    }

    #[test]
    fn test_extract_arxiv_prefix_form_case_insensitive() {
        let id = extract_arxiv(&with_url("see ARXIV:2101.00001v2")).unwrap();
        assert_eq!(id.value(), "2101.00001");

        let id = extract_arxiv(&with_url("https://ArXiv.org/abs/math.GT/0309136")).unwrap();
        assert_eq!(id.value(), "math.GT%2F0309136");
    }

    #[test]
    fn test_extract_arxiv_missing() {
        assert_eq!(
            extract_arxiv(&with_url("https://doi.org/10.1/xyz")),
            Err(RetrievalError::NoArxiv)
        );
        assert_eq!(extract_arxiv(&Item::new("K", "T")), Err(RetrievalError::NoArxiv));
        assert_eq!(
            extract_arxiv(&with_url("https://arxiv.org/pdf/1234.5678")),
            Err(RetrievalError::NoArxiv)
        );
    }
}
