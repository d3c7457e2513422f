//! User-facing message catalogue.
//!
//! Messages are looked up by id and may reference the backend display name as
//! `{ $api }`. Unknown ids format to the id itself so a missing translation is
//! visible instead of silently empty.

use std::collections::HashMap;

const ENGLISH: &[(&str, &str)] = &[
    (
        "citationcounts-progresswindow-headline",
        "Getting citation counts from { $api }.",
    ),
    (
        "citationcounts-progresswindow-finished-headline",
        "Finished getting citation counts from { $api }.",
    ),
    (
        "citationcounts-progresswindow-error-no-doi",
        "No DOI field exists on the item.",
    ),
    (
        "citationcounts-progresswindow-error-no-arxiv",
        "No arXiv id found on the item.",
    ),
    (
        "citationcounts-progresswindow-error-no-doi-or-arxiv",
        "No DOI / arXiv id found on the item.",
    ),
    (
        "citationcounts-progresswindow-error-bad-api-response",
        "Problem accessing the { $api } API.",
    ),
    (
        "citationcounts-progresswindow-error-no-citation-count",
        "{ $api } does not have a citation count for the item.",
    ),
    (
        "citationcounts-progresswindow-error-save",
        "Could not save the citation count.",
    ),
    ("citationcounts-internal-error", "Internal error"),
    ("citationcounts-error-unknown-api", "Unknown citation API."),
    ("citationcounts-column-title", "Citations"),
    (
        "citationcounts-menutools-autoretrieve-title",
        "Get citation counts for new items?",
    ),
    (
        "citationcounts-menutools-autoretrieve-api",
        "Get citation counts for new items from { $api }",
    ),
    (
        "citationcounts-menutools-autoretrieve-api-none",
        "No automatic retrieval",
    ),
    (
        "citationcounts-itemmenu-retrieve-api",
        "Get { $api } citation counts",
    ),
];

/// Message catalogue with optional overrides
#[derive(Debug, Clone, Default)]
pub struct Localization {
    overrides: HashMap<String, String>,
}

impl Localization {
    /// The built-in English catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the template for a message id
    pub fn with_message(mut self, id: &str, template: &str) -> Self {
        self.overrides.insert(id.to_string(), template.to_string());
        self
    }

    fn template<'a>(&'a self, id: &'a str) -> &'a str {
        self.overrides
            .get(id)
            .map(String::as_str)
            .or_else(|| {
                ENGLISH
                    .iter()
                    .find(|(key, _)| *key == id)
                    .map(|(_, template)| *template)
            })
            .unwrap_or(id)
    }

    /// Format a message, substituting the backend name for `{ $api }`
    pub fn format_value(&self, id: &str, api: Option<&str>) -> String {
        let template = self.template(id);
        match api {
            Some(api) => template.replace("{ $api }", api),
            None => template.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_api_name() {
        let l10n = Localization::new();
        assert_eq!(
            l10n.format_value("citationcounts-progresswindow-error-bad-api-response", Some("Crossref")),
            "Problem accessing the Crossref API."
        );
    }

    #[test]
    fn test_unparameterized_message() {
        let l10n = Localization::new();
        assert_eq!(
            l10n.format_value("citationcounts-progresswindow-error-no-doi", Some("Crossref")),
            "No DOI field exists on the item."
        );
    }

    #[test]
    fn test_unknown_id_formats_to_itself() {
        assert_eq!(Localization::new().format_value("nope", None), "nope");
    }

    #[test]
    fn test_override() {
        let l10n = Localization::new()
            .with_message("citationcounts-progresswindow-headline", "Zitationen von { $api }");
        assert_eq!(
            l10n.format_value("citationcounts-progresswindow-headline", Some("INSPIRE-HEP")),
            "Zitationen von INSPIRE-HEP"
        );
    }
}
