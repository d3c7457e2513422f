//! Identifiers used to look up citation counts.

/// Kind of identifier a backend can be queried with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdType {
    Doi,
    Arxiv,
}

impl IdType {
    /// Lowercase path segment form ("doi" / "arxiv")
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Doi => "doi",
            IdType::Arxiv => "arxiv",
        }
    }

    /// Suffix used in source labels, e.g. `Crossref/DOI`
    pub fn label(&self) -> &'static str {
        match self {
            IdType::Doi => "DOI",
            IdType::Arxiv => "arXiv",
        }
    }
}

impl std::fmt::Display for IdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A percent-encoded identifier ready to be placed in a request URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Doi(String),
    Arxiv(String),
}

impl Identifier {
    /// Build a DOI identifier, percent-encoding the raw value
    pub fn doi(raw: &str) -> Self {
        Identifier::Doi(urlencoding::encode(raw.trim()).into_owned())
    }

    /// Build an arXiv identifier, percent-encoding the raw value
    pub fn arxiv(raw: &str) -> Self {
        Identifier::Arxiv(urlencoding::encode(raw.trim()).into_owned())
    }

    pub fn id_type(&self) -> IdType {
        match self {
            Identifier::Doi(_) => IdType::Doi,
            Identifier::Arxiv(_) => IdType::Arxiv,
        }
    }

    /// The encoded value
    pub fn value(&self) -> &str {
        match self {
            Identifier::Doi(v) | Identifier::Arxiv(v) => v,
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id_type(), self.value())
    }
}
