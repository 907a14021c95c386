//! Catalog loading errors.

use thiserror::Error;

/// A type string that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("unexpected end of type `{text}`")]
    UnexpectedEnd { text: String },
    #[error("unexpected `{found}` at offset {offset} in type `{text}`")]
    UnexpectedChar {
        text: String,
        offset: usize,
        found: char,
    },
    #[error("unknown type `{name}` in `{text}`")]
    UnknownType { text: String, name: String },
    #[error("unknown ability `{ability}`")]
    UnknownAbility { ability: String },
}

/// A catalog that could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("in `{item}`: {source}")]
    Signature {
        item: String,
        #[source]
        source: SignatureError,
    },
    #[error("unknown primitive alias `{alias}` on `{item}`")]
    UnknownPrimitive { item: String, alias: String },
    #[error("module `{module}` is declared twice")]
    DuplicateModule { module: String },
}
