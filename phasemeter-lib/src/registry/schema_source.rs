use crate::error::SchemaError;
use camino::Utf8PathBuf;
use core::fmt;
use std::fs;

/// Where the text of a schema comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Text(String),
    File(Utf8PathBuf),
}

impl SchemaSource {
    /// Read the schema text.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read.
    pub fn load(&self) -> Result<String, SchemaError> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::File(path) => fs::read_to_string(path).map_err(|source| SchemaError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("<inline>"),
            Self::File(path) => write!(f, "{path}"),
        }
    }
}

impl From<&str> for SchemaSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Utf8PathBuf> for SchemaSource {
    fn from(path: Utf8PathBuf) -> Self {
        Self::File(path)
    }
}
