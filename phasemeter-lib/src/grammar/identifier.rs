use crate::error::SchemaError;
use compact_str::CompactString;

/// Whether `token` is a bare identifier: a letter or underscore followed by
/// letters, digits, or underscores.
#[must_use]
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}

pub fn identifier(field: &'static str, token: &str) -> Result<CompactString, SchemaError> {
    if is_identifier(token) {
        Ok(token.into())
    } else {
        Err(SchemaError::MalformedIdentifier {
            field,
            token: token.into(),
        })
    }
}
