//! Line reader for `key=value` schema sources.
//!
//! Blank lines and lines starting with `#` or `!` are skipped. A line ending
//! in an odd number of backslashes continues on the next line, whose leading
//! whitespace is dropped. A doubled backslash stands for one literal
//! backslash. Keys and values are trimmed.

use crate::error::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// One-based number of the line the entry starts on.
    pub line: usize,
    pub key: String,
    pub value: String,
}

pub fn read(text: &str) -> Result<Vec<Property>, SchemaError> {
    let mut properties = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = String::from(trimmed);
        while continues(&logical) {
            let _ = logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let line = index + 1;
        let Some((key, value)) = logical.split_once('=') else {
            return Err(SchemaError::MalformedLine { line, text: logical });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(SchemaError::MalformedLine { line, text: logical });
        }

        properties.push(Property {
            line,
            key: unescape(key),
            value: unescape(value.trim()),
        });
    }

    Ok(properties)
}

fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn unescape(text: &str) -> String {
    text.replace("\\\\", "\\")
}
