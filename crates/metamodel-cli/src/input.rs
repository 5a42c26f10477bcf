use anyhow::{Context, Result};
use metamodel::v1::Document;

/// Read and parse a document from a file path, or from stdin when `input`
/// is `-`.
pub fn read_document(input: &str) -> Result<Document> {
    let content = if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?
    };

    Document::from_json(&content).with_context(|| format!("Failed to parse {:?}", input))
}

/// Serialize any output value, honoring `--pretty`.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
