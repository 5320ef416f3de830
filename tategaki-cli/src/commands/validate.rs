//! Validate command implementation

use super::decode_file;
use anyhow::{bail, Result};
use std::path::Path;

/// Check a text for markup errors
pub fn validate(input: &str, strict: bool) -> Result<()> {
    let document = match decode_file(Path::new(input)) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Invalid text file: {:#}", e);
            bail!("Validation failed for {}", input);
        }
    };

    println!("Valid text file");
    if let Some(title) = &document.metadata.title {
        println!("  Title: {}", title);
    }
    println!("  Characters: {}", document.text_length());

    if document.has_diagnostics() {
        println!("  Markup warnings: {}", document.diagnostics.len());
        for diagnostic in &document.diagnostics {
            println!("    {}", diagnostic);
        }
        if strict {
            bail!(
                "Validation failed for {}: {} markup warnings",
                input,
                document.diagnostics.len()
            );
        }
    }

    Ok(())
}
