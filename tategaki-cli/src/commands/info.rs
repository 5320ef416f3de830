//! Info command implementation

use super::decode_file;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Text info output
#[derive(Serialize)]
struct TextInfo {
    title: Option<String>,
    author: Option<String>,
    encoding: Option<String>,
    length: usize,
    nodes: usize,
    diagnostics: usize,
    preview: String,
}

/// Display information about a text
pub fn info(input: &str, json: bool) -> Result<()> {
    let document = decode_file(Path::new(input))?;
    let summary = document.summary();

    let info = TextInfo {
        title: summary.title,
        author: summary.author,
        encoding: document.metadata.encoding.clone(),
        length: summary.length,
        nodes: document.nodes.len(),
        diagnostics: document.diagnostics.len(),
        preview: summary.preview,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title.as_deref().unwrap_or("(untitled)"));
        if let Some(author) = &info.author {
            println!("Author:      {}", author);
        }
        if let Some(encoding) = &info.encoding {
            println!("Encoding:    {}", encoding);
        }
        println!("Length:      {}", info.length);
        println!("Nodes:       {}", info.nodes);
        println!("Diagnostics: {}", info.diagnostics);
        println!("Preview:     {}", info.preview);
    }

    Ok(())
}
