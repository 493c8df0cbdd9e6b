//! Import and export command handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quotes_core::Store;

use crate::output::Output;

/// Export the collection to `quotes.json`
pub fn export(store: &Store, dir: Option<PathBuf>, output: &Output) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    let path = store.export_to(&dir)?;
    output.success(&format!(
        "Exported {} quote(s) to {}",
        store.len(),
        path.display()
    ));
    Ok(())
}

/// Import quotes from a JSON file
pub fn import(store: &mut Store, file: &Path, output: &Output) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    let count = store.import_all(&contents)?;
    output.success(&format!("Imported {} quote(s)", count));
    Ok(())
}
