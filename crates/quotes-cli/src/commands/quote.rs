//! Quote command handlers

use anyhow::Result;

use quotes_core::{CategoryFilter, Store};

use crate::output::Output;

/// Show a random quote
pub fn random(store: &mut Store, output: &Output) -> Result<()> {
    let view = store.show_random()?;
    output.print_view(&view)
}

/// Add a quote
pub fn add(store: &mut Store, text: &str, category: &str, output: &Output) -> Result<()> {
    let quote = store.add(text, category)?;

    if output.is_json() {
        output.print_quote(&quote)
    } else {
        output.success("Quote added successfully!");
        Ok(())
    }
}

/// List quotes in a category, or in the saved filter when none is given
pub fn list(store: &Store, category: Option<String>, output: &Output) -> Result<()> {
    let view = match category {
        Some(category) => store.render_filtered(&CategoryFilter::parse(&category)),
        None => store.render_selected(),
    };
    output.print_view(&view)
}
