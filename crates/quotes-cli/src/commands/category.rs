//! Category command handlers

use anyhow::Result;

use quotes_core::Store;

use crate::output::Output;

/// List category filter options
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let options = store.category_index().options();
    output.print_categories(&options, store.selected_category())
}
