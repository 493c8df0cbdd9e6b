//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde::Serialize;

use quotes_core::{CategoryFilter, Quote, QuoteView};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single quote
    pub fn print_quote(&self, quote: &Quote) -> Result<()> {
        match self.format {
            OutputFormat::Human => println!("{}", quote),
            OutputFormat::Json => print_json(quote)?,
            OutputFormat::Quiet => println!("{}", quote.text),
        }
        Ok(())
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[Quote]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for quote in quotes {
                    println!("{}", list_line(quote));
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => print_json(&quotes)?,
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.text);
                }
            }
        }
        Ok(())
    }

    /// Print whatever a render produced
    pub fn print_view(&self, view: &QuoteView) -> Result<()> {
        match view {
            QuoteView::Empty(msg) => {
                match self.format {
                    OutputFormat::Human => println!("{}", msg),
                    OutputFormat::Json => {
                        println!("{}", serde_json::json!({"message": msg, "quotes": []}));
                    }
                    OutputFormat::Quiet => {}
                }
                Ok(())
            }
            QuoteView::Single(quote) => self.print_quote(quote),
            QuoteView::List(quotes) => self.print_quotes(quotes),
        }
    }

    /// Print category filter options, marking the selected one
    pub fn print_categories(
        &self,
        options: &[CategoryFilter],
        selected: &CategoryFilter,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for option in options {
                    let marker = if option == selected { "*" } else { " " };
                    println!("{} {}", marker, option);
                }
                println!("\n{} categories", options.len().saturating_sub(1));
            }
            OutputFormat::Json => {
                let categories: Vec<&str> = options.iter().map(|o| o.as_str()).collect();
                print_json(&serde_json::json!({
                    "categories": categories,
                    "selected": selected.as_str()
                }))?;
            }
            OutputFormat::Quiet => {
                for option in options {
                    println!("{}", option);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One list entry: long text is shortened, the category always shows
fn list_line(quote: &Quote) -> String {
    format!("{} - ({})", truncate(&quote.text, 120), quote.category)
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
