//! Application state and logic

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use quotes_core::storage::recovery_hint;
use quotes_core::sync::{SyncEvent, SyncPhase};
use quotes_core::{CategoryFilter, QuoteView, Store};

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Add-quote form is open
    AddQuote,
    /// Typing the path of a file to import
    ImportPath,
}

/// Which field of the add form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Category,
}

/// The two-field add-quote form
#[derive(Debug, Clone)]
pub struct AddForm {
    pub text: String,
    pub category: String,
    pub focus: FormField,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: String::new(),
            focus: FormField::Text,
        }
    }
}

impl AddForm {
    /// The field currently being typed into
    pub fn active(&self) -> &str {
        match self.focus {
            FormField::Text => &self.text,
            FormField::Category => &self.category,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Text => &mut self.text,
            FormField::Category => &mut self.category,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Text => FormField::Category,
            FormField::Category => FormField::Text,
        };
    }
}

/// What the main display is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// One random quote
    Random,
    /// The quotes of the selected category
    Filtered,
}

/// Sync status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncIndicator {
    /// Last cycle succeeded
    Synced,
    /// Cycle in progress, or waiting for the first one
    Syncing,
    /// Sync not enabled
    Disabled,
    /// Last cycle failed
    Error,
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Add-quote form contents
    pub form: AddForm,
    /// Import path being typed
    pub path_input: String,
    /// What the quote display shows
    pub view: QuoteView,
    /// Whether the display is a random pick or a filtered list
    pub view_kind: ViewKind,
    /// Category filter options, "all" first
    pub categories: Vec<CategoryFilter>,
    /// Selected category filter
    pub selected: CategoryFilter,
    /// Number of quotes in the collection
    pub quote_count: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Blocking error shown in a modal until a key is pressed
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Sync status indicator
    pub sync_status: SyncIndicator,
    /// When remote quotes last replaced the collection
    pub last_synced: Option<DateTime<Local>>,
}

impl App {
    /// Create the app and show an initial random quote
    pub fn new(store: &mut Store) -> Result<Self> {
        let view = store.show_random()?;

        Ok(Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            form: AddForm::default(),
            path_input: String::new(),
            view,
            view_kind: ViewKind::Random,
            categories: store.category_index().options(),
            selected: store.selected_category().clone(),
            quote_count: store.len(),
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
            sync_status: if store.config().sync_enabled {
                SyncIndicator::Syncing
            } else {
                SyncIndicator::Disabled
            },
            last_synced: None,
        })
    }

    /// Pull categories and counts from the store after a mutation
    ///
    /// A filtered view is re-rendered; a random pick stays as it is.
    pub fn refresh(&mut self, store: &Store) {
        self.categories = store.category_index().options();
        self.selected = store.selected_category().clone();
        self.quote_count = store.len();
        if self.view_kind == ViewKind::Filtered {
            self.view = store.render_selected();
        }
    }

    // ==================== Status ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Show a blocking error
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Show a failed action as a blocking error, with a fix when one is known
    pub fn report_error(&mut self, err: &anyhow::Error) {
        let message = match recovery_hint(err) {
            Some(hint) => format!("{:#}\n\n{}", err, hint),
            None => format!("{:#}", err),
        };
        self.set_error(message);
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Quotes ====================

    /// Replace the display with a new random quote
    pub fn show_random(&mut self, store: &mut Store) -> Result<()> {
        self.view = store.show_random()?;
        self.view_kind = ViewKind::Random;
        Ok(())
    }

    /// Select the next category option (wrapping) and show its quotes
    pub fn next_category(&mut self, store: &mut Store) -> Result<()> {
        self.step_category(store, 1)
    }

    /// Select the previous category option (wrapping) and show its quotes
    pub fn prev_category(&mut self, store: &mut Store) -> Result<()> {
        self.step_category(store, self.categories.len().saturating_sub(1))
    }

    fn step_category(&mut self, store: &mut Store, step: usize) -> Result<()> {
        if self.categories.is_empty() {
            return Ok(());
        }
        let current = self
            .categories
            .iter()
            .position(|c| *c == self.selected)
            .unwrap_or(0);
        let next = self.categories[(current + step) % self.categories.len()].clone();

        store.select_category(next)?;
        self.view_kind = ViewKind::Filtered;
        self.refresh(store);
        Ok(())
    }

    // ==================== Input ====================

    /// Open the add-quote form
    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::AddQuote;
        self.form.focus = FormField::Text;
    }

    /// Open the import path prompt
    pub fn enter_import_mode(&mut self) {
        self.input_mode = InputMode::ImportPath;
        self.path_input.clear();
    }

    /// Close any form or prompt
    ///
    /// The add form keeps what was typed until a quote is added.
    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
    }

    /// Type a character into the active input
    pub fn insert_char(&mut self, c: char) {
        match self.input_mode {
            InputMode::AddQuote => self.form.active_mut().push(c),
            InputMode::ImportPath => self.path_input.push(c),
            InputMode::Normal => {}
        }
    }

    /// Delete the last character of the active input
    pub fn delete_char(&mut self) {
        match self.input_mode {
            InputMode::AddQuote => {
                self.form.active_mut().pop();
            }
            InputMode::ImportPath => {
                self.path_input.pop();
            }
            InputMode::Normal => {}
        }
    }

    /// Add the quote in the form
    ///
    /// On failure the form stays open with its contents.
    pub fn submit_add(&mut self, store: &mut Store) -> Result<()> {
        let quote = store.add(&self.form.text, &self.form.category)?;
        self.form = AddForm::default();
        self.exit_input_mode();
        self.refresh(store);
        self.set_status(format!("Quote added successfully! ({})", quote.category));
        Ok(())
    }

    /// Import the file named in the path prompt
    pub fn submit_import(&mut self, store: &mut Store) -> Result<usize> {
        let path = PathBuf::from(self.path_input.trim());
        self.exit_input_mode();

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let count = store.import_all(&contents)?;
        self.refresh(store);
        self.set_status(format!("Imported {} quote(s)", count));
        Ok(count)
    }

    /// Export the collection into the current directory
    pub fn export(&mut self, store: &Store) -> Result<PathBuf> {
        let dir = std::env::current_dir().context("Failed to resolve current directory")?;
        let path = store.export_to(&dir)?;
        self.set_status(format!("Exported {} quote(s) to {}", store.len(), path.display()));
        Ok(path)
    }

    // ==================== Sync ====================

    /// Update the indicator from a sync event
    ///
    /// Returns true when the collection changed and the view needs a refresh.
    pub fn apply_sync_event(&mut self, event: &SyncEvent) -> bool {
        match event {
            SyncEvent::PhaseChanged(SyncPhase::Fetching | SyncPhase::Reconciling) => {
                self.sync_status = SyncIndicator::Syncing;
                false
            }
            SyncEvent::PhaseChanged(SyncPhase::Failed) | SyncEvent::Failed(_) => {
                self.sync_status = SyncIndicator::Error;
                false
            }
            SyncEvent::PhaseChanged(SyncPhase::Idle) => false,
            SyncEvent::Unchanged => {
                self.sync_status = SyncIndicator::Synced;
                false
            }
            SyncEvent::Updated { .. } => {
                self.sync_status = SyncIndicator::Synced;
                self.last_synced = Some(Local::now());
                self.set_status("Quotes synced with server!");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotes_core::{Config, Quote};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, App) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap();
        let app = App::new(&mut store).unwrap();
        (temp_dir, store, app)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn test_new_shows_random_quote() {
        let (_dir, store, app) = setup();

        assert_eq!(app.view_kind, ViewKind::Random);
        match &app.view {
            QuoteView::Single(quote) => assert!(store.quotes().contains(quote)),
            other => panic!("expected a single quote, got {:?}", other),
        }
        assert_eq!(app.sync_status, SyncIndicator::Disabled);
        assert_eq!(app.categories[0], CategoryFilter::All);
    }

    #[test]
    fn test_category_cycling_wraps_and_persists() {
        let (_dir, mut store, mut app) = setup();

        app.next_category(&mut store).unwrap();
        assert_eq!(app.selected, CategoryFilter::parse("Motivation"));
        assert_eq!(app.view_kind, ViewKind::Filtered);
        assert_eq!(app.view.quotes().len(), 1);
        assert_eq!(store.selected_category(), &app.selected);

        app.prev_category(&mut store).unwrap();
        app.prev_category(&mut store).unwrap();
        assert_eq!(app.selected, CategoryFilter::parse("Wisdom"));

        app.next_category(&mut store).unwrap();
        assert_eq!(app.selected, CategoryFilter::All);
        assert_eq!(app.view.quotes().len(), 3);
    }

    #[test]
    fn test_add_form_two_fields() {
        let (_dir, mut store, mut app) = setup();

        app.enter_add_mode();
        type_str(&mut app, "Simplicity is the soul of efficiency.");
        app.form.toggle_focus();
        type_str(&mut app, "Craft");
        app.submit_add(&mut store).unwrap();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.quote_count, 4);
        assert!(app.form.text.is_empty());
        assert!(app.categories.contains(&CategoryFilter::parse("Craft")));
        assert_eq!(
            store.quotes().last(),
            Some(&Quote::new("Simplicity is the soul of efficiency.", "Craft"))
        );
    }

    #[test]
    fn test_add_missing_field_keeps_form() {
        let (_dir, mut store, mut app) = setup();

        app.enter_add_mode();
        type_str(&mut app, "No category");
        let err = app.submit_add(&mut store).unwrap_err();

        assert_eq!(
            format!("{:#}", err),
            "Please enter both a quote and a category."
        );
        assert_eq!(app.input_mode, InputMode::AddQuote);
        assert_eq!(app.form.text, "No category");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_failed_add_reports_error_and_keeps_collection() {
        let (_dir, mut store, mut app) = setup();
        std::fs::create_dir(store.config().data_dir.join("quotes.json.tmp")).unwrap();

        app.enter_add_mode();
        type_str(&mut app, "Ghost");
        app.form.toggle_focus();
        type_str(&mut app, "Phantom");
        let err = app.submit_add(&mut store).unwrap_err();
        app.report_error(&err);

        assert!(app.has_error());
        assert!(app
            .error_message
            .as_deref()
            .unwrap()
            .contains("Failed to save new quote"));
        assert_eq!(store.len(), 3);
        assert_eq!(app.input_mode, InputMode::AddQuote);
    }

    #[test]
    fn test_report_error_appends_recovery_hint() {
        let (_dir, _store, mut app) = setup();
        let err = anyhow::Error::new(quotes_core::StorageError::InvalidFormat {
            path: PathBuf::from("quotes.json"),
            details: "bad".to_string(),
        });

        app.report_error(&err);

        let message = app.error_message.clone().unwrap();
        assert!(message.starts_with("Invalid data format"));
        assert!(message.ends_with("It is not replaced automatically."));
    }

    #[test]
    fn test_delete_char_edits_focused_field() {
        let (_dir, _store, mut app) = setup();

        app.enter_add_mode();
        type_str(&mut app, "ab");
        app.form.toggle_focus();
        type_str(&mut app, "xy");
        app.delete_char();

        assert_eq!(app.form.text, "ab");
        assert_eq!(app.form.category, "x");
        assert_eq!(app.form.active(), "x");
    }

    #[test]
    fn test_import_appends_and_refreshes() {
        let (dir, mut store, mut app) = setup();
        let file = dir.path().join("incoming.json");
        std::fs::write(&file, r#"[{"text": "t", "category": "Imported"}]"#).unwrap();

        app.enter_import_mode();
        type_str(&mut app, file.to_str().unwrap());
        let count = app.submit_import(&mut store).unwrap();

        assert_eq!(count, 1);
        assert_eq!(app.quote_count, 4);
        assert!(app.categories.contains(&CategoryFilter::parse("Imported")));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let (dir, mut store, mut app) = setup();
        let file = dir.path().join("object.json");
        std::fs::write(&file, r#"{"text": "t"}"#).unwrap();

        app.enter_import_mode();
        type_str(&mut app, file.to_str().unwrap());
        assert!(app.submit_import(&mut store).is_err());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_refresh_rerenders_filtered_view_after_replace() {
        let (_dir, mut store, mut app) = setup();
        app.next_category(&mut store).unwrap();

        store
            .replace_all(vec![Quote::new("remote", "General")])
            .unwrap();
        app.refresh(&store);

        // Motivation is gone, so the filter fell back to all
        assert_eq!(app.selected, CategoryFilter::All);
        assert_eq!(app.view, QuoteView::List(vec![Quote::new("remote", "General")]));
    }

    #[test]
    fn test_sync_events_drive_indicator() {
        let (_dir, _store, mut app) = setup();

        assert!(!app.apply_sync_event(&SyncEvent::PhaseChanged(SyncPhase::Fetching)));
        assert_eq!(app.sync_status, SyncIndicator::Syncing);

        assert!(!app.apply_sync_event(&SyncEvent::Failed("offline".to_string())));
        assert_eq!(app.sync_status, SyncIndicator::Error);
        assert!(app.status_message.is_none());

        assert!(app.apply_sync_event(&SyncEvent::Updated { count: 2 }));
        assert_eq!(app.sync_status, SyncIndicator::Synced);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Quotes synced with server!")
        );
        assert!(app.last_synced.is_some());
    }

    #[test]
    fn test_status_timeout() {
        let (_dir, _store, mut app) = setup();

        app.set_status("hello");
        app.check_status_timeout();
        assert_eq!(app.status_message.as_deref(), Some("hello"));

        app.status_message_time = Some(Instant::now() - Duration::from_secs(5));
        app.check_status_timeout();
        assert!(app.status_message.is_none());
    }
}
