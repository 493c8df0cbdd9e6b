//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use quotes_core::QuoteView;

use super::app::{App, FormField, InputMode, SyncIndicator, ViewKind};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_categories(frame, app, chunks[0]);
    draw_quote_display(frame, app, chunks[1]);

    // Draw sync indicator in top-right corner
    draw_sync_indicator(frame, app);

    match app.input_mode {
        InputMode::ImportPath => draw_import_prompt(frame, app, chunks[2]),
        _ => draw_status_bar(frame, app, chunks[2]),
    }

    if app.input_mode == InputMode::AddQuote {
        draw_add_form(frame, app);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    // Errors sit above everything else
    if let Some(msg) = &app.error_message {
        draw_error_modal(frame, msg);
    }
}

/// Draw the category filter tabs
fn draw_categories(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .categories
        .iter()
        .map(|c| Line::from(c.to_string()))
        .collect();
    let selected = app
        .categories
        .iter()
        .position(|c| *c == app.selected)
        .unwrap_or(0);

    let block = Block::default()
        .title(format!(" Quotes ({}) ", app.quote_count))
        .borders(Borders::ALL);

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );

    frame.render_widget(tabs, area);
}

/// Draw the main quote display
fn draw_quote_display(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.view_kind {
        ViewKind::Random => " Random Quote ".to_string(),
        ViewKind::Filtered => format!(" Category: {} ", app.selected),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let content = match &app.view {
        QuoteView::Empty(msg) => vec![
            Line::from(""),
            Line::from(Span::styled(
                *msg,
                Style::default().add_modifier(Modifier::DIM),
            )),
        ],
        QuoteView::Single(quote) => vec![
            Line::from(""),
            Line::from(Span::styled(
                quote.text.as_str(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(vec![
                Span::raw("- ("),
                Span::styled(
                    quote.category.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(")"),
            ]),
        ],
        QuoteView::List(quotes) => {
            let mut lines = Vec::with_capacity(quotes.len() * 2);
            for quote in quotes {
                lines.push(Line::from(vec![
                    Span::raw(quote.text.as_str()),
                    Span::styled(
                        format!(" - ({})", quote.category),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ]));
                lines.push(Line::from(""));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "n:new  a:add  ←/→:category  e:export  i:import  s:sync  ?:help  q:quit".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw the import path prompt at the bottom
fn draw_import_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = "Import file: ";

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::raw(app.path_input.as_str()),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + (prefix.len() + app.path_input.chars().count()) as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Draw the add-quote form as a popup
fn draw_add_form(frame: &mut Frame, app: &App) {
    let popup_area = centered(frame.area(), 60, 9);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Add Quote ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let fields = [
        (FormField::Text, "Enter a new quote", app.form.text.as_str(), rows[0]),
        (FormField::Category, "Enter quote category", app.form.category.as_str(), rows[1]),
    ];

    for (field, label, value, area) in fields {
        let focused = app.form.focus == field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let input = Paragraph::new(value).block(
            Block::default()
                .title(format!(" {} ", label))
                .borders(Borders::ALL)
                .border_style(style),
        );
        frame.render_widget(input, area);

        if focused {
            // Keep the cursor inside the box even for long input
            let max_x = area.x + area.width.saturating_sub(2);
            let cursor_x = (area.x + 1 + value.chars().count() as u16).min(max_x);
            frame.set_cursor_position((cursor_x, area.y + 1));
        }
    }

    let hint = Paragraph::new("Tab: switch field  Enter: add  Esc: cancel")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(hint, rows[2]);
}

/// Draw sync indicator in top-right corner
fn draw_sync_indicator(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 5 {
        return;
    }

    let (icon, style) = match app.sync_status {
        SyncIndicator::Synced => ("✓", Style::default().fg(Color::Green)),
        SyncIndicator::Syncing => ("↻", Style::default().fg(Color::Yellow)),
        SyncIndicator::Disabled => ("○", Style::default().add_modifier(Modifier::DIM)),
        SyncIndicator::Error => ("✗", Style::default().fg(Color::Red)),
    };

    let indicator = Paragraph::new(Span::styled(icon, style));
    let indicator_area = Rect::new(area.width - 2, 0, 1, 1);
    frame.render_widget(indicator, indicator_area);
}

/// Draw a blocking error modal
fn draw_error_modal(frame: &mut Frame, msg: &str) {
    let popup_area = centered(frame.area(), 60, 10);
    frame.render_widget(Clear, popup_area);

    let mut text: Vec<Line> = msg.lines().map(Line::from).collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered(frame.area(), 46, 16);

    // Clear the popup area
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  n           Show new random quote"),
        Line::from("  a           Add quote"),
        Line::from("  ←/→, c      Change category"),
        Line::from("  e           Export to quotes.json"),
        Line::from("  i           Import from JSON file"),
        Line::from("  s           Sync now"),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Centered popup area, clamped to the frame
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}
