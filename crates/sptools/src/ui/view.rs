//! Stateless rendering over [`UiApp`].

use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use sptools_core::flow::DebugField;
use sptools_core::types::DebugReport;

use super::app::{Tab, UiApp};
use crate::prelude::*;

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const GENERATOR_INPUT_TITLE: &str = " 1. Describe Your SmartPy Contract ";
const GENERATOR_RESULT_TITLE: &str = " 2. Generated SmartPy Code ";
const DEBUGGER_CODE_TITLE: &str = " 1. Paste Your Code ";
const DEBUGGER_ERROR_TITLE: &str = " 2. Paste Error Message ";
const DEBUGGER_RESULT_TITLE: &str = " 3. Debugging Analysis ";

const DESCRIPTION_PLACEHOLDER: &str =
    "e.g., A fungible token contract with mint and transfer functionality. Only the admin can mint new tokens.";
const CODE_PLACEHOLDER: &str = "import smartpy as sp ...";
const ERROR_PLACEHOLDER: &str = "SyntaxError: ...";

fn title_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn border_focused() -> Style {
    Style::default().fg(Color::Cyan)
}

fn border_idle() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn text_dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn render(app: &UiApp, frame: &mut Frame) {
    let layout = Layout::vertical([
        Constraint::Length(2), // Title
        Constraint::Length(1), // Tab bar
        Constraint::Min(8),    // Content
        Constraint::Length(2), // Footer
    ])
    .split(frame.area());

    render_header(app, frame, layout[0]);
    render_tabs(app, frame, layout[1]);

    match app.tab {
        Tab::Generator => render_generator(app, frame, layout[2]),
        Tab::Debugger => render_debugger(app, frame, layout[2]),
    }

    render_footer(app, frame, layout[3]);

    if let Some(flash) = &app.flash_message {
        render_flash(frame, &flash.text, flash.is_error, layout[3]);
    }
}

fn render_header(app: &UiApp, frame: &mut Frame, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);
    let cols = Layout::horizontal([Constraint::Min(10), Constraint::Length(16)]).split(rows[0]);

    frame.render_widget(
        Paragraph::new(Line::styled("AI SmartPy Contract Generator", title_style())),
        cols[0],
    );
    frame.render_widget(
        Paragraph::new(Line::styled(f!("[F3] {}", app.dialect.label()), border_focused()))
            .alignment(Alignment::Right),
        cols[1],
    );
    frame.render_widget(
        Paragraph::new("Bring your Tezos smart contracts to life with natural language")
            .style(text_dim()),
        rows[1],
    );
}

fn render_tabs(app: &UiApp, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = [Tab::Generator, Tab::Debugger]
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if app.tab == *tab {
                title_style()
            } else {
                text_dim()
            };
            Line::styled(f!("[F{}] {}", i + 1, tab.label()), style)
        })
        .collect();

    let tabs = Tabs::new(titles).select(app.tab.index()).divider(" │ ");
    frame.render_widget(tabs, area);
}

fn render_generator(app: &UiApp, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(7), // Description input
        Constraint::Length(1), // Validation line
        Constraint::Min(6),    // Result
    ])
    .split(area);

    render_text_input(
        frame,
        chunks[0],
        GENERATOR_INPUT_TITLE,
        app.generator.description(),
        DESCRIPTION_PLACEHOLDER,
        !app.generator.is_pending(),
    );

    render_validation_line(frame, chunks[1], app.generator.error());

    if app.generator.is_pending() {
        render_loading(
            frame,
            chunks[2],
            GENERATOR_RESULT_TITLE,
            "Generating your contract...",
            app.spinner_frame,
        );
    } else if let Some(code) = app.generator.generated_code() {
        render_scrollable(frame, chunks[2], GENERATOR_RESULT_TITLE, code, app.generator_scroll);
    } else {
        render_placeholder_panel(
            frame,
            chunks[2],
            GENERATOR_RESULT_TITLE,
            "Generated code will appear here. Press Ctrl+G to generate.",
        );
    }
}

fn render_debugger(app: &UiApp, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(9), // Contract code input
        Constraint::Length(5), // Error message input
        Constraint::Length(1), // Validation line
        Constraint::Min(6),    // Analysis
    ])
    .split(area);

    let editing = !app.debugger.is_pending();

    render_text_input(
        frame,
        chunks[0],
        DEBUGGER_CODE_TITLE,
        app.debugger.contract_code(),
        CODE_PLACEHOLDER,
        editing && app.debug_field == DebugField::ContractCode,
    );
    render_text_input(
        frame,
        chunks[1],
        DEBUGGER_ERROR_TITLE,
        app.debugger.error_message(),
        ERROR_PLACEHOLDER,
        editing && app.debug_field == DebugField::ErrorMessage,
    );

    render_validation_line(frame, chunks[2], app.debugger.error());

    if app.debugger.is_pending() {
        render_loading(
            frame,
            chunks[3],
            DEBUGGER_RESULT_TITLE,
            "Analyzing your contract...",
            app.spinner_frame,
        );
    } else if let Some(report) = app.debugger.report() {
        let text = analysis_text(report);
        render_scrollable(frame, chunks[3], DEBUGGER_RESULT_TITLE, &text, app.debugger_scroll);
    } else {
        render_placeholder_panel(
            frame,
            chunks[3],
            DEBUGGER_RESULT_TITLE,
            "Paste failing code and its error message, then press Ctrl+G.",
        );
    }
}

/// Flattens a debug report into the text shown in the analysis panel.
fn analysis_text(report: &DebugReport) -> String {
    f!(
        "Explanation of the Error:\n\n{}\n\nCorrected Code:\n\n{}",
        report.explanation.trim_end(),
        report.corrected_code.trim_end()
    )
}

fn render_text_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            border_focused()
        } else {
            border_idle()
        })
        .title(title)
        .title_style(if focused { title_style() } else { text_dim() });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if value.is_empty() {
        frame.render_widget(
            Paragraph::new(placeholder)
                .style(text_dim())
                .wrap(Wrap { trim: false }),
            inner,
        );
    } else {
        frame.render_widget(Paragraph::new(value).wrap(Wrap { trim: false }), inner);
    }

    if focused {
        set_input_cursor(frame, inner, value);
    }
}

fn set_input_cursor(frame: &mut Frame, inner: Rect, value: &str) {
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let (row, column) = input_cursor_offset(value, inner.width as usize);
    let row = row.min(inner.height.saturating_sub(1) as usize);
    frame.set_cursor_position(Position::new(
        inner.x + column as u16,
        inner.y + row as u16,
    ));
}

/// Row and column of the insertion point within a wrapped textarea.
/// Embedded newlines start a new row; full rows wrap onto the next one.
fn input_cursor_offset(value: &str, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let mut row = 0;
    let mut last: usize = 0;
    for (index, segment) in value.split('\n').enumerate() {
        if index > 0 {
            // The earlier segment spans at least one row even when empty.
            row += 1 + last.saturating_sub(1) / width;
        }
        last = segment.chars().count();
    }
    (row + last / width, last % width)
}

fn render_validation_line(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(message) = error {
        frame.render_widget(Paragraph::new(Line::styled(message.to_string(), error_style())), area);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, title: &str, headline: &str, spinner_frame: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_focused())
        .title(title)
        .title_style(title_style());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];

    let content = vec![
        Line::raw(""),
        Line::raw(""),
        Line::styled(f!("{spinner} {headline}"), title_style()),
        Line::raw(""),
        Line::styled("This may take a few moments.", text_dim()),
        Line::raw(""),
        Line::styled("[Esc] Cancel", text_dim()),
    ];

    frame.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_scrollable(frame: &mut Frame, area: Rect, title: &str, text: &str, scroll: usize) {
    let lines: Vec<&str> = text.lines().collect();
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_height);
    let scroll = scroll.min(max_scroll);

    let visible_text: String = lines
        .iter()
        .skip(scroll)
        .take(visible_height)
        .cloned()
        .collect::<Vec<&str>>()
        .join("\n");

    let scroll_indicator = if lines.len() > visible_height {
        f!(" [{}/{}]", scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };

    let paragraph = Paragraph::new(visible_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_focused())
            .title(f!("{title}(↑/↓){scroll_indicator} "))
            .title_style(title_style()),
    );
    frame.render_widget(paragraph, area);
}

fn render_placeholder_panel(frame: &mut Frame, area: Rect, title: &str, hint: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_idle())
        .title(title)
        .title_style(text_dim());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = vec![
        Line::raw(""),
        Line::raw(""),
        Line::styled(hint, text_dim()),
    ];

    frame.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_footer(app: &UiApp, frame: &mut Frame, area: Rect) {
    let hints = match app.tab {
        Tab::Generator => "[Ctrl+G] Generate Contract  [Ctrl+Y] Copy Code  [F3] Switch IDE  [Ctrl+Q] Quit",
        Tab::Debugger => {
            if app.debugger.report().is_some() {
                "[Ctrl+G] Analyze Error  [Ctrl+A] Apply Correction & Update Code  [Ctrl+Y] Copy  [Ctrl+Q] Quit"
            } else {
                "[Ctrl+G] Analyze Error  [Tab] Switch Field  [Ctrl+Y] Copy  [Ctrl+Q] Quit"
            }
        }
    };

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);
    frame.render_widget(Paragraph::new(hints).style(text_dim()), rows[0]);
    frame.render_widget(
        Paragraph::new(
            "Powered by Gemini API. Generated code is for demonstration and should be reviewed carefully.",
        )
        .style(text_dim()),
        rows[1],
    );
}

fn render_flash(frame: &mut Frame, text: &str, is_error: bool, area: Rect) {
    let style = if is_error {
        Style::default().fg(Color::White).bg(Color::Red)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };

    let width = (text.chars().count() as u16 + 2).min(area.width);
    let flash_area = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y,
        width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(f!(" {text} ")).style(style), flash_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_offset_follows_the_last_line() {
        assert_eq!(input_cursor_offset("", 10), (0, 0));
        assert_eq!(input_cursor_offset("abc", 10), (0, 3));
        assert_eq!(input_cursor_offset("abc\nde", 10), (1, 2));
        assert_eq!(input_cursor_offset("abc\n\n", 10), (2, 0));
    }

    #[test]
    fn test_cursor_offset_wraps_full_rows() {
        // A line that exactly fills the row puts the cursor on the next one.
        assert_eq!(input_cursor_offset("aaaaaaaaaa", 10), (1, 0));
        assert_eq!(input_cursor_offset("aaaaaaaaaabb", 10), (1, 2));
        // An earlier full line still occupies a single row.
        assert_eq!(input_cursor_offset("aaaaaaaaaa\nbb", 10), (1, 2));
        assert_eq!(input_cursor_offset("aaaaaaaaaabb\ncc", 10), (2, 2));
    }

    #[test]
    fn test_cursor_offset_counts_pasted_code_rows() {
        let code = "import smartpy as sp\n\nclass Token(sp.Contract):\n    def __init__(self):";
        let (row, column) = input_cursor_offset(code, 40);

        assert_eq!(row, 3);
        assert_eq!(column, "    def __init__(self):".chars().count());
    }

    #[test]
    fn test_analysis_text_orders_explanation_before_code() {
        let report = DebugReport {
            explanation: "The storage field is missing.".to_string(),
            corrected_code: "import smartpy as sp\n".to_string(),
        };

        let text = analysis_text(&report);
        let explanation_at = text.find("The storage field is missing.").unwrap();
        let code_at = text.find("import smartpy as sp").unwrap();

        assert!(text.starts_with("Explanation of the Error:"));
        assert!(text.contains("Corrected Code:"));
        assert!(explanation_at < code_at);
        assert!(!text.ends_with('\n'));
    }
}
