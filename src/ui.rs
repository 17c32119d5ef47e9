use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{position_key, App, AppState, Feedback};
use crate::history::format_elapsed;
use crate::matching::{ItemView, MatchingSession, Selection};
use crate::orchestrator::ActiveSession;
use crate::selector::{Answer, SelectorSession};
use crate::session::GameSummary;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Cut `text` to `width` terminal cells, marking the cut with an ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn row_label(position: usize) -> String {
    match position_key(position) {
        Some(key) => format!("{}. ", key),
        None => "   ".to_string(),
    }
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(text, italic())).alignment(Alignment::Center)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Layout::default()
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(0)])
            .split(area)[0];

        match self.state {
            AppState::Menu => render_menu(self, area, buf),
            AppState::History => render_history(self, area, buf),
            AppState::Playing => match self.orchestrator.active() {
                ActiveSession::Idle => render_menu(self, area, buf),
                ActiveSession::Matching(session) => match session.summary() {
                    Some(summary) => render_results(self, summary, area, buf),
                    None => render_matching(session, self.feedback, area, buf),
                },
                ActiveSession::Selector(session) => match session.summary() {
                    Some(summary) => render_results(self, summary, area, buf),
                    None => render_selector(session, self.feedback, area, buf),
                },
            },
        }
    }
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(3), // format help
            Constraint::Length(3), // file input
            Constraint::Length(4), // settings
            Constraint::Length(2), // error
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Word Matching Game",
        bold().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(
        "Choose a file with word pairs in the format:\n\"original - translation\" or \"original translation\"",
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[1], buf);

    let width = chunks[2].width.saturating_sub(4) as usize;
    Paragraph::new(Line::from(vec![
        Span::raw(fit(&app.menu.path, width)),
        Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("File"))
    .render(chunks[2], buf);

    let checkbox = if app.orchestrator.invert() { "[x]" } else { "[ ]" };
    let settings = vec![
        Line::from(format!("Game: {}", app.menu.game)),
        Line::from(format!("{} Invert (translation - word)", checkbox)),
        Line::from(format!("Words per page: {}", app.orchestrator.page_size())),
    ];
    Paragraph::new(settings)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    if let Some(ref error) = app.menu.error {
        Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
    }

    legend("(enter) start / (tab) game / (f2) invert / (↑↓) page size / (f3) history / (esc) quit")
        .render(chunks[6], buf);
}

fn item_line(position: usize, item: &ItemView<'_>, width: usize) -> Line<'static> {
    let style = if item.matched {
        bold().fg(Color::Green).add_modifier(Modifier::DIM)
    } else if item.selected {
        bold().fg(Color::Black).bg(Color::Yellow)
    } else {
        bold()
    };
    let label = row_label(position);
    let text = fit(item.text, width.saturating_sub(label.width()));
    Line::from(vec![
        Span::styled(label, italic()),
        Span::styled(text, style),
    ])
}

fn render_matching(session: &MatchingSession, feedback: Option<Feedback>, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // page header
            Constraint::Min(3),    // columns
            Constraint::Length(1), // feedback
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!("Page {} of {}", session.page() + 1, session.total_pages()),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    for (column, title, items) in [
        (columns[0], "Original", session.left_items()),
        (columns[1], "Translation", session.right_items()),
    ] {
        let width = column.width.saturating_sub(2) as usize;
        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .map(|(position, item)| item_line(position, item, width))
            .collect();
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(column, buf);
    }

    let hint = match feedback {
        Some(Feedback::Match(Selection::Matched)) => Span::styled("✓ match", Style::default().fg(Color::Green)),
        Some(Feedback::Match(Selection::Mismatched)) => Span::styled("✗ not a pair", Style::default().fg(Color::Red)),
        _ => Span::raw(format!("errors: {}", session.stats.errors)),
    };
    Paragraph::new(hint)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    legend("(1-9, 0) pick original, then translation / (esc) menu").render(chunks[3], buf);
}

fn render_selector(session: &SelectorSession, feedback: Option<Feedback>, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // page header
            Constraint::Length(3), // prompt
            Constraint::Min(3),    // options
            Constraint::Length(1), // feedback
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!(
            "Page {} of {}   question {}/{}",
            session.page() + 1,
            session.total_pages(),
            session.question_index() + 1,
            session.questions_on_page()
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if let Some(pair) = session.current_pair() {
        Paragraph::new(Span::styled(pair.original.as_str(), bold().fg(Color::Yellow)))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }

    let width = chunks[2].width.saturating_sub(2) as usize;
    let lines: Vec<Line> = session
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if session.is_disabled(i) {
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
            } else {
                bold()
            };
            let label = row_label(i);
            let text = fit(option, width.saturating_sub(label.width()));
            Line::from(vec![Span::styled(label, italic()), Span::styled(text, style)])
        })
        .collect();
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Translation"))
        .render(chunks[2], buf);

    let hint = match feedback {
        Some(Feedback::Answer(Answer::Correct)) => Span::styled("✓ correct", Style::default().fg(Color::Green)),
        Some(Feedback::Answer(Answer::Wrong)) => Span::styled("✗ try again", Style::default().fg(Color::Red)),
        _ => Span::raw(format!("errors: {}", session.stats.errors)),
    };
    Paragraph::new(hint)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    legend("(1-5) answer / (esc) menu").render(chunks[4], buf);
}

fn render_results(app: &App, summary: &GameSummary, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(6), // summary
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled("Result", bold().fg(Color::Yellow))),
        Line::from(""),
        Line::from(format!("Correct/Errors: {}/{}", summary.correct, summary.errors)),
        Line::from(format!("Success rate: {}%", summary.success_rate)),
    ];
    if summary.elapsed.is_some() {
        lines.push(Line::from(format!("Time: {}", format_elapsed(summary.elapsed))));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let invert = if app.orchestrator.invert() { "on" } else { "off" };
    legend(&format!(
        "(r)etry same file / (i)nvert: {} / (m)enu",
        invert
    ))
    .render(chunks[3], buf);
}

fn history_row(entry: &crate::history::HistoryEntry) -> Row<'static> {
    let or_dash = |v: Option<u32>| v.map_or("-".to_string(), |v| v.to_string());
    Row::new(vec![
        Cell::from(entry.name.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(or_dash(entry.correct)),
        Cell::from(or_dash(entry.errors)),
        Cell::from(format!("{}%", or_dash(entry.success_rate))),
        Cell::from(entry.time.clone().unwrap_or_else(|| "-".to_string())),
    ])
}

fn render_history(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Min(0),    // table
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("History", bold().fg(Color::Yellow)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let entries = &app.history_view.entries;
    if entries.is_empty() {
        Paragraph::new("No results yet")
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    } else {
        let header = Row::new(["Name", "Correct", "Errors", "Success", "Time"])
            .style(bold().fg(Color::Cyan))
            .bottom_margin(1);
        let rows = entries
            .iter()
            .skip(app.history_view.scroll_offset)
            .map(history_row);
        let widths = [
            Constraint::Percentage(28),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
        ];
        Widget::render(
            Table::new(rows, widths)
                .header(header)
                .block(Block::default().borders(Borders::ALL)),
            chunks[1],
            buf,
        );
    }

    legend("(↑↓) scroll / (r)eload / (esc) back").render(chunks[2], buf);
}
