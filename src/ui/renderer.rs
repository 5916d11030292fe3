use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::App;
use crate::core::message::{AppMessageKind, Message, TranscriptRole};

const IDLE_HINT: &str = "Enter send • Alt+Enter newline • Tab focus • /help • Ctrl+C quit";

pub fn ui(f: &mut Frame, app: &App) {
    // Header, transcript, three-row input box, status line
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, chunks[0], app);
    render_transcript(f, chunks[1], app);
    render_input(f, chunks[2], app);
    render_status(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let short_id: String = session
        .session_id
        .trim_start_matches("sess-")
        .chars()
        .take(8)
        .collect();
    let text = format!(
        "Cameo v{} • {} • mood: {} • session {} • cache hits {}",
        env!("CARGO_PKG_VERSION"),
        session.character.display_label(),
        session.character.mood_summary(),
        short_id,
        session.metrics.format_hit_rate(),
    );
    let header = Paragraph::new(truncate_to_width(&text, area.width as usize))
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(header, area);
}

fn render_transcript(f: &mut Frame, area: Rect, app: &App) {
    let lines = build_display_lines(app);

    // Clamp scroll-back so the view never runs past the first line
    let total = wrapped_line_count(&lines, area.width);
    let max_offset = total.saturating_sub(area.height);
    let scroll_offset = max_offset.saturating_sub(app.ui.scroll_back);

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let (title, style) = if app.is_processing() {
        (
            format!("Waiting for {}…", app.session.character.name),
            Style::default().fg(Color::DarkGray),
        )
    } else if app.is_input_focused() {
        ("Message".to_string(), Style::default().fg(Color::Cyan))
    } else {
        (
            "Scrolling transcript (Tab to type)".to_string(),
            Style::default(),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width as usize;
    let line = if let Some(status) = &app.ui.status {
        Line::from(Span::styled(
            truncate_to_width(&status.text, width),
            kind_style(status.kind),
        ))
    } else if app.is_processing() {
        Line::from(Span::styled(
            format!("{} thinking…", app.ui.spinner()),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            truncate_to_width(IDLE_HINT, width),
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn kind_style(kind: AppMessageKind) -> Style {
    match kind {
        AppMessageKind::Info => Style::default().fg(Color::Gray),
        AppMessageKind::Warning => Style::default().fg(Color::Yellow),
        AppMessageKind::Error => Style::default().fg(Color::Red),
    }
}

/// Transcript rendered as styled lines, one blank line between messages.
pub fn build_display_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, message) in app.ui.transcript.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        push_message_lines(&mut lines, message, &app.session.character.name);
    }
    lines
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, message: &Message, character_name: &str) {
    let (prefix, prefix_style, body_style) = match message.role {
        TranscriptRole::User => (
            "You: ".to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default(),
        ),
        TranscriptRole::Character => (
            format!("{character_name}: "),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Style::default(),
        ),
        role => {
            let kind = role.app_kind().unwrap_or(AppMessageKind::Info);
            let marker = match kind {
                AppMessageKind::Info => "• ",
                AppMessageKind::Warning => "⚠ ",
                AppMessageKind::Error => "✖ ",
            };
            (marker.to_string(), kind_style(kind), kind_style(kind))
        }
    };

    for (i, text) in message.content.split('\n').enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(prefix.clone(), prefix_style),
                Span::styled(text.to_string(), body_style),
            ]));
        } else {
            lines.push(Line::from(Span::styled(text.to_string(), body_style)));
        }
    }
}

/// Rows `lines` occupy once wrapped to `width` columns. Long words are
/// counted as if they wrap at the column edge.
pub fn wrapped_line_count(lines: &[Line<'_>], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    rows.min(u16::MAX as usize) as u16
}

/// Cut `text` to at most `max` display columns, ending with `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
