use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthChar;
use msgboard_core::reactions::Reaction;
use msgboard_core::{format_timestamp, Message};

use crate::app::{App, Focus};

const LABEL_WIDTH: usize = 12;

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping (doesn't break mid-word)
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if current_len == 0 {
                current_line = word.to_string();
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
                current_len = word_len;
            }
        }

        // Blank paragraphs keep their line
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// The part of a single-line field that fits in `width` columns with the
/// cursor visible, and the cursor's column within it.
fn field_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let col_width = |slice: &[char]| -> usize { slice.iter().map(|c| c.width().unwrap_or(0)).sum() };

    let mut start = 0;
    while start < cursor && col_width(&chars[start..cursor]) >= width.max(1) {
        start += 1;
    }

    let visible: String = chars[start..].iter().collect();
    (visible, col_width(&chars[start..cursor]))
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, messages, form, status line
    let [header_area, messages_area, form_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(6),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_messages(app, frame, messages_area);
    render_form(app, frame, form_area);
    render_status(app, frame, status_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let updated = match app.last_refresh {
        Some(at) => format!(" updated {}s ago", at.elapsed().as_secs()),
        None => " loading...".to_string(),
    };

    let title = Line::from(vec![
        Span::styled(" Message Board ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.config.server_url.clone(), Style::default().fg(Color::Gray)),
        Span::styled(updated, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn reaction_row_line(
    app: &App,
    message: &Message,
    row: &[Reaction],
    row_start: usize,
    is_selected: bool,
) -> Line<'static> {
    let spans: Vec<Span<'static>> = row
        .iter()
        .enumerate()
        .map(|(offset, reaction)| {
            let count = message.reaction_count(reaction.name);
            let style = if is_selected && app.focus == Focus::Messages && app.reaction_idx == row_start + offset {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if count > 0 {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("{} {} ", reaction.emoji, count), style)
        })
        .collect();

    Line::from(spans)
}

fn message_item(app: &App, message: &Message, is_selected: bool, width: usize) -> ListItem<'static> {
    let mut lines: Vec<Line<'static>> = wrap_text_to_width(&message.content, width)
        .into_iter()
        .map(Line::from)
        .collect();

    let mut row_start = 0;
    for row in app.catalog.rows() {
        lines.push(reaction_row_line(app, message, row, row_start, is_selected));
        row_start += row.len();
    }

    lines.push(Line::from(vec![
        Span::styled(message.author.clone(), Style::default().fg(Color::Cyan)),
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(format_timestamp(&message.timestamp), Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::default());

    ListItem::new(lines)
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_style = if app.focus == Focus::Messages {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(format!(" Messages ({}) ", app.messages.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.messages.is_empty() {
        let empty = Paragraph::new("No messages yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Room for borders and the highlight symbol
    let text_width = area.width.saturating_sub(4) as usize;
    let selected = app.list_state.selected();
    let items: Vec<ListItem> = app
        .messages
        .iter()
        .enumerate()
        .map(|(i, message)| message_item(app, message, selected == Some(i), text_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn form_line(label: &str, value: &str, placeholder: &str, active: bool) -> Line<'static> {
    let label_style = if active {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };

    let value_span = if value.is_empty() && !active {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };

    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
        value_span,
    ])
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let in_form = app.focus.is_form();
    let count = app.char_count();
    let count_style = if count.over_limit() {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" New message ")
        .title_bottom(Line::from(Span::styled(format!(" {} ", count.label()), count_style)).right_aligned())
        .borders(Borders::ALL)
        .border_style(if in_form {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let field_width = (area.width.saturating_sub(2) as usize).saturating_sub(LABEL_WIDTH);
    let fields = [
        (Focus::Message, "Message", app.draft.message.as_str(), "What's on your mind?"),
        (Focus::Author, "Author", app.draft.author.as_str(), "Anonymous"),
        (Focus::Repository, "Repository", app.draft.repository.as_str(), "local"),
    ];

    let mut lines = Vec::new();
    let mut cursor_pos = None;
    for (row, (focus, label, value, placeholder)) in fields.into_iter().enumerate() {
        let active = app.focus == focus;
        if active {
            let (visible, cursor_col) = field_window(value, app.cursor, field_width);
            lines.push(form_line(label, &visible, placeholder, true));
            cursor_pos = Some((
                area.x + 1 + (LABEL_WIDTH + cursor_col) as u16,
                area.y + 1 + row as u16,
            ));
        } else {
            lines.push(form_line(label, value, placeholder, false));
        }
    }

    let button_style = if app.submitting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(format!(" {} ", app.submit_label()), button_style),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if let Some(pos) = cursor_pos {
        frame.set_cursor_position(pos);
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(active) = &app.notice {
        let notice = Paragraph::new(format!(" {} ", active.notice.text))
            .style(Style::default().bg(Color::Red).fg(Color::White).bold());
        frame.render_widget(notice, area);
        return;
    }

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.focus.is_form() {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(if app.submitting { " sending " } else { " send " }, label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" next field ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" messages ", label_style),
        ]
    } else {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" message ", label_style),
            Span::styled(" h/l J/K ", key_style),
            Span::styled(" reaction ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" react ", label_style),
            Span::styled(" r ", key_style),
            Span::styled(" refresh ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" write ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
