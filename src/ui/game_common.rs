//! Shared UI building blocks: framed layout, status bar, overlays.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Width of the info panel on the right.
pub const INFO_PANEL_WIDTH: u16 = 24;
/// Lines reserved for the status bar under the play field.
pub const STATUS_BAR_HEIGHT: u16 = 2;

/// Layout areas returned by `create_game_layout`.
pub struct GameLayout {
    /// Main content area (play field), inside the outer border
    pub content: Rect,
    /// Status bar area (2 lines) under the content
    pub status_bar: Rect,
    /// Info panel area on the right, with its own border
    pub info_panel: Rect,
}

/// Split an area into the standard game layout.
///
/// ```text
/// ┌─ Title ─────────────────────────┬─ Info ──────┐
/// │                                 │             │
/// │   [content area]                │  [info]     │
/// │                                 │             │
/// │ [status bar - 2 lines]          │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
///
/// Pure geometry; `render_game_frame` draws the border.
pub fn game_layout(area: Rect) -> GameLayout {
    let inner = outer_block("", Color::Reset).inner(area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(INFO_PANEL_WIDTH)])
        .split(inner);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(h_chunks[0]);

    GameLayout {
        content: v_chunks[0],
        status_bar: v_chunks[1],
        info_panel: h_chunks[1],
    }
}

fn outer_block(title: &str, border_color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

/// Clear the area, draw the outer border and return the layout inside it.
pub fn create_game_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
) -> GameLayout {
    frame.render_widget(Clear, area);
    frame.render_widget(outer_block(title, border_color), area);
    game_layout(area)
}

/// Render a status bar: status message on line 1, key hints on line 2.
///
/// `controls` is a slice of (key, action) pairs, e.g. `[("[Enter]", "Start")]`.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status_text: &str,
    status_color: Color,
    controls: &[(&str, &str)],
) {
    if area.height < 1 {
        return;
    }

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height >= 2 && !controls.is_empty() {
        let mut spans = Vec::new();
        for (i, (key, action)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default()));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let controls_line = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(
            controls_line,
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

/// Render an info panel frame with the " Info " title. Returns the inner area.
pub fn render_info_panel_frame(frame: &mut Frame, area: Rect) -> Rect {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Centered modal box over `area`, sized to fit `lines`.
///
/// The board stays visible around the box.
pub fn render_modal(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    lines: Vec<Line>,
) {
    let content_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let modal_width = (content_width + 6).max(title.len() as u16 + 4).min(area.width);
    let modal_height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(modal_width) / 2;
    let y = area.y + area.height.saturating_sub(modal_height) / 2;
    let modal_area = Rect::new(x, y, modal_width, modal_height);

    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        )
        .title(title);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

/// One line of `label value`, used in info panels.
pub fn label_value<'a>(label: &'a str, value: String, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}
