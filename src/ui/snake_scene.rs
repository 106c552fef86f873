//! Snake game UI rendering.
//!
//! Uses half-block pixel rendering. The canvas from `canvas::paint` is packed
//! two pixel rows per terminal row using the `▀` (upper half block) character
//! with fg=top, bg=bottom colors. One pixel is one terminal column wide.

use super::canvas::{self, food_color, paint, rgb, PixelCanvas, EMPTY_BG, GHOST_BRIGHT};
use super::game_common::{
    create_game_layout, game_layout, label_value, render_info_panel_frame, render_modal,
    render_status_bar,
};
use crate::game::{FoodKind, GamePhase, SnakeGame};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

// ── Border characters ────────────────────────────────────────────────
const BORDER_H: char = '\u{2500}'; // ─
const BORDER_V: char = '\u{2502}'; // │
const BORDER_TL: char = '\u{250C}'; // ┌
const BORDER_TR: char = '\u{2510}'; // ┐
const BORDER_BL: char = '\u{2514}'; // └
const BORDER_BR: char = '\u{2518}'; // ┘
const HALF_TOP: char = '\u{2580}'; // ▀
const FULL_BLOCK: char = '\u{2588}'; // █

const NEON: Color = Color::Rgb(0, 255, 157);
const GOLD: Color = Color::Rgb(255, 215, 0);
const DANGER: Color = Color::Rgb(255, 68, 68);
const FIELD_BORDER: Color = Color::Rgb(0, 120, 80);

/// Pixel size of the area the play field may occupy inside `area`.
///
/// Mirrors the layout `render_snake_scene` draws, so the grid computed from
/// it fits on screen.
pub fn field_viewport(area: Rect) -> (u32, u32) {
    let content = game_layout(area).content;
    let cols = u32::from(content.width.saturating_sub(2));
    let rows = u32::from(content.height.saturating_sub(2));
    (cols, rows * 2)
}

/// Render the whole game screen.
///
/// `notice` is a one-off message from the host, shown in the status bar.
pub fn render_snake_scene(frame: &mut Frame, area: Rect, game: &SnakeGame, notice: Option<&str>) {
    let border_color = match game.phase {
        GamePhase::GameOver => DANGER,
        GamePhase::Paused => Color::DarkGray,
        _ if game.is_boosted() => GOLD,
        _ => NEON,
    };
    let layout = create_game_layout(frame, area, " Neon Snake ", border_color);

    if game.grid.is_empty() {
        render_centered(
            frame,
            layout.content,
            "Terminal too small to play. Enlarge the window.",
            Style::default().fg(DANGER),
        );
    } else {
        let geometry = render_play_field(frame, layout.content, game);
        render_popups(frame, &geometry, game);
    }

    match game.phase {
        GamePhase::Ready if !game.grid.is_empty() => render_centered(
            frame,
            layout.content,
            "[ Arrow key or Enter to start ]",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        GamePhase::Paused => render_modal(
            frame,
            layout.content,
            " PAUSED ",
            GOLD,
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Space to resume",
                    Style::default().fg(Color::White),
                )),
            ],
        ),
        GamePhase::GameOver => render_game_over(frame, layout.content, game),
        _ => {}
    }

    render_status_bar_content(frame, layout.status_bar, game, notice);
    render_info_panel(frame, layout.info_panel, game);
}

/// Where the play field landed on screen.
struct FieldGeometry {
    /// Terminal column of pixel x = 0.
    origin_x: u16,
    /// Terminal row of pixel y = 0.
    origin_y: u16,
    /// Visible pixel columns.
    width: u16,
    /// Visible terminal rows of pixels.
    rows: u16,
    cell: u16,
}

fn render_play_field(frame: &mut Frame, area: Rect, game: &SnakeGame) -> FieldGeometry {
    if area.height < 3 || area.width < 3 {
        return FieldGeometry {
            origin_x: area.x,
            origin_y: area.y,
            width: 0,
            rows: 0,
            cell: game.grid.cell_size,
        };
    }

    let pixels = paint(game);

    let content_rows = (pixels.height.div_ceil(2) as u16).min(area.height.saturating_sub(2));
    let render_w = (pixels.width as u16 + 2).min(area.width);
    let inner_w = render_w.saturating_sub(2);
    let total_h = content_rows + 2;

    let x_off = area.x + area.width.saturating_sub(render_w) / 2;
    let y_off = area.y + area.height.saturating_sub(total_h) / 2;
    let border = Style::default().fg(FIELD_BORDER);

    // ── Top border with score ───────────────────────────────────
    {
        let score_val = format!(" {} ", game.score);
        let pad_before = (inner_w as usize).saturating_sub(score_val.len() + 1);
        let pad_after = (inner_w as usize).saturating_sub(pad_before + score_val.len());

        let spans = vec![
            Span::styled(BORDER_TL.to_string(), border),
            Span::styled(std::iter::repeat_n(BORDER_H, pad_before).collect::<String>(), border),
            Span::styled(
                score_val,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(std::iter::repeat_n(BORDER_H, pad_after).collect::<String>(), border),
            Span::styled(BORDER_TR.to_string(), border),
        ];
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(x_off, y_off, render_w, 1),
        );
    }

    // ── Pixel rows ──────────────────────────────────────────────
    for term_row in 0..content_rows {
        let mut spans = vec![Span::styled(BORDER_V.to_string(), border)];
        spans.extend(half_block_row(&pixels, term_row as usize * 2, inner_w as usize));
        spans.push(Span::styled(BORDER_V.to_string(), border));

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(x_off, y_off + 1 + term_row, render_w, 1),
        );
    }

    // ── Bottom border ───────────────────────────────────────────
    {
        let mut s = String::new();
        s.push(BORDER_BL);
        s.extend(std::iter::repeat_n(BORDER_H, inner_w as usize));
        s.push(BORDER_BR);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(s, border))),
            Rect::new(x_off, y_off + 1 + content_rows, render_w, 1),
        );
    }

    FieldGeometry {
        origin_x: x_off + 1,
        origin_y: y_off + 1,
        width: inner_w,
        rows: content_rows,
        cell: game.grid.cell_size,
    }
}

/// One terminal row from pixel rows `top` and `top + 1`, batching runs of
/// identical colours into one span.
fn half_block_row(pixels: &PixelCanvas, top: usize, width: usize) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cur_fg = Color::Reset;
    let mut cur_bg = Color::Reset;
    let mut cur_text = String::new();

    for x in 0..width.min(pixels.width) {
        // ▀ uses fg for top half, bg for bottom half
        let fg = pixels.get(x, top).unwrap_or(EMPTY_BG);
        let bg = pixels.get(x, top + 1).unwrap_or(EMPTY_BG);

        if (fg != cur_fg || bg != cur_bg) && !cur_text.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut cur_text),
                Style::default().fg(cur_fg).bg(cur_bg),
            ));
        }
        cur_fg = fg;
        cur_bg = bg;
        cur_text.push(HALF_TOP);
    }
    if !cur_text.is_empty() {
        spans.push(Span::styled(cur_text, Style::default().fg(cur_fg).bg(cur_bg)));
    }
    spans
}

/// Score popups float upward from where the food was eaten.
fn render_popups(frame: &mut Frame, field: &FieldGeometry, game: &SnakeGame) {
    for popup in &game.popups {
        let (Ok(cx), Ok(cy)) = (u16::try_from(popup.pos.x), u16::try_from(popup.pos.y)) else {
            continue;
        };
        let rise = (crate::constants::POPUP_TICKS.saturating_sub(popup.ticks_left) / 2) as u16;
        let px = cx * field.cell;
        let row = (cy * field.cell / 2).saturating_sub(rise);
        if row >= field.rows || px >= field.width {
            continue;
        }

        let width = (popup.text.len() as u16).min(field.width - px);
        let color = if popup.negative {
            rgb(food_color(FoodKind::Poison))
        } else {
            GOLD
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                popup.text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Rect::new(field.origin_x + px, field.origin_y + row, width, 1),
        );
    }
}

fn render_centered(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let width = (text.len() as u16).min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_string(), style)),
        Rect::new(x, y, width, 1),
    );
}

fn render_game_over(frame: &mut Frame, area: Rect, game: &SnakeGame) {
    let cause = game
        .game_over_cause
        .map(|c| c.describe())
        .unwrap_or("ran out of road");

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("The snake {}.", cause),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Score ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                game.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Level ", Style::default().fg(Color::DarkGray)),
            Span::styled(game.level.to_string(), Style::default().fg(Color::White)),
        ]),
    ];
    if game.last_run().is_some_and(|r| r.new_high_score) {
        lines.push(Line::from(Span::styled(
            "NEW HIGH SCORE!",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Play again  [Q] Quit",
        Style::default().fg(Color::DarkGray),
    )));

    render_modal(frame, area, " GAME OVER ", DANGER, lines);
}

fn render_status_bar_content(
    frame: &mut Frame,
    area: Rect,
    game: &SnakeGame,
    notice: Option<&str>,
) {
    if let Some(message) = notice {
        render_status_bar(frame, area, message, DANGER, &[("[Q]", "Quit")]);
        return;
    }

    match game.phase {
        GamePhase::Ready => render_status_bar(
            frame,
            area,
            "Ready",
            NEON,
            &[("[Arrows/WASD]", "Start"), ("[Enter]", "Start"), ("[Q]", "Quit")],
        ),
        GamePhase::Playing => render_status_bar(
            frame,
            area,
            if game.is_boosted() { "TURBO!" } else { "Slither!" },
            if game.is_boosted() { GOLD } else { NEON },
            &[
                ("[Arrows]", "Move"),
                ("[B]", "Boost"),
                ("[Space]", "Pause"),
                ("[Q]", "Quit"),
            ],
        ),
        GamePhase::Paused => render_status_bar(
            frame,
            area,
            "Paused",
            Color::Yellow,
            &[("[Space]", "Resume"), ("[R]", "Restart"), ("[Q]", "Quit")],
        ),
        GamePhase::GameOver => render_status_bar(
            frame,
            area,
            "Game over",
            DANGER,
            &[("[Enter]", "Play again"), ("[R]", "Reset"), ("[Q]", "Quit")],
        ),
    }
}

fn render_info_panel(frame: &mut Frame, area: Rect, game: &SnakeGame) {
    let inner = render_info_panel_frame(frame, area);
    let hud = game.hud();
    let value = Style::default().fg(Color::White);
    let bold = value.add_modifier(Modifier::BOLD);

    let boost = if hud.boost_ticks > 0 {
        format!("{} ticks", hud.boost_ticks)
    } else {
        "-".to_string()
    };

    let mut lines: Vec<Line> = vec![
        label_value("Score: ", hud.score.to_string(), bold),
        label_value("High:  ", hud.high_score.to_string(), Style::default().fg(GOLD)),
        label_value("Level: ", hud.level.to_string(), value),
        label_value("State: ", hud.phase.label().to_string(), value),
        Line::from(""),
        label_value("Speed: ", format!("{}ms", hud.interval_ms), value),
        label_value("Boost: ", boost, Style::default().fg(GOLD)),
        label_value("Length:", format!(" {}", hud.length), value),
        label_value(
            "Grid:  ",
            format!("{}x{}", game.grid.width, game.grid.height),
            value,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Legend:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    lines.push(legend_line(rgb(canvas::HEAD_COLOR), "Snake".to_string()));
    for kind in FoodKind::ALL {
        let points = match kind {
            FoodKind::Bomb => "ends run".to_string(),
            _ => format!("{:+}", kind.points()),
        };
        lines.push(legend_line(
            rgb(food_color(kind)),
            format!("{:<7}{}", kind.name(), points),
        ));
    }
    lines.push(legend_line(
        GHOST_BRIGHT,
        format!("{:<7}{:+}", "Ghost", game.config.ghost_points),
    ));
    if hud.ghost_present {
        lines.push(Line::from(Span::styled(
            " A ghost is loose!",
            Style::default().fg(GHOST_BRIGHT),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn legend_line(color: Color, text: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {FULL_BLOCK} "), Style::default().fg(color)),
        Span::styled(text, Style::default().fg(Color::DarkGray)),
    ])
}
