//! UI rendering for the TUI

use crate::app::{row_for_percent, wrap_text, App};
use reel_core::{CardTrack, DeckCard};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget},
    Frame,
};

const SLIDER_WIDTH: u16 = 3;
const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;
const WARNING: Color = Color::Yellow;

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let content = if app.zen_mode {
        frame.area()
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Timeline
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());
        draw_status_bar(frame, app, chunks[1]);
        chunks[0]
    };

    if app.slider_visible && content.width > SLIDER_WIDTH + 8 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(SLIDER_WIDTH)])
            .split(content);
        draw_track(frame, app, chunks[0]);
        draw_slider(frame, app, chunks[1]);
    } else {
        app.slider_area = None;
        app.arrow_back_area = None;
        app.arrow_forward_area = None;
        draw_track(frame, app, content);
    }

    if app.show_help {
        draw_help_popover(frame);
    }
}

// ==================== Track ====================

fn draw_track(frame: &mut Frame, app: &mut App, area: Rect) {
    app.track_area = Some((area.x, area.y, area.width, area.height));
    if area.width == 0 || area.height == 0 {
        return;
    }
    app.ensure_layout(area.width);

    let track = app.engine.track();
    let period = track.scroll_height();
    let position = app.rendered_position();
    let current = app.current_card_index();

    if app.deck.cards.is_empty() || period <= 0.0 {
        let empty = Paragraph::new("No cards")
            .alignment(Alignment::Center)
            .style(Style::default().fg(MUTED));
        frame.render_widget(empty, area);
        return;
    }

    // Tile the doubled track so tall viewports stay filled
    let mut base = position;
    while base < area.height as f64 {
        for (entry, &deck_idx) in track.entries().iter().enumerate() {
            let Some(top) = track.card_top(entry) else {
                continue;
            };
            let Some(card) = app.deck.cards.get(deck_idx) else {
                continue;
            };
            let y = (base + top).floor() as i64;
            let height = track.entry_height(entry) as u16;
            if y + height as i64 <= 0 || y >= area.height as i64 {
                continue;
            }
            draw_card(frame.buffer_mut(), area, y, height, card, deck_idx == current);
        }
        base += period;
    }
}

/// Render one card into a scratch buffer and copy its visible rows
fn draw_card(buf: &mut Buffer, area: Rect, y: i64, height: u16, card: &DeckCard, active: bool) {
    if height == 0 {
        return;
    }
    let border_style = if active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    };
    let title_style = if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", card.year), title_style),
        Span::styled(format!("{} ", card.title), Style::default()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .padding(Padding::horizontal(1));

    let inner_width = area.width.saturating_sub(4) as usize;
    let body: Vec<Line> = wrap_text(&card.body, inner_width)
        .into_iter()
        .map(Line::from)
        .collect();

    let mut scratch = Buffer::empty(Rect::new(0, 0, area.width, height));
    Paragraph::new(body).block(block).render(scratch.area, &mut scratch);

    for row in 0..height {
        let screen_y = y + row as i64;
        if screen_y < 0 || screen_y >= area.height as i64 {
            continue;
        }
        for col in 0..area.width {
            buf[(area.x + col, area.y + screen_y as u16)] = scratch[(col, row)].clone();
        }
    }
}

// ==================== Slider ====================

fn draw_slider(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.height < 3 {
        app.slider_area = None;
        app.arrow_back_area = None;
        app.arrow_forward_area = None;
        return;
    }

    let rail_height = area.height - 2;
    app.arrow_back_area = Some((area.x, area.y, area.width, 1));
    app.arrow_forward_area = Some((area.x, area.y + area.height - 1, area.width, 1));
    app.slider_area = Some((area.x, area.y + 1, area.width, rail_height));

    let percent = app.arbiter.slider_percent(&app.engine);
    let thumb = row_for_percent(percent, rail_height);
    let holding = app.arbiter.holding();

    let arrow_style = |held: bool| {
        if held {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        }
    };

    let mut lines = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled(
        " ▲ ",
        arrow_style(holding == Some(reel_core::Direction::Back)),
    )));
    for row in 0..rail_height {
        if row == thumb {
            lines.push(Line::from(Span::styled(" █ ", Style::default().fg(ACCENT))));
        } else {
            lines.push(Line::from(Span::styled(" │ ", Style::default().fg(MUTED))));
        }
    }
    lines.push(Line::from(Span::styled(
        " ▼ ",
        arrow_style(holding == Some(reel_core::Direction::Forward)),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

// ==================== Status bar ====================

fn draw_status_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.search_active {
        let prompt = Line::from(vec![
            Span::styled(" / ", Style::default().fg(Color::Black).bg(ACCENT)),
            Span::raw(" year or id: "),
            Span::styled(app.search_query.clone(), Style::default().fg(ACCENT)),
            Span::styled("█", Style::default().fg(MUTED)),
        ]);
        frame.render_widget(Paragraph::new(prompt), area);
        return;
    }

    let (mode, mode_style) = if app.engine.auto_scroll() {
        let flash = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            / 500)
            % 2
            == 0;
        let fg = if flash { WARNING } else { Color::Rgb(150, 130, 40) };
        (" ▶ PLAYING ".to_string(), Style::default().fg(Color::Black).bg(fg))
    } else if let Some(secs) = app.resume_countdown() {
        (
            format!(" ❚❚ PAUSED {}s ", secs),
            Style::default().fg(Color::Black).bg(MUTED),
        )
    } else {
        (" ❚❚ PAUSED ".to_string(), Style::default().fg(Color::Black).bg(MUTED))
    };

    let count = app.card_count();
    let current = app.current_card_index();
    let card_text = match app.deck.cards.get(current) {
        Some(card) => format!(" {}/{} {} · {} ", current + 1, count, card.year, card.title),
        None => " 0/0 ".to_string(),
    };

    let mut spans = vec![
        Span::styled(mode, mode_style),
        Span::styled(card_text, Style::default()),
        Span::styled(
            format!(" {:.2}/tick ", app.engine.config().base_speed),
            Style::default().fg(MUTED),
        ),
    ];
    if !app.deck.title.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", app.deck.title),
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        ));
    }

    let left = Line::from(spans);
    frame.render_widget(Paragraph::new(left), area);

    let right = match app.hint() {
        Some(hint) => Span::styled(format!(" {} ", hint), Style::default().fg(ACCENT)),
        None => Span::styled(" ? help ", Style::default().fg(MUTED)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        area,
    );
}

// ==================== Help ====================

const HELP: &[(&str, &str)] = &[
    ("space / click", "pause, resumes after a delay"),
    ("↑ k / ↓ j", "hold to scroll back / forward"),
    ("← h / → l", "previous / next card"),
    ("g / G", "first / last card"),
    ("/", "jump to a year or card id"),
    ("drag", "scrub the track, snaps on release"),
    ("slider", "scrub by position"),
    ("+ / -", "speed up / slow down"),
    ("H", "toggle pause on hover"),
    ("s", "toggle slider"),
    ("Z", "toggle zen mode"),
    ("r", "re-measure cards"),
    ("q / Esc", "quit"),
];

fn draw_help_popover(frame: &mut Frame) {
    let area = frame.area();
    let width = 52.min(area.width);
    let height = (HELP.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!(" {:<14}", key), Style::default().fg(ACCENT)),
                Span::raw(*desc),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(" Keys "),
        ),
        popup,
    );
}
