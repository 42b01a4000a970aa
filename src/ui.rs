//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the TUI using `ratatui` and reports where each track
//! card and scrubber strip ended up, so pointer events can be mapped back.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{self, App, Bar, HitMap, PlaybackState, ScrubHit};
use crate::audio::PlaybackInfo;
use crate::catalog::{AudioSource, BAR_COUNT, Track};
use crate::config::Settings;

/// Rows per card: border, two rows of bars, time labels, border.
const CARD_HEIGHT: u16 = 5;
const STRIP_ROWS: usize = 2;
const BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter/space/p", "play/pause selected");
    // H/L is filled dynamically from config.
    map.insert("click/drag", "seek active track");
    map.insert("K", "metadata");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    let order = ["j/k", "gg/G", "enter/space/p", "H/L", "click/drag", "K", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{seek_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn status_text(app: &App, info: &PlaybackInfo, settings: &Settings) -> String {
    let mut parts: Vec<String> = Vec::new();

    match info.active.and_then(|id| app.catalog.get(id)) {
        Some(track) => {
            let state = match app.playback {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused | PlaybackState::Stopped => "Paused",
            };
            parts.push(format!(
                " Song: {} [{} / {}]",
                track.title,
                app::elapsed_label(track, info),
                app::total_label(track, info)
            ));
            parts.push(state.to_string());
        }
        None => parts.push(" Stopped".to_string()),
    }

    let view = if app.viewport_visible(info) {
        "VIEW: visible"
    } else {
        "VIEW: hidden"
    };
    parts.push(view.to_string());

    if settings.audio.low_power {
        parts.push(format!(
            "LOW POWER: {}ms",
            settings.audio.sampling_interval_ms()
        ));
    }
    if app.scrub.is_scrubbing() {
        parts.push("SCRUBBING".to_string());
    }

    parts.join(" • ")
}

/// Split a bar height over `STRIP_ROWS` rows of eighth blocks, top row first.
fn bar_cells(height: f32) -> [char; STRIP_ROWS] {
    let steps = 8 * STRIP_ROWS;
    let level = (height.clamp(0.0, 1.0) * steps as f32).round() as usize;
    std::array::from_fn(|row| {
        let floor = (STRIP_ROWS - 1 - row) * 8;
        BLOCKS[level.saturating_sub(floor).min(8)]
    })
}

fn strip_lines(bars: &[Bar; BAR_COUNT], cell: u16) -> Vec<Line<'static>> {
    let played = Style::default().fg(Color::Cyan);
    let unplayed = Style::default().fg(Color::DarkGray);
    let cell = usize::from(cell.max(1));

    (0..STRIP_ROWS)
        .map(|row| {
            let spans: Vec<Span> = bars
                .iter()
                .map(|bar| {
                    let ch = bar_cells(bar.height)[row];
                    let mut text: String = std::iter::repeat_n(ch, cell.saturating_sub(1).max(1)).collect();
                    if cell > 1 {
                        text.push(' ');
                    }
                    Span::styled(text, if bar.played { played } else { unplayed })
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Place the strip inside `row`: whole cells per bar, left aligned. `None`
/// when the row cannot give every bar a column.
fn strip_layout(row: Rect) -> Option<(Rect, u16)> {
    let bars = BAR_COUNT as u16;
    if row.width < bars {
        return None;
    }
    let cell = row.width / bars;
    Some((Rect { width: cell * bars, ..row }, cell))
}

/// Draw one card into `area` and return the strip's hit area. A card too
/// narrow for the full strip draws clipped bars and takes no clicks.
fn draw_card(
    frame: &mut Frame,
    app: &App,
    track: &Track,
    info: &PlaybackInfo,
    area: Rect,
) -> Option<ScrubHit> {
    let selected = app.selected_id() == Some(track.id);
    let active = info.is_active(track.id);

    let marker = match (active, info.playing) {
        (true, true) => "▶ ",
        (true, false) => "⏸ ",
        _ => "",
    };
    let title = format!(" {marker}{} · {} ", track.title, track.bpm_label);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1));
    if selected {
        block = block.border_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STRIP_ROWS as u16), Constraint::Length(1)])
        .split(inner);

    let layout = strip_layout(rows[0]);
    let (strip_area, cell) = layout.unwrap_or((rows[0], 1));
    let bars = app::bars(track, info);
    frame.render_widget(Paragraph::new(strip_lines(&bars, cell)), strip_area);

    let labels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(Rect {
            width: strip_area.width,
            ..rows[1]
        });
    frame.render_widget(Paragraph::new(app::elapsed_label(track, info)), labels[0]);
    frame.render_widget(
        Paragraph::new(app::total_label(track, info)).alignment(Alignment::Right),
        labels[1],
    );

    layout.map(|(area, _)| ScrubHit {
        track: track.id,
        area,
    })
}

fn metadata_text(track: &Track, info: &PlaybackInfo) -> String {
    let source = match &track.source {
        AudioSource::File(p) => p.display().to_string(),
        AudioSource::Remote(uri) => uri.clone(),
    };
    format!(
        "Title: {}\nId: {}\nBPM: {}\nDuration: {}\nCover: {}\nSource: {}",
        track.title,
        track.id,
        track.bpm_label,
        app::total_label(track, info),
        track.cover.as_deref().unwrap_or("-"),
        source
    )
}

/// Render the entire UI into `frame`. Returns where the cards were drawn.
pub fn draw(frame: &mut Frame, app: &App, info: &PlaybackInfo, settings: &Settings) -> HitMap {
    let footer_height = if settings.ui.show_controls { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(footer_height),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" trackdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app, info, settings))
        .block(Block::bordered().title(" status "))
        .wrap(Wrap { trim: true });
    let status_par = if app.playback == PlaybackState::Playing {
        status_par.bold()
    } else {
        status_par
    };
    frame.render_widget(status_par, chunks[1]);

    // Cards, windowed around the selection.
    let mut hits = HitMap::default();
    let list_area = chunks[2];
    let total = app.catalog.len();
    let fits = usize::from(list_area.height / CARD_HEIGHT).max(1);
    let start = if total <= fits {
        0
    } else {
        let half = fits / 2;
        app.selected.saturating_sub(half).min(total - fits)
    };

    if total == 0 {
        let empty = Paragraph::new("No tracks. Add [[catalog.tracks]] or set catalog.scan_dir.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" tracks "));
        frame.render_widget(empty, list_area);
    }

    for (slot, track) in app.catalog.iter().skip(start).take(fits).enumerate() {
        let y = list_area.y + slot as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > list_area.y + list_area.height {
            break;
        }
        let area = Rect {
            x: list_area.x,
            y,
            width: list_area.width,
            height: CARD_HEIGHT,
        };
        hits.cards.push((track.id, area));
        if let Some(hit) = draw_card(frame, app, track, info, area) {
            hits.scrubbers.push(hit);
        }
    }

    // Overlay metadata popup, kept inside the card area.
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 10, list_area);
        frame.render_widget(Clear, popup_area);

        let meta = match app.selected_track() {
            Some(track) => metadata_text(track, info),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding::left(1))
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    if settings.ui.show_controls {
        let footer = Paragraph::new(controls_text(settings.controls.seek_seconds))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" controls ")
                    .padding(Padding::left(1)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(footer, chunks[3]);
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_cells_fill_bottom_row_first() {
        assert_eq!(bar_cells(0.0), [' ', ' ']);
        assert_eq!(bar_cells(0.5), [' ', '█']);
        assert_eq!(bar_cells(1.0), ['█', '█']);
        assert_eq!(bar_cells(0.75), ['▄', '█']);
        assert_eq!(bar_cells(0.15), [' ', '▂']);
    }

    #[test]
    fn controls_text_includes_seek_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] seek -/+7s"));
        assert!(text.starts_with("[j/k]"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn strip_uses_whole_cells_or_nothing() {
        let (area, cell) = strip_layout(Rect::new(3, 2, 70, 2)).unwrap();
        assert_eq!(cell, 2);
        assert_eq!(area, Rect::new(3, 2, 64, 2));

        let (area, cell) = strip_layout(Rect::new(0, 0, 32, 2)).unwrap();
        assert_eq!((area.width, cell), (32, 1));

        assert_eq!(strip_layout(Rect::new(0, 0, 31, 2)), None);
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 40, 12);
        let r = centered_rect_sized(72, 10, outer);
        assert!(r.width <= 38 && r.height <= 10);
        assert_eq!(r.x, (40 - r.width) / 2);
    }
}
