//! Floating panel renderer
//!
//! Draws the panel at the tracked geometry (clamped to the terminal area;
//! the tracked state itself is never clamped) and records every interactive
//! region into `LayoutAreas` for the mouse handler.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use hovercard_core::storage::PanelGeometry;

use crate::tui::app::{App, Tab};
use crate::tui::components::toast::render_toasts;
use crate::tui::theme::{parse_hex, ColorPreset, PanelPalette, BODY_PRESETS, HEADER_PRESETS};
use crate::tui::utils::{html_to_preview, truncate_ellipsis};

/// Width of the hide button zone at the right edge of the header
const HIDE_BUTTON_WIDTH: u16 = 3;

/// Launcher button size
const LAUNCHER_WIDTH: u16 = 11;
const LAUNCHER_HEIGHT: u16 = 3;

/// Render one frame
pub fn render(f: &mut Frame, app: &mut App) {
    app.layout.clear();
    let area = f.area();

    if app.panel_visible {
        render_panel(f, app, area);
    } else {
        render_launcher(f, app, area);
    }

    render_toasts(f.buffer_mut(), area, &app.toasts);
}

/// Clamp the tracked geometry into the visible area
fn panel_rect(geometry: &PanelGeometry, area: Rect) -> Rect {
    let width = geometry.size.width.min(area.width.max(1));
    let height = geometry.size.height.min(area.height.max(1));

    let max_x = i32::from(area.width.saturating_sub(width));
    let max_y = i32::from(area.height.saturating_sub(height));
    let x = geometry.position.x.clamp(0, max_x) as u16;
    let y = geometry.position.y.clamp(0, max_y) as u16;

    Rect::new(area.x + x, area.y + y, width, height)
}

fn render_panel(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = PanelPalette::resolve(&app.theme);
    let panel = panel_rect(&app.geometry, area);

    f.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.header_bg))
        .style(Style::default().bg(palette.body_bg));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    if inner.height < 3 || inner.width < 8 {
        return;
    }

    let header_row = Rect::new(inner.x, inner.y, inner.width, 1);
    let tabs_row = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    let footer_row = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    let body = Rect::new(
        inner.x,
        inner.y + 2,
        inner.width,
        inner.height.saturating_sub(3),
    );

    render_header(f, app, &palette, header_row);
    render_tabs(f, app, &palette, tabs_row);
    app.layout.body = Some(body);
    match app.active_tab {
        Tab::Decks => render_decks_tab(f, app, &palette, body),
        Tab::Study => render_study_tab(f, app, &palette, body),
        Tab::Colors => render_colors_tab(f, app, &palette, body),
    }
    render_footer(f, app, &palette, footer_row);

    // Resize handle over the bottom-right border corner
    let handle = Rect::new(panel.x + panel.width - 1, panel.y + panel.height - 1, 1, 1);
    if let Some(cell) = f.buffer_mut().cell_mut((handle.x, handle.y)) {
        cell.set_char('◢').set_fg(palette.header_bg);
    }
    app.layout.resize_handle = Some(handle);
}

fn render_header(f: &mut Frame, app: &mut App, palette: &PanelPalette, row: Rect) {
    let header_style = Style::default().bg(palette.header_bg).fg(palette.header_text);

    let title = " Hovercard";
    let mut spans = vec![Span::styled(title.to_string(), header_style.add_modifier(Modifier::BOLD))];
    let pad = row
        .width
        .saturating_sub(title.width() as u16 + HIDE_BUTTON_WIDTH);
    spans.push(Span::styled(" ".repeat(pad as usize), header_style));
    spans.push(Span::styled(" ✕ ", header_style));

    f.render_widget(Paragraph::new(Line::from(spans)), row);

    let drag_width = row.width.saturating_sub(HIDE_BUTTON_WIDTH);
    app.layout.header = Some(Rect::new(row.x, row.y, drag_width, 1));
    app.layout.hide_button = Some(Rect::new(row.x + drag_width, row.y, HIDE_BUTTON_WIDTH, 1));
}

fn render_tabs(f: &mut Frame, app: &mut App, palette: &PanelPalette, row: Rect) {
    let mut spans = vec![Span::styled(" ", Style::default())];
    let mut x = row.x + 1;

    for tab in Tab::all() {
        let label = format!(" {} ", tab.title());
        let width = label.width() as u16;

        let style = if tab == app.active_tab {
            Style::default()
                .fg(palette.header_bg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.body_text).add_modifier(Modifier::DIM)
        };

        app.layout.tabs.push((tab, Rect::new(x, row.y, width, 1)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }

    f.render_widget(Paragraph::new(Line::from(spans)), row);
}

fn render_footer(f: &mut Frame, app: &App, palette: &PanelPalette, row: Rect) {
    let geometry = &app.geometry;
    let text = format!(
        " pos: ({}, {}) · size: ({} × {})",
        geometry.position.x, geometry.position.y, geometry.size.width, geometry.size.height
    );

    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(palette.body_text).add_modifier(Modifier::DIM),
    )));
    f.render_widget(footer, row);
}

fn render_decks_tab(f: &mut Frame, app: &mut App, palette: &PanelPalette, body: Rect) {
    let text_style = Style::default().fg(palette.body_text);
    let dim = text_style.add_modifier(Modifier::DIM);

    // Search field shows the raw input; filtering lags behind the debounce
    let search = format!(" Search: {}▏", app.engine.search_input());
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(search, text_style))),
        Rect::new(body.x, body.y, body.width, 1),
    );

    let list = Rect::new(
        body.x,
        body.y + 1,
        body.width,
        body.height.saturating_sub(1),
    );

    if app.engine.is_loading() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(" Loading decks…", dim))),
            Rect::new(list.x, list.y, list.width, 1),
        );
        return;
    }

    let decks: Vec<_> = app
        .engine
        .filtered_decks()
        .into_iter()
        .cloned()
        .collect();
    if decks.is_empty() {
        let hint = if app.engine.decks().is_empty() {
            " No decks found. Is Anki running?"
        } else {
            " No decks match the search."
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, dim))),
            Rect::new(list.x, list.y, list.width, 1),
        );
        return;
    }

    app.deck_scroll = app.deck_scroll.min(decks.len().saturating_sub(1));
    let visible = list.height as usize;

    for (row_index, deck) in decks.iter().skip(app.deck_scroll).take(visible).enumerate() {
        let y = list.y + row_index as u16;
        let selected = app.engine.is_target(&deck.name);

        let marker = if selected { "●" } else { "○" };
        let marker_style = if selected {
            Style::default().fg(Color::Green)
        } else {
            dim
        };

        let stats = &deck.stats;
        let counts = format!(
            "new {} · learn {} · due {} ",
            stats.new_count, stats.learn_count, stats.review_count
        );
        let name_width = (list.width as usize).saturating_sub(counts.width() + 4);
        let name = truncate_ellipsis(&deck.name, name_width);
        let pad = (list.width as usize)
            .saturating_sub(2 + name.width() + counts.width());

        let line = Line::from(vec![
            Span::styled(format!(" {} ", marker), marker_style),
            Span::styled(name, text_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(counts, dim),
        ]);
        let row = Rect::new(list.x, y, list.width, 1);
        f.render_widget(Paragraph::new(line), row);
        app.layout.deck_rows.push((deck.name.clone(), row));
    }

    let below = decks.len().saturating_sub(app.deck_scroll + visible);
    if below > 0 {
        let indicator = format!(" ↓ {} more below", below);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(indicator, dim))),
            Rect::new(list.x, list.y + list.height - 1, list.width, 1),
        );
    }
}

fn render_study_tab(f: &mut Frame, app: &mut App, palette: &PanelPalette, body: Rect) {
    let text_style = Style::default().fg(palette.body_text);
    let dim = text_style.add_modifier(Modifier::DIM);

    let summary = format!(
        " {} cards · {} target decks",
        app.engine.cards().len(),
        app.engine.target_decks().len()
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(summary, text_style.add_modifier(Modifier::BOLD)))),
        Rect::new(body.x, body.y, body.width, 1),
    );

    let list = Rect::new(
        body.x,
        body.y + 1,
        body.width,
        body.height.saturating_sub(1),
    );

    if app.engine.target_decks().is_empty() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Select decks to study on the Decks tab.",
                dim,
            ))),
            Rect::new(list.x, list.y, list.width, 1),
        );
        return;
    }

    let cards = app.engine.cards();
    app.study_scroll = app.study_scroll.min(cards.len().saturating_sub(1));
    let visible = list.height as usize;

    for (row_index, card) in cards.iter().skip(app.study_scroll).take(visible).enumerate() {
        let preview = html_to_preview(&card.question);
        let line = format!(" • {}", truncate_ellipsis(&preview, list.width as usize - 4));
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(line, text_style))),
            Rect::new(list.x, list.y + row_index as u16, list.width, 1),
        );
    }

    let below = cards.len().saturating_sub(app.study_scroll + visible);
    if below > 0 {
        let indicator = format!(" ↓ {} more below", below);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(indicator, dim))),
            Rect::new(list.x, list.y + list.height - 1, list.width, 1),
        );
    }
}

fn render_colors_tab(f: &mut Frame, app: &mut App, palette: &PanelPalette, body: Rect) {
    let text_style = Style::default().fg(palette.body_text);
    let dim = text_style.add_modifier(Modifier::DIM);

    if body.height < 5 {
        return;
    }

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(" Header", text_style.add_modifier(Modifier::BOLD)))),
        Rect::new(body.x, body.y, body.width, 1),
    );
    let header_rects = render_swatch_row(
        f,
        &HEADER_PRESETS,
        &app.theme.header_bg,
        Rect::new(body.x, body.y + 1, body.width, 1),
    );
    app.layout.header_swatches = header_rects;

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(" Body", text_style.add_modifier(Modifier::BOLD)))),
        Rect::new(body.x, body.y + 3, body.width, 1),
    );
    let body_rects = render_swatch_row(
        f,
        &BODY_PRESETS,
        &app.theme.body_bg,
        Rect::new(body.x, body.y + 4, body.width, 1),
    );
    app.layout.body_swatches = body_rects;

    if body.height > 6 {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Click a swatch to apply. Changes are saved immediately.",
                dim,
            ))),
            Rect::new(body.x, body.y + 6, body.width, 1),
        );
    }
}

/// Render one row of color swatches, returning the hit rect per preset
fn render_swatch_row(
    f: &mut Frame,
    presets: &[ColorPreset],
    current_bg: &str,
    row: Rect,
) -> Vec<(usize, Rect)> {
    let mut spans = vec![Span::raw(" ")];
    let mut rects = Vec::new();
    let mut x = row.x + 1;

    for (index, preset) in presets.iter().enumerate() {
        let label = format!(" {} ", preset.name);
        let width = label.width() as u16;
        if x + width > row.x + row.width {
            break;
        }

        let mut style = Style::default()
            .bg(parse_hex(preset.bg).unwrap_or(Color::Reset))
            .fg(parse_hex(preset.text).unwrap_or(Color::Reset));
        if preset.bg == current_bg {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }

        rects.push((index, Rect::new(x, row.y, width, 1)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }

    f.render_widget(Paragraph::new(Line::from(spans)), row);
    rects
}

fn render_launcher(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < LAUNCHER_WIDTH + 2 || area.height < LAUNCHER_HEIGHT + 1 {
        return;
    }

    let launcher = Rect::new(
        area.x + area.width - LAUNCHER_WIDTH - 2,
        area.y + area.height - LAUNCHER_HEIGHT - 1,
        LAUNCHER_WIDTH,
        LAUNCHER_HEIGHT,
    );

    f.render_widget(Clear, launcher);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(launcher);
    f.render_widget(block, launcher);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " ▲ decks",
            Style::default().fg(Color::Cyan),
        ))),
        inner,
    );

    app.layout.launcher = Some(launcher);
}
