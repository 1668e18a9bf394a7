//! Application state and event loop

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use hovercard_core::anki::AnkiClient;
use hovercard_core::constants::ui::TICK_INTERVAL;
use hovercard_core::storage::{PanelGeometry, PanelStore, PanelTheme};
use hovercard_core::sync::DeckSyncEngine;

use crate::tui::components::panel;
use crate::tui::components::toast::{Toast, ToastQueue};
use crate::tui::layout::LayoutAreas;
use crate::tui::state::PanelTracker;
use crate::tui::theme::{BODY_PRESETS, HEADER_PRESETS};

/// Panel tabs. The selected tab is the only tab state and is not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Decks,
    Study,
    Colors,
}

impl Tab {
    pub fn all() -> [Tab; 3] {
        [Tab::Decks, Tab::Study, Tab::Colors]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Decks => "Decks",
            Tab::Study => "Study",
            Tab::Colors => "Colors",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Decks => Tab::Study,
            Tab::Study => Tab::Colors,
            Tab::Colors => Tab::Decks,
        }
    }

    pub fn prev(&self) -> Tab {
        match self {
            Tab::Decks => Tab::Colors,
            Tab::Study => Tab::Decks,
            Tab::Colors => Tab::Study,
        }
    }
}

/// Main application state
pub struct App {
    pub(crate) store: PanelStore,
    pub(crate) engine: DeckSyncEngine,

    /// Live geometry; mutated by the tracker, committed to the store on
    /// release
    pub(crate) geometry: PanelGeometry,
    pub(crate) theme: PanelTheme,
    pub(crate) tracker: PanelTracker,

    pub(crate) panel_visible: bool,
    pub(crate) active_tab: Tab,

    pub(crate) deck_scroll: usize,
    pub(crate) study_scroll: usize,

    pub(crate) toasts: ToastQueue,
    pub(crate) layout: LayoutAreas,
    pub(crate) should_quit: bool,
}

impl App {
    /// Create the app against the default state database
    pub fn new(endpoint: &str) -> Self {
        Self::with_store(endpoint, PanelStore::open_default())
    }

    /// Create the app with a specific store. Geometry, colors, and the
    /// target deck selection are rehydrated here, before the first frame.
    pub fn with_store(endpoint: &str, store: PanelStore) -> Self {
        let geometry = store.load_geometry();
        let theme = store.load_theme();
        let targets = store.load_target_decks();

        let client = Arc::new(AnkiClient::new(endpoint));
        let engine = DeckSyncEngine::new(client, targets);

        Self {
            store,
            engine,
            geometry,
            theme,
            tracker: PanelTracker::new(),
            panel_visible: true,
            active_tab: Tab::Decks,
            deck_scroll: 0,
            study_scroll: 0,
            toasts: ToastQueue::new(),
            layout: LayoutAreas::default(),
            should_quit: false,
        }
    }

    /// Run the TUI until quit
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.engine.begin_load_decks();

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_INTERVAL);

        while !self.should_quit {
            terminal.draw(|f| panel::render(f, self))?;

            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                            self.handle_key_event(key);
                        }
                        Some(Ok(Event::Mouse(mouse))) => self.handle_mouse_event(mouse),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => warn!(error = %e, "Event stream error"),
                        None => break,
                    }
                }
                _ = ticker.tick() => self.tick(Instant::now()),
            }
        }

        // Teardown: cancel in-flight fetches and the pending debounce, then
        // hand the terminal back
        self.engine.shutdown();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Periodic work: debounce deadline, fetch results, toast expiry
    pub(crate) fn tick(&mut self, now: Instant) {
        for message in self.engine.tick(now) {
            self.toasts.push(Toast::error(message));
        }
        self.toasts.tick();
    }

    /// Show or hide the panel. In-memory geometry/theme are untouched, so
    /// re-showing renders exactly what was last visible.
    pub(crate) fn toggle_panel(&mut self) {
        self.panel_visible = !self.panel_visible;
    }

    /// Persist the current geometry snapshot
    pub(crate) fn save_geometry(&mut self) {
        if let Err(e) = self.store.save_geometry(&self.geometry) {
            warn!(error = %e, "Failed to persist panel geometry");
        }
    }

    /// Apply a header color preset and persist immediately
    pub(crate) fn apply_header_preset(&mut self, index: usize) {
        if let Some(preset) = HEADER_PRESETS.get(index) {
            self.theme.header_bg = preset.bg.to_string();
            self.theme.header_text = preset.text.to_string();
            self.save_theme();
        }
    }

    /// Apply a body color preset and persist immediately
    pub(crate) fn apply_body_preset(&mut self, index: usize) {
        if let Some(preset) = BODY_PRESETS.get(index) {
            self.theme.body_bg = preset.bg.to_string();
            self.theme.body_text = preset.text.to_string();
            self.save_theme();
        }
    }

    fn save_theme(&self) {
        if let Err(e) = self.store.save_theme(&self.theme) {
            warn!(error = %e, "Failed to persist panel colors");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::layout::Rect;

    use hovercard_core::storage::Database;

    fn test_app() -> App {
        let store = PanelStore::new(Database::in_memory().expect("Failed to create database"));
        App::with_store("http://127.0.0.1:9", store)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_header_drag_commits_final_geometry_once() {
        let mut app = test_app();
        app.layout.header = Some(Rect::new(0, 0, 60, 1));
        let initial = app.geometry.position;

        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 0));
        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 60));
        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 40));
        app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 40));

        // (30,60) then (-20,-20): net (+10,+40)
        assert_eq!(app.geometry.position.x, initial.x + 10);
        assert_eq!(app.geometry.position.y, initial.y + 40);

        // The store holds exactly the released snapshot
        assert_eq!(app.store.load_geometry(), app.geometry);
        assert!(!app.tracker.is_active());
    }

    #[test]
    fn test_moves_without_press_change_nothing() {
        let mut app = test_app();
        app.layout.header = Some(Rect::new(0, 0, 60, 1));
        let before = app.geometry;

        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 30));
        app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 30, 30));

        assert_eq!(app.geometry, before);
        // No interaction was active, so nothing was persisted
        assert_eq!(app.store.load_geometry(), PanelGeometry::default());
    }

    #[test]
    fn test_hide_show_preserves_geometry_and_theme() {
        let mut app = test_app();
        app.geometry.position.x = 17;
        app.geometry.position.y = 5;
        app.save_geometry();
        app.apply_header_preset(1);

        let geometry = app.geometry;
        let theme = app.theme.clone();

        app.toggle_panel();
        assert!(!app.panel_visible);
        app.toggle_panel();
        assert!(app.panel_visible);

        // What renders after the show equals what was persisted before the
        // hide
        assert_eq!(app.geometry, geometry);
        assert_eq!(app.theme, theme);
        assert_eq!(app.store.load_geometry(), geometry);
        assert_eq!(app.store.load_theme(), theme);
    }

    #[test]
    fn test_color_preset_persists_immediately() {
        let mut app = test_app();

        app.layout.header_swatches = vec![(0, Rect::new(1, 5, 5, 1)), (1, Rect::new(8, 5, 6, 1))];
        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 9, 5));

        assert_eq!(app.theme.header_bg, HEADER_PRESETS[1].bg);
        assert_eq!(app.store.load_theme(), app.theme);
    }
}
