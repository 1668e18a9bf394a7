//! Keyboard event handling
//!
//! Printable keys feed the deck search on the Decks tab; everything else is
//! panel control. Ctrl+C always quits.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Tab};

impl App {
    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('p') => self.toggle_panel(),
                _ => {}
            }
            return;
        }

        if !self.panel_visible {
            match key.code {
                // Quit from the collapsed state; any of these re-opens
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle_panel(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.toggle_panel(),
            KeyCode::Tab => self.active_tab = self.active_tab.next(),
            KeyCode::BackTab => self.active_tab = self.active_tab.prev(),
            KeyCode::Up => self.scroll_active_list(-1),
            KeyCode::Down => self.scroll_active_list(1),
            KeyCode::Char(c) if self.active_tab == Tab::Decks => {
                let mut input = self.engine.search_input().to_string();
                input.push(c);
                self.engine.update_search(&input, Instant::now());
            }
            KeyCode::Backspace if self.active_tab == Tab::Decks => {
                let mut input = self.engine.search_input().to_string();
                if input.pop().is_some() {
                    self.engine.update_search(&input, Instant::now());
                }
            }
            _ => {}
        }
    }

    /// Scroll the list on the active tab
    fn scroll_active_list(&mut self, delta: i32) {
        let offset = match self.active_tab {
            Tab::Decks => &mut self.deck_scroll,
            Tab::Study => &mut self.study_scroll,
            Tab::Colors => return,
        };
        if delta < 0 {
            *offset = offset.saturating_sub(1);
        } else {
            *offset = offset.saturating_add(1);
        }
    }
}
