//! Mouse event handling
//!
//! Routes clicks against the regions recorded at render time, and feeds
//! drag/resize moves to the tracker. Moves are only routed while the
//! tracker is active; release always commits the final geometry exactly
//! once.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::App;
use crate::tui::layout::hit;

impl App {
    /// Handle mouse events for dragging, resizing, clicking, and scrolling
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_left_click(mouse.column, mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.tracker.is_active() {
                    self.tracker
                        .pointer_moved(mouse.column, mouse.row, &mut self.geometry);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.finish_pointer_interaction();
            }
            MouseEventKind::ScrollUp => self.handle_scroll(mouse.column, mouse.row, -1),
            MouseEventKind::ScrollDown => self.handle_scroll(mouse.column, mouse.row, 1),
            _ => {}
        }
    }

    /// Handle left mouse click
    fn handle_left_click(&mut self, x: u16, y: u16) {
        if !self.panel_visible {
            if hit(self.layout.launcher, x, y) {
                self.toggle_panel();
            }
            return;
        }

        if hit(self.layout.hide_button, x, y) {
            self.toggle_panel();
            return;
        }

        // Tab labels sit inside the panel, above the body
        if let Some(tab) = self
            .layout
            .tabs
            .iter()
            .find(|(_, rect)| hit(Some(*rect), x, y))
            .map(|(tab, _)| *tab)
        {
            self.active_tab = tab;
            return;
        }

        // Resize handle before header: the corner cell wins
        if hit(self.layout.resize_handle, x, y) {
            self.tracker.begin_resize(x, y);
            return;
        }

        if hit(self.layout.header, x, y) {
            self.tracker.begin_drag(x, y);
            return;
        }

        if let Some(name) = self
            .layout
            .deck_rows
            .iter()
            .find(|(_, rect)| hit(Some(*rect), x, y))
            .map(|(name, _)| name.clone())
        {
            self.engine.toggle_deck(&name, &self.store);
            return;
        }

        if let Some(index) = self
            .layout
            .header_swatches
            .iter()
            .find(|(_, rect)| hit(Some(*rect), x, y))
            .map(|(index, _)| *index)
        {
            self.apply_header_preset(index);
            return;
        }

        if let Some(index) = self
            .layout
            .body_swatches
            .iter()
            .find(|(_, rect)| hit(Some(*rect), x, y))
            .map(|(index, _)| *index)
        {
            self.apply_body_preset(index);
        }
    }

    /// Pointer-up anywhere ends the interaction and persists the final
    /// geometry, once
    fn finish_pointer_interaction(&mut self) {
        if self.tracker.release() {
            self.save_geometry();
        }
    }

    /// Route scroll wheel to the list under the cursor
    fn handle_scroll(&mut self, x: u16, y: u16, delta: i32) {
        if !self.panel_visible || !hit(self.layout.body, x, y) {
            return;
        }

        let offset = match self.active_tab {
            crate::tui::app::Tab::Decks => &mut self.deck_scroll,
            crate::tui::app::Tab::Study => &mut self.study_scroll,
            crate::tui::app::Tab::Colors => return,
        };
        if delta < 0 {
            *offset = offset.saturating_sub(1);
        } else {
            *offset = offset.saturating_add(1);
        }
    }
}
