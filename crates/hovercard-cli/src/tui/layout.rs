//! Hit regions for mouse routing
//!
//! Rects are recorded while rendering and consumed by the mouse handler on
//! the next event. Cleared at the start of every frame so hidden elements
//! can never be hit.

use ratatui::layout::Rect;

use crate::tui::app::Tab;

/// Screen areas of the interactive elements, as last rendered
#[derive(Debug, Default)]
pub struct LayoutAreas {
    /// Draggable header strip (title row, minus the hide button)
    pub header: Option<Rect>,
    /// Hide button inside the header
    pub hide_button: Option<Rect>,
    /// Resize handle glyph at the bottom-right corner
    pub resize_handle: Option<Rect>,
    /// Tab labels on the tab row
    pub tabs: Vec<(Tab, Rect)>,
    /// Deck rows on the Decks tab, with the deck name they show
    pub deck_rows: Vec<(String, Rect)>,
    /// Header color swatches on the Colors tab
    pub header_swatches: Vec<(usize, Rect)>,
    /// Body color swatches on the Colors tab
    pub body_swatches: Vec<(usize, Rect)>,
    /// Panel body (scroll routing)
    pub body: Option<Rect>,
    /// Launcher button shown while the panel is hidden
    pub launcher: Option<Rect>,
}

impl LayoutAreas {
    /// Forget last frame's regions
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Whether a point falls inside a recorded region
pub fn hit(area: Option<Rect>, x: u16, y: u16) -> bool {
    area.is_some_and(|rect| rect.contains(ratatui::layout::Position::new(x, y)))
}
