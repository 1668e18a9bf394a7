//! Pointer interaction tracking
//!
//! One tagged state instead of `is_dragging`/`is_resizing` flags, so drag
//! and resize are mutually exclusive by construction. While active, every
//! pointer move applies the delta since the last recorded reference point
//! and then re-bases that point to the current pointer; incremental
//! tracking, so there is no drift from a stale origin.

use hovercard_core::constants::panel::{MIN_PANEL_HEIGHT, MIN_PANEL_WIDTH};
use hovercard_core::storage::PanelGeometry;

/// Current pointer interaction. `last` is the reference point in screen
/// coordinates, re-based on every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last: (i32, i32),
    },
    Resizing {
        last: (i32, i32),
    },
}

/// Drives panel drag and resize from pointer events
#[derive(Debug, Default)]
pub struct PanelTracker {
    state: DragState,
}

impl PanelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag or resize is in progress. Pointer moves are only
    /// routed here while this is true.
    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Pointer-down on the header: start dragging from this point
    pub fn begin_drag(&mut self, x: u16, y: u16) {
        self.state = DragState::Dragging {
            last: (i32::from(x), i32::from(y)),
        };
    }

    /// Pointer-down on the resize handle: start resizing from this point
    pub fn begin_resize(&mut self, x: u16, y: u16) {
        self.state = DragState::Resizing {
            last: (i32::from(x), i32::from(y)),
        };
    }

    /// Apply a pointer move. Exactly one of position or size changes,
    /// decided by the current state; size clamps to the minimums.
    pub fn pointer_moved(&mut self, x: u16, y: u16, geometry: &mut PanelGeometry) {
        let (x, y) = (i32::from(x), i32::from(y));

        match self.state {
            DragState::Idle => {}
            DragState::Dragging { last } => {
                geometry.position.x += x - last.0;
                geometry.position.y += y - last.1;
                self.state = DragState::Dragging { last: (x, y) };
            }
            DragState::Resizing { last } => {
                let width = i32::from(geometry.size.width) + (x - last.0);
                let height = i32::from(geometry.size.height) + (y - last.1);
                geometry.size.width = width.max(i32::from(MIN_PANEL_WIDTH)) as u16;
                geometry.size.height = height.max(i32::from(MIN_PANEL_HEIGHT)) as u16;
                self.state = DragState::Resizing { last: (x, y) };
            }
        }
    }

    /// Pointer-up: return to `Idle`. Returns true when an interaction was
    /// actually in progress, i.e. exactly once per drag/resize; the caller
    /// commits the geometry to storage on that edge.
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = DragState::Idle;
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovercard_core::storage::{PanelPosition, PanelSize};

    fn geometry(x: i32, y: i32, width: u16, height: u16) -> PanelGeometry {
        PanelGeometry {
            position: PanelPosition { x, y },
            size: PanelSize { width, height },
        }
    }

    #[test]
    fn test_drag_accumulates_incremental_deltas() {
        let mut tracker = PanelTracker::new();
        let mut geo = geometry(40, 12, 70, 22);

        tracker.begin_drag(100, 100);
        tracker.pointer_moved(130, 160, &mut geo);
        tracker.pointer_moved(110, 140, &mut geo);

        // (30,60) then (-20,-20): net (+10,+40)
        assert_eq!(geo.position, PanelPosition { x: 50, y: 52 });

        assert!(tracker.release());
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_release_fires_once_per_interaction() {
        let mut tracker = PanelTracker::new();

        tracker.begin_drag(5, 5);
        assert!(tracker.release(), "active release commits");
        assert!(!tracker.release(), "idle release must not commit again");
    }

    #[test]
    fn test_drag_does_not_touch_size() {
        let mut tracker = PanelTracker::new();
        let mut geo = geometry(0, 0, 70, 22);

        tracker.begin_drag(10, 10);
        tracker.pointer_moved(60, 60, &mut geo);

        assert_eq!(geo.size, PanelSize {
            width: 70,
            height: 22
        });
    }

    #[test]
    fn test_resize_clamps_to_minimums() {
        let mut tracker = PanelTracker::new();
        let mut geo = geometry(0, 0, 320, 200);

        tracker.begin_resize(500, 500);
        tracker.pointer_moved(0, 0, &mut geo);

        assert_eq!(geo.size.width, MIN_PANEL_WIDTH);
        assert_eq!(geo.size.height, MIN_PANEL_HEIGHT);
    }

    #[test]
    fn test_resize_rebases_after_clamp() {
        let mut tracker = PanelTracker::new();
        let mut geo = geometry(0, 0, 60, 20);

        // Overshoot far past the minimum, then pull back out
        tracker.begin_resize(200, 200);
        tracker.pointer_moved(0, 0, &mut geo);
        assert_eq!(geo.size.width, MIN_PANEL_WIDTH);

        // Reference point was re-based to (0,0), so growth is immediate
        tracker.pointer_moved(10, 10, &mut geo);
        assert_eq!(geo.size.width, MIN_PANEL_WIDTH + 10);
        assert_eq!(geo.size.height, MIN_PANEL_HEIGHT + 10);
    }

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let mut tracker = PanelTracker::new();
        let mut geo = geometry(3, 4, 70, 22);

        tracker.pointer_moved(50, 50, &mut geo);

        assert_eq!(geo, geometry(3, 4, 70, 22));
    }
}
