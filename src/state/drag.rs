// Pointer drag tracking for map panning
pub const CLICK_SLOP_PX: f64 = 4.0;

#[derive(Default, Debug, Clone)]
pub struct DragState {
    pub pressed: bool,
    /// Set once the pointer travelled past the click slop; suppresses the trailing click.
    pub moved: bool,
    pub start_x: f64,
    pub start_y: f64,
    pub last_x: f64,
    pub last_y: f64,
    /// Whether the current click sequence started on a marker.
    pub marker_clicked: bool,
}

impl DragState {
    pub fn press(&mut self, x: f64, y: f64) {
        self.pressed = true;
        self.moved = false;
        self.start_x = x;
        self.start_y = y;
        self.last_x = x;
        self.last_y = y;
    }

    /// Returns the delta to pan by once the press has turned into a drag.
    pub fn drag_to(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.pressed {
            return None;
        }
        if !self.moved {
            if (x - self.start_x).hypot(y - self.start_y) <= CLICK_SLOP_PX {
                return None;
            }
            self.moved = true;
        }
        let delta = (x - self.last_x, y - self.last_y);
        self.last_x = x;
        self.last_y = y;
        Some(delta)
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// True when the last press-release ended up as a drag rather than a click.
    pub fn was_drag(&self) -> bool {
        self.moved
    }

    /// Records a click. `detail` is the browser's click count: 1 starts a new
    /// sequence, later clicks of a double-click keep an earlier marker hit
    /// even though selecting that marker recentered the map under the cursor.
    pub fn record_click(&mut self, detail: i32, hit_marker: bool) {
        if detail <= 1 {
            self.marker_clicked = hit_marker;
        } else {
            self.marker_clicked |= hit_marker;
        }
    }
}
