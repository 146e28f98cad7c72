// Map viewport and Web-Mercator projection
use std::f64::consts::PI;

pub const TILE_PX: f64 = 256.0;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Visible map area: canvas size in CSS pixels plus geographic center and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            latitude: 35.85692327117018,
            longitude: 139.2924985918451,
            zoom: 4.0,
        }
    }
}

pub fn world_size(zoom: f64) -> f64 {
    TILE_PX * 2f64.powf(zoom)
}

/// Geographic coordinate to world pixels at `zoom`.
pub fn project(latitude: f64, longitude: f64, zoom: f64) -> (f64, f64) {
    let ws = world_size(zoom);
    let lat = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (longitude + 180.0) / 360.0 * ws;
    let s = lat.sin();
    let y = (0.5 - ((1.0 + s) / (1.0 - s)).ln() / (4.0 * PI)) * ws;
    (x, y)
}

/// World pixels at `zoom` back to `(latitude, longitude)`.
pub fn unproject(x: f64, y: f64, zoom: f64) -> (f64, f64) {
    let ws = world_size(zoom);
    let longitude = x / ws * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / ws;
    let latitude = n.sinh().atan().to_degrees();
    (latitude, longitude)
}

pub fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

impl Viewport {
    fn center_world(&self) -> (f64, f64) {
        project(self.latitude, self.longitude, self.zoom)
    }

    fn set_center_world(&mut self, x: f64, y: f64) {
        let (lat, lng) = unproject(x, y, self.zoom);
        self.latitude = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.longitude = wrap_longitude(lng);
    }

    /// Screen position of a geographic point, picking the world copy nearest the center.
    pub fn to_screen(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let (cx, cy) = self.center_world();
        let (px, py) = project(latitude, longitude, self.zoom);
        let ws = world_size(self.zoom);
        let mut dx = px - cx;
        if dx > ws / 2.0 {
            dx -= ws;
        } else if dx < -ws / 2.0 {
            dx += ws;
        }
        (dx + self.width / 2.0, py - cy + self.height / 2.0)
    }

    /// Geographic coordinate under a screen position.
    pub fn from_screen(&self, sx: f64, sy: f64) -> (f64, f64) {
        let (cx, cy) = self.center_world();
        let (lat, lng) = unproject(
            cx + sx - self.width / 2.0,
            cy + sy - self.height / 2.0,
            self.zoom,
        );
        (lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), wrap_longitude(lng))
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Drag the map by a screen delta; content follows the pointer.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.center_world();
        self.set_center_world(cx - dx, cy - dy);
    }

    /// Zoom by a scale factor keeping the geographic point under `(sx, sy)` fixed.
    pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let (alat, alng) = self.from_screen(sx, sy);
        self.zoom = (self.zoom + factor.log2()).clamp(MIN_ZOOM, MAX_ZOOM);
        let (ax, ay) = project(alat, alng, self.zoom);
        self.set_center_world(ax - (sx - self.width / 2.0), ay - (sy - self.height / 2.0));
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn recenter(&mut self, latitude: f64, longitude: f64) {
        self.latitude = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.longitude = wrap_longitude(longitude);
    }

    /// Marker icon edge length; icons scale with zoom.
    pub fn marker_size(&self) -> f64 {
        self.zoom * 7.0
    }

    /// Whether a screen point falls inside the icon of a marker at the given coordinate.
    /// The icon's bottom-center tip sits on the coordinate.
    pub fn marker_contains(&self, latitude: f64, longitude: f64, sx: f64, sy: f64) -> bool {
        let (mx, my) = self.to_screen(latitude, longitude);
        let size = self.marker_size();
        let left = mx - size / 2.0;
        let top = my - size;
        sx >= left && sx <= left + size && sy >= top && sy <= my
    }
}
