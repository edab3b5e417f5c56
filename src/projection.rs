//! projection.rs — Web-Mercator viewport over a raster basemap.
//!
//! World pixel space is 256·2^zoom pixels wide; screen coordinates are
//! measured from the top-left corner of the viewport.

use std::f64::consts::PI;

const TILE: f64 = 256.0;
const MAX_LAT: f64 = 85.051_128_78;

/// Default map centre and zoom for the dashboard.
pub const DEFAULT_CENTER: LatLng = LatLng { lat: -15.646_670, lng: -56.132_500 };
pub const DEFAULT_ZOOM: u8 = 13;

/// Margin kept between fitted markers and the viewport edge.
pub const FIT_PADDING: f64 = 40.0;

/// Label-free basemap: points-of-interest labels are not drawn.
pub const DEFAULT_TILE_URL: &str =
    "https://a.basemaps.cartocdn.com/rastertiles/voyager_nolabels/{z}/{x}/{y}.png";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Position of one basemap tile on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub url:  String,
    pub left: f64,
    pub top:  f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom:   u8,
    pub width:  u32,
    pub height: u32,
}

impl Viewport {
    pub fn default_for(width: u32, height: u32) -> Self {
        Self { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM, width, height }
    }

    /// The default view when it already shows every point; otherwise the
    /// closest zoom (never past the default) that frames all of them.
    pub fn fit(points: &[LatLng], width: u32, height: u32) -> Self {
        let default = Self::default_for(width, height);
        if points.iter().all(|&p| {
            let (x, y) = default.to_screen(p);
            default.contains(x, y)
        }) {
            return default;
        }

        for zoom in (0..=DEFAULT_ZOOM).rev() {
            let trial = Self { zoom, ..default };
            let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
            let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
            for &p in points {
                let (x, y) = trial.world(p);
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
            let fits = x1 - x0 <= f64::from(width) - 2.0 * FIT_PADDING
                && y1 - y0 <= f64::from(height) - 2.0 * FIT_PADDING;
            if fits || zoom == 0 {
                let center = trial.from_world((x0 + x1) / 2.0, (y0 + y1) / 2.0);
                return Self { center, ..trial };
            }
        }
        default
    }

    fn world_size(&self) -> f64 {
        TILE * f64::from(1u32 << self.zoom.min(22))
    }

    /// Geographic coordinate → world pixel at the current zoom.
    #[inline]
    fn world(&self, p: LatLng) -> (f64, f64) {
        let size = self.world_size();
        let lat = p.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
        let x = (p.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    /// World pixel → geographic coordinate.
    fn from_world(&self, x: f64, y: f64) -> LatLng {
        let size = self.world_size();
        let lng = x / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
        LatLng { lat, lng }
    }

    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = self.world(self.center);
        (cx - f64::from(self.width) / 2.0, cy - f64::from(self.height) / 2.0)
    }

    /// Geographic coordinate → screen pixel.
    pub fn to_screen(&self, p: LatLng) -> (f64, f64) {
        let (wx, wy) = self.world(p);
        let (ox, oy) = self.origin();
        (wx - ox, wy - oy)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=f64::from(self.width)).contains(&x) && (0.0..=f64::from(self.height)).contains(&y)
    }

    /// Basemap tiles covering the viewport, with their screen offsets.
    pub fn tiles(&self, template: &str) -> Vec<Tile> {
        let (ox, oy) = self.origin();
        let n = 1i64 << self.zoom.min(22);
        let x0 = (ox / TILE).floor() as i64;
        let y0 = (oy / TILE).floor() as i64;
        let x1 = ((ox + f64::from(self.width)) / TILE).ceil() as i64 - 1;
        let y1 = ((oy + f64::from(self.height)) / TILE).ceil() as i64 - 1;

        let mut tiles = Vec::new();
        for ty in y0.max(0)..=y1.min(n - 1) {
            for tx in x0..=x1 {
                // wrap horizontally across the antimeridian
                let wrapped = tx.rem_euclid(n);
                let url = template
                    .replace("{z}", &self.zoom.to_string())
                    .replace("{x}", &wrapped.to_string())
                    .replace("{y}", &ty.to_string());
                tiles.push(Tile {
                    url,
                    left: tx as f64 * TILE - ox,
                    top:  ty as f64 * TILE - oy,
                });
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_middle_of_screen() {
        let vp = Viewport::default_for(800, 600);
        let (x, y) = vp.to_screen(DEFAULT_CENTER);
        assert!((x - 400.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn north_is_up_east_is_right() {
        let vp = Viewport::default_for(800, 600);
        let (x, y) = vp.to_screen(LatLng { lat: DEFAULT_CENTER.lat + 0.01, lng: DEFAULT_CENTER.lng + 0.01 });
        assert!(x > 400.0);
        assert!(y < 300.0);
    }

    #[test]
    fn world_round_trips() {
        let vp = Viewport::default_for(800, 600);
        let (x, y) = vp.world(LatLng { lat: -15.85, lng: -56.13 });
        let back = vp.from_world(x, y);
        assert!((back.lat + 15.85).abs() < 1e-9);
        assert!((back.lng + 56.13).abs() < 1e-9);
    }

    #[test]
    fn fit_keeps_default_when_everything_is_visible() {
        let pts = [DEFAULT_CENTER, LatLng { lat: -15.65, lng: -56.14 }];
        assert_eq!(Viewport::fit(&pts, 1280, 800), Viewport::default_for(1280, 800));
        assert_eq!(Viewport::fit(&[], 1280, 800), Viewport::default_for(1280, 800));
    }

    #[test]
    fn fit_frames_distant_points() {
        let pts = [
            DEFAULT_CENTER,
            LatLng { lat: -15.85, lng: -56.13 },
            LatLng { lat: -15.50, lng: -55.90 },
        ];
        let vp = Viewport::fit(&pts, 1280, 800);
        assert!(vp.zoom < DEFAULT_ZOOM);
        for p in pts {
            let (x, y) = vp.to_screen(p);
            assert!(vp.contains(x, y), "{p:?} at ({x}, {y})");
            assert!(x >= FIT_PADDING - 1e-6 && y >= FIT_PADDING - 1e-6);
        }
    }

    #[test]
    fn fit_centres_a_single_far_point() {
        let far = LatLng { lat: 0.0, lng: 0.0 };
        let vp = Viewport::fit(&[far], 800, 600);
        assert_eq!(vp.zoom, DEFAULT_ZOOM);
        let (x, y) = vp.to_screen(far);
        assert!((x - 400.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_zero_world_is_one_tile() {
        let vp = Viewport { center: LatLng { lat: 0.0, lng: 0.0 }, zoom: 0, width: 256, height: 256 };
        let (x, y) = vp.to_screen(LatLng { lat: 0.0, lng: -180.0 });
        assert!((x - 0.0).abs() < 1e-6);
        assert!((y - 128.0).abs() < 1e-6);
        let tiles = vp.tiles("t/{z}/{x}/{y}");
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].url, "t/0/0/0");
    }

    #[test]
    fn tiles_cover_the_viewport() {
        let vp = Viewport::default_for(800, 600);
        let tiles = vp.tiles(DEFAULT_TILE_URL);
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.url.contains("/13/")));
        assert!(tiles.iter().any(|t| t.left <= 0.0 && t.top <= 0.0));
        assert!(tiles.iter().any(|t| t.left + TILE >= 800.0 && t.top + TILE >= 600.0));
    }
}
