//! Geographic primitives
//!
//! Coordinates, great-circle distance, and the Web-Mercator screen scale used
//! to decide whether two markers would collide on screen.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::constants::map::{
    GROUND_RESOLUTION_ZOOM0, INCHES_PER_METER, REFERENCE_ZOOM, SCREEN_DPI, VISUAL_ACUITY_MM,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || self.lon < -180.0 || self.lon > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }

    /// Mean of a set of coordinates, or None when empty
    pub fn centroid<'a>(coords: impl IntoIterator<Item = &'a Coordinates>) -> Option<Coordinates> {
        let (sum_lat, sum_lon, n) = coords
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(lat, lon, n), c| (lat + c.lat, lon + c.lon, n + 1));
        if n == 0 {
            None
        } else {
            Some(Coordinates::new(sum_lat / n as f64, sum_lon / n as f64))
        }
    }
}

/// Calculate the distance between two points in meters (Haversine formula)
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lon = (p2.lon - p1.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Web-Mercator ground resolution in meters per pixel
///
/// `156543.03392 * cos(lat) / 2^zoom`
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    GROUND_RESOLUTION_ZOOM0 * lat.to_radians().cos() / 2f64.powi(zoom as i32)
}

/// Map scale denominator at a latitude and zoom for a 96 DPI screen
pub fn screen_scale(lat: f64, zoom: u8) -> f64 {
    meters_per_pixel(lat, zoom) * SCREEN_DPI * INCHES_PER_METER
}

/// Ground distance covered by the visual-acuity limit at the given scale
pub fn acuity_distance(scale: f64) -> f64 {
    (VISUAL_ACUITY_MM / 1000.0) * scale
}

/// The live map the markers are drawn on
///
/// Only the center latitude feeds the threshold. The zoom is the reference
/// zoom the threshold is evaluated at, not the zoom the user is viewing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_zoom() -> u8 {
    REFERENCE_ZOOM
}

impl MapView {
    /// A map centered on `center` at the reference zoom
    pub fn new(center: Coordinates) -> Self {
        Self {
            center,
            zoom: REFERENCE_ZOOM,
        }
    }

    /// Override the zoom used for the threshold
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Overlap threshold in meters derived from the visual-acuity limit
    pub fn acuity_threshold(&self) -> f64 {
        acuity_distance(screen_scale(self.center.lat, self.zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_distance() {
        // About 1 degree of latitude = ~111km
        let a = Coordinates::new(-12.0464, -77.0428);
        let b = Coordinates::new(-11.0464, -77.0428);

        let distance = haversine_distance(a, b);
        assert!(
            (distance - 111_195.0).abs() < 10.0,
            "Distance {} should be approximately 111195",
            distance
        );
    }

    #[test]
    fn test_haversine_identical_points() {
        let p = Coordinates::new(45.0, 9.0);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_meters_per_pixel_equator() {
        assert_relative_eq!(meters_per_pixel(0.0, 0), 156_543.033_92);
        assert_relative_eq!(meters_per_pixel(0.0, 16), 2.388_657_133_789_062_3, epsilon = 1e-9);
    }

    #[test]
    fn test_meters_per_pixel_shrinks_with_latitude() {
        let equator = meters_per_pixel(0.0, 16);
        let sixty = meters_per_pixel(60.0, 16);
        assert_relative_eq!(sixty, equator / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_acuity_threshold_at_equator() {
        let view = MapView::new(Coordinates::new(0.0, 0.0));
        // 2.3887 m/px * 96 * 39.37 * 0.003
        let expected = 2.388_657_133_789_062_3 * 96.0 * 39.37 * 0.003;
        assert_relative_eq!(view.acuity_threshold(), expected, epsilon = 1e-9);
        assert!(view.acuity_threshold() > 27.0 && view.acuity_threshold() < 27.1);
    }

    #[test]
    fn test_validate() {
        assert!(Coordinates::new(40.0, -74.0).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_centroid() {
        let coords = [Coordinates::new(0.0, 0.0), Coordinates::new(2.0, 4.0)];
        let c = Coordinates::centroid(coords.iter()).unwrap();
        assert_relative_eq!(c.lat, 1.0);
        assert_relative_eq!(c.lon, 2.0);
        assert!(Coordinates::centroid(std::iter::empty()).is_none());
    }

    #[test]
    fn test_map_view_default_zoom() {
        let view: MapView = serde_json::from_str(r#"{"center": {"lat": 1.0, "lon": 2.0}}"#).unwrap();
        assert_eq!(view.zoom, REFERENCE_ZOOM);
    }
}
