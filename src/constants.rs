//! Centralized constants for the gnss-nearby crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters, as used by the map widget's distance function
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// Web-Mercator screen scale constants
pub mod map {
    /// Ground resolution at the equator for zoom 0, in meters per pixel
    pub const GROUND_RESOLUTION_ZOOM0: f64 = 156_543.033_92;

    /// Zoom level the overlap threshold is evaluated at
    pub const REFERENCE_ZOOM: u8 = 16;

    /// Assumed screen density
    pub const SCREEN_DPI: f64 = 96.0;

    /// Inches per meter
    pub const INCHES_PER_METER: f64 = 39.37;

    /// Smallest on-screen separation (mm) at which two markers are told apart
    pub const VISUAL_ACUITY_MM: f64 = 3.0;
}

/// Nearby-station query limits (the radius slider)
pub mod nearby {
    /// Smallest selectable radius in kilometers
    pub const MIN_RADIUS_KM: u32 = 100;

    /// Largest selectable radius in kilometers
    pub const MAX_RADIUS_KM: u32 = 200;

    /// Slider step in kilometers
    pub const RADIUS_STEP_KM: u32 = 10;
}

/// Marker icon CSS classes
pub mod icon {
    /// Cluster containing at least one station with a data-quality problem
    pub const CLUSTER_DANGEROUS_CLASS: &str = "marker-cluster-dangerous";

    /// Cluster with no known data-quality problems
    pub const CLUSTER_NORMAL_CLASS: &str = "marker-cluster-normal";
}
