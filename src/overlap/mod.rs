//! Pairwise overlap detection
//!
//! Two station markers overlap when their ground distance is below the
//! distance that maps to the visual-acuity limit on screen, or below a
//! user-supplied override distance.

use crate::geo::{haversine_distance, MapView};
use crate::station::Station;
use serde::{Deserialize, Serialize};

/// An unordered pair of stations whose markers would collide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapPair {
    pub a: String,
    pub b: String,
    /// Ground distance in meters
    pub distance: f64,
}

/// Decides whether two station markers collide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapDetector {
    map: Option<MapView>,
    override_distance: Option<f64>,
}

impl OverlapDetector {
    /// Create a detector bound to a live map (or none, which disables overlap)
    pub fn new(map: Option<MapView>) -> Self {
        Self {
            map,
            override_distance: None,
        }
    }

    /// Use a fixed threshold in meters instead of the acuity-derived one
    ///
    /// Negative values mean "no override".
    pub fn with_override(mut self, distance: Option<f64>) -> Self {
        self.override_distance = distance.filter(|d| *d >= 0.0);
        self
    }

    pub fn map(&self) -> Option<MapView> {
        self.map
    }

    pub fn override_distance(&self) -> Option<f64> {
        self.override_distance
    }

    /// Threshold distance in meters, or None without a map
    pub fn threshold(&self) -> Option<f64> {
        let map = self.map?;
        Some(match self.override_distance {
            Some(distance) => distance,
            None => map.acuity_threshold(),
        })
    }

    /// Distance between two stations if both have valid coordinates
    pub fn distance(&self, a: &Station, b: &Station) -> Option<f64> {
        Some(haversine_distance(a.coordinates()?, b.coordinates()?))
    }

    /// Whether the markers of `a` and `b` would visually collide
    ///
    /// Fails closed: missing coordinates or a missing map yield `false`.
    pub fn overlaps(&self, a: &Station, b: &Station) -> bool {
        match (self.distance(a, b), self.threshold()) {
            (Some(distance), Some(threshold)) => distance < threshold,
            _ => false,
        }
    }

    /// Exhaustive pairwise scan over `stations`
    ///
    /// Returns every overlapping pair and the stations that take part in at
    /// least one pair, deduplicated and in input order.
    pub fn scan(&self, stations: &[Station]) -> (Vec<OverlapPair>, Vec<Station>) {
        let mut pairs = Vec::new();
        let mut involved = vec![false; stations.len()];

        for i in 0..stations.len() {
            for j in (i + 1)..stations.len() {
                if self.overlaps(&stations[i], &stations[j]) {
                    involved[i] = true;
                    involved[j] = true;
                    pairs.push(OverlapPair {
                        a: stations[i].api_id.clone(),
                        b: stations[j].api_id.clone(),
                        distance: self.distance(&stations[i], &stations[j]).unwrap_or_default(),
                    });
                }
            }
        }

        let overlapped = stations
            .iter()
            .zip(involved)
            .filter(|(_, hit)| *hit)
            .map(|(s, _)| s.clone())
            .collect();

        (pairs, overlapped)
    }
}
