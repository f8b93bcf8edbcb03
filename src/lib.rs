//! gnss-nearby: overlap detection and clustering for nearby GNSS stations
//!
//! Given the stations around a focal GNSS monitoring station, decides which
//! map markers would visually collide at the reference zoom and groups them
//! into cluster icons.
//!
//! ## Features
//!
//! - Web-Mercator visual-acuity overlap threshold, or a fixed override
//! - Seed-based clustering (default) or connected-component clustering
//! - Station-metadata backend client for nearby-station queries
//! - Immutable view state advanced by a pure update function
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use gnss_nearby::geo::{Coordinates, MapView};
//! use gnss_nearby::overlap::OverlapDetector;
//! use gnss_nearby::report::{build_report, ReportInput};
//! use gnss_nearby::station::Station;
//!
//! let stations = vec![
//!     Station::new("lim.per", -12.0464, -77.0428),
//!     Station::new("lim2.per", -12.0464, -77.0428),
//!     Station::new("cus.per", -13.5320, -71.9675),
//! ];
//!
//! let map = MapView::new(Coordinates::new(-12.0464, -77.0428));
//! let detector = OverlapDetector::new(Some(map));
//! let report = build_report(ReportInput::new(&stations, detector));
//!
//! assert_eq!(report.clusters.len(), 1);
//! assert_eq!(report.markers.len(), 1);
//! ```

pub mod cli;
pub mod client;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod overlap;
pub mod report;
pub mod server;
pub mod station;
pub mod view;

// Re-export commonly used types
pub use cluster::{Cluster, ClusterStrategy};
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{Coordinates, MapView};
pub use overlap::OverlapDetector;
pub use report::OverlapReport;
pub use station::Station;
