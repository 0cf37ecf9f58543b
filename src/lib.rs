//! geo-api - serves world and per-country boundary data over HTTP
//!
//! The core (`geometry`, `bbox`, `summary`) computes feature counts and
//! bounding boxes over parsed GeoJSON and performs no I/O. `data` and `api`
//! provide the file lookup and HTTP layers around it.

pub mod api;
pub mod bbox;
pub mod config;
pub mod data;
pub mod geometry;
pub mod summary;

pub use bbox::{bounding_box, BoundingBox, BoundsReducer};
pub use geometry::{extract_coords, Geometry};
pub use summary::{summarize, CollectionSummary};
