//! Bounding box reduction over coordinate pairs.

use geo_types::{Coord, Rect};
use serde::Serialize;

/// Axis-aligned bounding box, serialized as `[minLng, minLat, maxLng, maxLat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            Coord {
                x: bbox.min_lng,
                y: bbox.min_lat,
            },
            Coord {
                x: bbox.max_lng,
                y: bbox.max_lat,
            },
        )
    }
}

/// Running min/max accumulator.
///
/// Stays empty until the first coordinate is pushed, so an empty input is
/// distinguishable from a degenerate single-point box.
#[derive(Debug, Clone, Copy)]
pub struct BoundsReducer {
    min_lng: f64,
    min_lat: f64,
    max_lng: f64,
    max_lat: f64,
    seen: bool,
}

impl BoundsReducer {
    pub fn new() -> Self {
        Self {
            min_lng: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lng: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
            seen: false,
        }
    }

    /// Widen the running extrema to include `coord` (x = longitude, y = latitude).
    pub fn push(&mut self, coord: Coord<f64>) {
        self.seen = true;
        if coord.x < self.min_lng {
            self.min_lng = coord.x;
        }
        if coord.x > self.max_lng {
            self.max_lng = coord.x;
        }
        if coord.y < self.min_lat {
            self.min_lat = coord.y;
        }
        if coord.y > self.max_lat {
            self.max_lat = coord.y;
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.seen
    }

    /// The box over everything pushed so far, or `None` if nothing was pushed.
    pub fn finish(&self) -> Option<BoundingBox> {
        if !self.seen {
            return None;
        }
        Some(BoundingBox::new(
            self.min_lng,
            self.min_lat,
            self.max_lng,
            self.max_lat,
        ))
    }
}

impl Default for BoundsReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Coord<f64>> for BoundsReducer {
    fn extend<I: IntoIterator<Item = Coord<f64>>>(&mut self, iter: I) {
        for coord in iter {
            self.push(coord);
        }
    }
}

/// Compute the bounding box of a coordinate sequence.
pub fn bounding_box<I>(coords: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = Coord<f64>>,
{
    let mut reducer = BoundsReducer::new();
    reducer.extend(coords);
    reducer.finish()
}
