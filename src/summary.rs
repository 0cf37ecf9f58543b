//! Feature collection metadata: feature count and overall bounding box.

use serde::Serialize;
use serde_json::Value;

use crate::bbox::{BoundingBox, BoundsReducer};
use crate::geometry::Geometry;

/// Metadata computed from a GeoJSON document.
///
/// Both fields are `None` when the document is not a summarizable
/// `FeatureCollection`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub feature_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl CollectionSummary {
    pub fn is_available(&self) -> bool {
        self.feature_count.is_some()
    }
}

/// Summarize a parsed document.
///
/// Features without a usable geometry still count towards `feature_count` but
/// contribute no coordinates. A single reducer spans the whole collection.
pub fn summarize(document: &Value) -> CollectionSummary {
    let Some(features) = feature_list(document) else {
        return CollectionSummary::default();
    };

    let mut reducer = BoundsReducer::new();
    for geometry in features
        .iter()
        .filter_map(|feature| feature.get("geometry"))
        .filter_map(Geometry::from_value)
    {
        geometry.for_each_coord(&mut |coord| reducer.push(coord));
    }

    CollectionSummary {
        feature_count: Some(features.len()),
        bbox: reducer.finish(),
    }
}

fn feature_list(document: &Value) -> Option<&Vec<Value>> {
    let object = document.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return None;
    }
    object.get("features")?.as_array()
}
