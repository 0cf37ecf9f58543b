//! Coordinate extraction over GeoJSON geometry trees.
//!
//! Geometries are read directly off a parsed `serde_json::Value` document.
//! Nothing here fails: malformed or unknown input simply yields no coordinates.

use geo_types::Coord;
use serde_json::Value;

/// A borrowed view of a GeoJSON geometry, dispatched on its `type` tag.
///
/// Coordinate-bearing variants hold the raw `coordinates` array (empty when the
/// document's payload is missing or not an array). `GeometryCollection` holds
/// the raw `geometries` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry<'a> {
    Point(&'a [Value]),
    MultiPoint(&'a [Value]),
    LineString(&'a [Value]),
    MultiLineString(&'a [Value]),
    Polygon(&'a [Value]),
    MultiPolygon(&'a [Value]),
    GeometryCollection(&'a [Value]),
    /// Unknown or missing `type` tag
    Other,
}

impl<'a> Geometry<'a> {
    /// Interpret a JSON value as a geometry. Returns `None` for anything that
    /// is not a JSON object (including `null`).
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let object = value.as_object()?;
        let kind = object.get("type").and_then(Value::as_str);

        let geometry = match kind {
            Some("GeometryCollection") => {
                Geometry::GeometryCollection(array_field(object.get("geometries")))
            }
            Some(kind) => {
                let coordinates = array_field(object.get("coordinates"));
                match kind {
                    "Point" => Geometry::Point(coordinates),
                    "MultiPoint" => Geometry::MultiPoint(coordinates),
                    "LineString" => Geometry::LineString(coordinates),
                    "MultiLineString" => Geometry::MultiLineString(coordinates),
                    "Polygon" => Geometry::Polygon(coordinates),
                    "MultiPolygon" => Geometry::MultiPolygon(coordinates),
                    _ => Geometry::Other,
                }
            }
            None => Geometry::Other,
        };

        Some(geometry)
    }

    /// Feed every coordinate pair to `sink`, in document order.
    pub fn for_each_coord<F>(&self, sink: &mut F)
    where
        F: FnMut(Coord<f64>),
    {
        match *self {
            Geometry::Point(raw) => {
                if let Some(coord) = pair(raw) {
                    sink(coord);
                }
            }
            Geometry::MultiPoint(raw) | Geometry::LineString(raw) => visit_nested(raw, 0, sink),
            Geometry::MultiLineString(raw) | Geometry::Polygon(raw) => visit_nested(raw, 1, sink),
            Geometry::MultiPolygon(raw) => visit_nested(raw, 2, sink),
            Geometry::GeometryCollection(children) => {
                for child in children.iter().filter_map(Geometry::from_value) {
                    child.for_each_coord(sink);
                }
            }
            Geometry::Other => {}
        }
    }

    /// Collect every coordinate pair, in document order.
    pub fn coords(&self) -> Vec<Coord<f64>> {
        let mut out = Vec::new();
        self.for_each_coord(&mut |coord| out.push(coord));
        out
    }
}

/// Extract all `(longitude, latitude)` pairs from an optional geometry value.
pub fn extract_coords(geometry: Option<&Value>) -> Vec<Coord<f64>> {
    geometry
        .and_then(Geometry::from_value)
        .map(|g| g.coords())
        .unwrap_or_default()
}

fn array_field(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Read `[lng, lat, ..]`. Anything past the second element (altitude) is ignored.
fn pair(raw: &[Value]) -> Option<Coord<f64>> {
    let x = raw.first()?.as_f64()?;
    let y = raw.get(1)?.as_f64()?;
    Some(Coord { x, y })
}

// depth 0: `values` is a list of positions
fn visit_nested<F>(values: &[Value], depth: u8, sink: &mut F)
where
    F: FnMut(Coord<f64>),
{
    for value in values.iter().filter_map(Value::as_array) {
        if depth == 0 {
            if let Some(coord) = pair(value) {
                sink(coord);
            }
        } else {
            visit_nested(value, depth - 1, sink);
        }
    }
}
