// Input features and their classification.
//
// The ingestion layer hands over GeoJSON-shaped features: a free-form
// `properties` object and a `geometry` with a `type` and raw `coordinates`.
// This module reads just enough of them to decide what each feature is:
//
// - no `properties` object, or no integer `level` -> broken (the caller
//   keeps a count and moves on);
// - `door == "yes"` -> door (point geometry);
// - otherwise `stairs == "yes"` -> stair;
// - otherwise -> room.
//
// Ring coordinates are accepted either flat (`[[x, y], ...]`, as the floor
// plan exporter writes them) or as GeoJSON polygon rings
// (`[[[x, y], ...], [hole], ...]`). Levels may be numbers or integer
// strings.
//
// See also: `space.rs` for the constructors that consume a classified
// feature, `building.rs` for the broken bucket.

use crate::error::NavError;
use crate::types::{Level, Point2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureGeometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_json_str(json: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    Door,
    Stair,
    Room,
}

/// The properties the engine cares about, pulled out of a feature.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureInfo {
    pub kind: FeatureKind,
    pub level: Level,
    pub name: String,
    pub door_tag: Option<String>,
    pub stairs_tag: Option<String>,
}

pub fn classify(feature: &Feature) -> Result<FeatureInfo, NavError> {
    let props = feature
        .properties
        .as_ref()
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing properties"))?;
    let level = props
        .get("level")
        .ok_or_else(|| malformed("missing level"))
        .and_then(parse_level)?;
    let name = props
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let door_tag = tag(props, "door");
    let stairs_tag = tag(props, "stairs");

    let kind = if door_tag.as_deref() == Some("yes") {
        FeatureKind::Door
    } else if stairs_tag.as_deref() == Some("yes") {
        FeatureKind::Stair
    } else {
        FeatureKind::Room
    };
    Ok(FeatureInfo {
        kind,
        level,
        name,
        door_tag,
        stairs_tag,
    })
}

/// A door's location: `coordinates` must be `[x, y]`.
pub fn point_of(feature: &Feature) -> Result<Point2, NavError> {
    feature
        .geometry
        .as_ref()
        .and_then(|g| parse_coord(&g.coordinates))
        .ok_or_else(|| malformed("point geometry expected"))
}

/// Outer ring and hole rings of a room or stair.
pub fn rings_of(feature: &Feature) -> Result<(Vec<Point2>, Vec<Vec<Point2>>), NavError> {
    let coords = feature
        .geometry
        .as_ref()
        .map(|g| &g.coordinates)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("ring geometry expected"))?;

    let nested = coords
        .first()
        .and_then(Value::as_array)
        .and_then(|first| first.first())
        .is_some_and(Value::is_array);

    if !nested {
        let outer = parse_ring(coords).ok_or_else(|| malformed("bad ring coordinate"))?;
        return Ok((outer, Vec::new()));
    }

    let mut rings = Vec::with_capacity(coords.len());
    for ring in coords {
        let ring = ring
            .as_array()
            .and_then(|r| parse_ring(r))
            .ok_or_else(|| malformed("bad polygon ring"))?;
        rings.push(ring);
    }
    let mut rings = rings.into_iter();
    let outer = rings.next().unwrap_or_default();
    Ok((outer, rings.collect()))
}

fn malformed(reason: &str) -> NavError {
    NavError::MalformedFeature {
        reason: reason.to_string(),
    }
}

fn tag(props: &Map<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(Value::as_str).map(str::to_string)
}

fn parse_level(value: &Value) -> Result<Level, NavError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|l| Level::try_from(l).ok())
        .ok_or_else(|| malformed(&format!("level is not an integer: {value}")))
}

fn parse_coord(value: &Value) -> Option<Point2> {
    let pair = value.as_array()?;
    let x = pair.first()?.as_f64()?;
    let y = pair.get(1)?.as_f64()?;
    let p = Point2::new(x, y);
    p.is_finite().then_some(p)
}

fn parse_ring(values: &[Value]) -> Option<Vec<Point2>> {
    values.iter().map(parse_coord).collect()
}
