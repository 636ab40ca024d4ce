//! Density point features
//!
//! Converts the engine's raw `[lng, lat, id?, price?]` samples into clusterable
//! point features carrying an id and a price label.

pub mod price;

use crate::constants::density::{NO_PRICE, PRICE_CONFIDENCE_THRESHOLD};
use crate::geometry::feature::{Feature, FeatureCollection, Geometry};
use crate::geometry::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use price::format_price;

/// One raw density sample
///
/// Parsed leniently from any JSON value: a field that is missing or not a
/// number is `None`, and a non-array entry has no coordinates at all.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct RawDensitySample {
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    /// Listing identifier, already stringified
    pub id: Option<String>,
    pub price: Option<f64>,
}

impl RawDensitySample {
    /// A well-formed sample
    pub fn new(lng: f64, lat: f64, id: Option<&str>, price: Option<f64>) -> Self {
        Self {
            lng: Some(lng),
            lat: Some(lat),
            id: id.map(str::to_string),
            price,
        }
    }

    /// Both coordinates, when numeric
    pub fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lng?, self.lat?))
    }
}

impl From<Value> for RawDensitySample {
    fn from(value: Value) -> Self {
        let Value::Array(items) = value else {
            return Self::default();
        };
        let number = |index: usize| items.get(index).and_then(Value::as_f64);

        Self {
            lng: number(0),
            lat: number(1),
            id: items.get(2).and_then(stringify_id),
            price: number(3),
        }
    }
}

fn stringify_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

/// Properties of a density point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointProperties {
    /// Listing identifier, empty if unknown
    pub id: String,
    /// Price label, empty when there is no trustworthy price
    pub price: String,
}

/// Clamp low-confidence prices to the no-price sentinel
///
/// Must run before [`build_density_collection`].
pub fn normalize_prices(samples: &mut [RawDensitySample]) {
    for sample in samples.iter_mut() {
        if let Some(price) = sample.price {
            if price < PRICE_CONFIDENCE_THRESHOLD {
                sample.price = Some(NO_PRICE);
            }
        }
    }
}

/// Label for a raw price, empty below the confidence threshold
pub fn price_label(price: Option<f64>) -> String {
    match price {
        Some(p) if p >= PRICE_CONFIDENCE_THRESHOLD => format_price(p),
        _ => String::new(),
    }
}

/// Build point features from normalized samples
///
/// Samples without numeric coordinates are dropped. Order is preserved.
pub fn build_density_collection(samples: &[RawDensitySample]) -> FeatureCollection<PointProperties> {
    let features = samples
        .iter()
        .filter_map(|sample| {
            let position = sample.position()?;
            Some(Feature::new(
                Geometry::Point {
                    coordinates: position,
                },
                PointProperties {
                    id: sample.id.clone().unwrap_or_default(),
                    price: price_label(sample.price),
                },
            ))
        })
        .collect();

    FeatureCollection { features }
}
