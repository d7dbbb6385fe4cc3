//! The ordered feature schema shared with the remote model.

use serde::Serialize;
use serde_json::{Map, Value};

/// Number of features the prediction endpoint expects.
pub const FEATURE_COUNT: usize = 15;

/// Field order of the prediction payload.
///
/// This is a wire contract with the remote model: the `/predict` endpoint
/// consumes a bare array and relies on positions, not names. Never reorder.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "Machine",
    "DebugSize",
    "DebugRVA",
    "MajorImageVersion",
    "MajorOSVersion",
    "ExportRVA",
    "ExportSize",
    "IatVRA",
    "MajorLinkerVersion",
    "MinorLinkerVersion",
    "NumberOfSections",
    "SizeOfStackReserve",
    "DllCharacteristics",
    "ResourceSize",
    "BitcoinAddresses",
];

/// An ordered, fixed-width feature vector ready for `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Project a named feature mapping into the fixed field order.
    ///
    /// Fields the extraction stage did not return (or returned as something
    /// non-numeric) resolve to 0.
    pub fn from_named(features: &Map<String, Value>) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_ORDER) {
            if let Some(value) = features.get(name).and_then(Value::as_f64) {
                *slot = value;
            }
        }
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}
