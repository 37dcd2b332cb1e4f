//! Deserialization shared by invoice and item ids.
//!
//! Ids are UUIDs, but backups from the browser-only version of the app carry
//! millisecond timestamps instead (`1709632800000`, or with a random fraction
//! for line items). Those are mapped onto the UUID space deterministically so
//! the same legacy id always yields the same UUID.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use uuid::Uuid;

/// Marks UUIDs derived from a fractional legacy id.
const FRACTIONAL_TAG: u128 = 1 << 64;

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(RecordIdVisitor)
}

fn from_legacy(id: u64) -> Uuid {
    Uuid::from_u128(u128::from(id))
}

fn from_legacy_fraction(id: f64) -> Uuid {
    Uuid::from_u128(FRACTIONAL_TAG | u128::from(id.to_bits()))
}

struct RecordIdVisitor;

impl<'de> Visitor<'de> for RecordIdVisitor {
    type Value = Uuid;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a UUID string or a non-negative numeric id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Uuid, E> {
        if let Ok(id) = Uuid::parse_str(v.trim()) {
            return Ok(id);
        }
        v.trim()
            .parse::<u64>()
            .map(from_legacy)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Uuid, E> {
        Ok(from_legacy(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Uuid, E> {
        u64::try_from(v)
            .map(from_legacy)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Uuid, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        if v.fract() == 0.0 && v <= u64::MAX as f64 {
            return Ok(from_legacy(v as u64));
        }
        Ok(from_legacy_fraction(v))
    }
}
