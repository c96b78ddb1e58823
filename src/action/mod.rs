//! # Action Vocabulary
//!
//! Tagged, serializable operations delivered by UI controls. Each enum is
//! closed; unrecognized wire tags decode to an `Unknown` variant rather than
//! failing, whatever payload they carry, so producers can run ahead of
//! this crate.

pub mod filter;
pub mod query;

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

pub use filter::{CategoryValue, FilterAction};
pub use query::QueryAction;

/// Read `{ "type": <tag>, "payload"?: <data> }`, hand known tags to
/// `decode` and map every other tag to `unknown`.
pub(crate) fn decode_tagged<'de, D, T>(
    deserializer: D,
    known: &[&str],
    unknown: T,
    decode: fn(Value) -> serde_json::Result<T>,
) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let Some(tag) = raw.get("type").and_then(Value::as_str) else {
        return Err(D::Error::custom("action must be an object with a string `type`"));
    };
    if !known.contains(&tag) {
        return Ok(unknown);
    }
    decode(raw).map_err(D::Error::custom)
}
