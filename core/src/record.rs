//! Decoded tracker records as delivered by the primitive decoder.
//!
//! A record is the event kind tag, its frame, the replay build and an ordered
//! list of primitive values whose shape depends on the kind.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::events::{EventKind, Location};
use crate::version::VersionPolicy;

/// One primitive slot of a tracker record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Array(Vec<Value>),
    Blob(Blob),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Blob(Blob(s.as_bytes().to_vec()))
    }
}

impl From<Vec<i64>> for Value {
    fn from(values: Vec<i64>) -> Self {
        Value::Array(values.into_iter().map(Value::Int).collect())
    }
}

/// Raw bytes of a string field. Text is only validated when a decoder reads it.
///
/// Serialized as a JSON string when the bytes are UTF-8, otherwise as
/// `{"blob": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BlobRepr", into = "BlobRepr")]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BlobRepr {
    Text(String),
    Raw { blob: Vec<u8> },
}

impl From<BlobRepr> for Blob {
    fn from(repr: BlobRepr) -> Self {
        match repr {
            BlobRepr::Text(s) => Blob(s.into_bytes()),
            BlobRepr::Raw { blob } => Blob(blob),
        }
    }
}

impl From<Blob> for BlobRepr {
    fn from(blob: Blob) -> Self {
        match String::from_utf8(blob.0) {
            Ok(s) => BlobRepr::Text(s),
            Err(e) => BlobRepr::Raw {
                blob: e.into_bytes(),
            },
        }
    }
}

/// A single tracker record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerRecord {
    /// Raw frame counter. May exceed 32 bits; events keep the low 32.
    pub frame: u64,
    /// Event kind tag, see [`EventKind::from_tag`].
    pub kind: u32,
    /// Build number of the replay the record came from.
    pub build: u32,
    pub data: Vec<Value>,
}

impl TrackerRecord {
    pub fn new(frame: u64, kind: EventKind, build: u32, data: Vec<Value>) -> Self {
        Self {
            frame,
            kind: kind.tag(),
            build,
            data,
        }
    }
}

/// Typed, bounds-checked access to a record's data slots.
pub(crate) struct Fields<'a> {
    kind: EventKind,
    data: &'a [Value],
}

impl<'a> Fields<'a> {
    pub(crate) fn new(kind: EventKind, data: &'a [Value]) -> Self {
        Self { kind, data }
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> TrackerError {
        TrackerError::malformed(self.kind, reason)
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn expect_len(&self, expected: usize) -> Result<()> {
        if self.data.len() == expected {
            Ok(())
        } else {
            Err(self.malformed(format!(
                "expected {} fields, got {}",
                expected,
                self.data.len()
            )))
        }
    }

    fn get(&self, idx: usize, name: &str) -> Result<&'a Value> {
        self.data
            .get(idx)
            .ok_or_else(|| self.malformed(format!("missing field `{}` at slot {}", name, idx)))
    }

    pub(crate) fn int(&self, idx: usize, name: &str) -> Result<i64> {
        match self.get(idx, name)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.malformed(format!(
                "field `{}` expected an integer, got {}",
                name,
                type_name(other)
            ))),
        }
    }

    pub(crate) fn u32(&self, idx: usize, name: &str) -> Result<u32> {
        let v = self.int(idx, name)?;
        u32::try_from(v)
            .map_err(|_| self.malformed(format!("field `{}` out of range: {}", name, v)))
    }

    /// Integer slot that the decoder may leave empty.
    pub(crate) fn opt_u32(&self, idx: usize, name: &str) -> Result<Option<u32>> {
        match self.get(idx, name)? {
            Value::Null => Ok(None),
            _ => self.u32(idx, name).map(Some),
        }
    }

    pub(crate) fn text(&self, idx: usize, name: &'static str) -> Result<&'a str> {
        match self.get(idx, name)? {
            Value::Blob(blob) => {
                std::str::from_utf8(blob.as_bytes()).map_err(|source| {
                    TrackerError::InvalidEncoding {
                        kind: self.kind,
                        field: name,
                        source,
                    }
                })
            }
            other => Err(self.malformed(format!(
                "field `{}` expected text, got {}",
                name,
                type_name(other)
            ))),
        }
    }

    pub(crate) fn ints(&self, idx: usize, name: &str) -> Result<Vec<i64>> {
        let Value::Array(items) = self.get(idx, name)? else {
            return Err(self.malformed(format!("field `{}` expected an array", name)));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Int(v) => Ok(*v),
                other => Err(self.malformed(format!(
                    "field `{}[{}]` expected an integer, got {}",
                    name,
                    i,
                    type_name(other)
                ))),
            })
            .collect()
    }

    /// Read an `(x, y)` pair and normalize it onto the post-patch grid.
    pub(crate) fn location(
        &self,
        x_idx: usize,
        y_idx: usize,
        policy: &VersionPolicy,
    ) -> Result<Location> {
        let x = self.u32(x_idx, "x")?;
        let y = self.u32(y_idx, "y")?;
        scale_location(self.kind, x, y, policy)
    }
}

pub(crate) fn scale_location(
    kind: EventKind,
    x: u32,
    y: u32,
    policy: &VersionPolicy,
) -> Result<Location> {
    match (policy.scale(x), policy.scale(y)) {
        (Some(x), Some(y)) => Ok(Location { x, y }),
        _ => Err(TrackerError::malformed(
            kind,
            format!("coordinate ({}, {}) overflows when scaled", x, y),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Int(_) => "integer",
        Value::Blob(_) => "blob",
        Value::Array(_) => "array",
    }
}
