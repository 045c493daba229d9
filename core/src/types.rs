//! Core types for keepsake
//!
//! Defines the identifiers and small value types used across the system.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{serde_as, DeserializeAs, SerializeAs, TimestampSecondsWithFrac};
use std::fmt;

use crate::error::KeepsakeError;
use crate::traits::KeepsakeResult;

/// Rejects names that cannot safely be used as a single path component
fn validate_component(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("must not be empty");
    }
    if value == "." || value == ".." {
        return Err("must not be a relative directory marker");
    }
    if value.contains(['/', '\\', '\0']) {
        return Err("must not contain path separators or NUL");
    }
    Ok(())
}

/// Stable identifier for a persisted state type.
///
/// Used verbatim as a directory name and as the snapshot file stem, so the
/// on-disk layout never depends on Rust type names.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateId(String);

impl StateId {
    pub fn new(id: impl Into<String>) -> KeepsakeResult<Self> {
        let id = id.into();
        validate_component(&id)
            .map_err(|reason| KeepsakeError::InvalidStateId(format!("{:?} {}", id, reason)))?;
        Ok(StateId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the snapshot for this state type
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl TryFrom<String> for StateId {
    type Error = KeepsakeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateId::new(value)
    }
}

impl From<StateId> for String {
    fn from(id: StateId) -> Self {
        id.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({})", self.0)
    }
}

/// Opaque schema version string, used as a directory name
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion(String);

impl SchemaVersion {
    pub fn new(version: impl Into<String>) -> KeepsakeResult<Self> {
        let version = version.into();
        validate_component(&version)
            .map_err(|reason| KeepsakeError::InvalidVersion(format!("{:?} {}", version, reason)))?;
        Ok(SchemaVersion(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = KeepsakeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SchemaVersion::new(value)
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaVersion({})", self.0)
    }
}

/// Body of the per-state `version.json` marker file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub current: SchemaVersion,
}

impl VersionInfo {
    pub fn new(current: SchemaVersion) -> Self {
        Self { current }
    }
}

/// Absolute distance from the epoch, in seconds, below which an `f64` still
/// resolves single microseconds (roughly 1833 to 2106)
pub const MAX_EXACT_SECS: i64 = 1 << 32;

fn in_exact_range(at: &DateTime<Utc>) -> bool {
    at.timestamp()
        .checked_abs()
        .map_or(false, |secs| secs < MAX_EXACT_SECS)
}

/// `serde_with` adapter writing a `DateTime<Utc>` as fractional seconds since
/// the Unix epoch, at microsecond precision.
///
/// Decoded values are rounded back to the nearest microsecond, so anything
/// written by this adapter reads back unchanged. Instants outside
/// `MAX_EXACT_SECS` are rejected in both directions.
///
/// Other conventions are a field-level choice: annotate a `DateTime<Utc>`
/// field with e.g. `#[serde_as(as = "TimestampMilliSeconds<i64>")]` instead.
pub struct EpochSeconds;

impl SerializeAs<DateTime<Utc>> for EpochSeconds {
    fn serialize_as<S: Serializer>(source: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        if !in_exact_range(source) {
            return Err(serde::ser::Error::custom(format!(
                "timestamp out of range: {}",
                source.to_rfc3339()
            )));
        }
        <TimestampSecondsWithFrac<f64> as SerializeAs<DateTime<Utc>>>::serialize_as(
            &source.trunc_subsecs(6),
            serializer,
        )
    }
}

impl<'de> DeserializeAs<'de, DateTime<Utc>> for EpochSeconds {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let at: DateTime<Utc> =
            <TimestampSecondsWithFrac<f64> as DeserializeAs<'de, DateTime<Utc>>>::deserialize_as(
                deserializer,
            )?;
        if !in_exact_range(&at) {
            return Err(serde::de::Error::custom(format!(
                "timestamp out of range: {}",
                at.to_rfc3339()
            )));
        }
        Ok(at.round_subsecs(6))
    }
}

/// UTC instant stored at microsecond precision, encoded through [`EpochSeconds`]
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde_as(as = "EpochSeconds")] DateTime<Utc>);

impl Timestamp {
    /// Truncates to microseconds; fails outside `MAX_EXACT_SECS`
    pub fn new(at: DateTime<Utc>) -> KeepsakeResult<Self> {
        if !in_exact_range(&at) {
            return Err(KeepsakeError::InvalidTimestamp(at.to_rfc3339()));
        }
        Ok(Timestamp(at.trunc_subsecs(6)))
    }

    pub fn now() -> Self {
        Timestamp(Utc::now().trunc_subsecs(6))
    }

    pub fn from_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).and_then(|at| Timestamp::new(at).ok())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = KeepsakeError;

    fn try_from(at: DateTime<Utc>) -> Result<Self, Self::Error> {
        Timestamp::new(at)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0.to_rfc3339())
    }
}
