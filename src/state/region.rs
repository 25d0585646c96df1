use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::LabelKey;
use crate::constants::REGION_ID_PREFIX;
use crate::error::{EditorError, Result};

/// Stable identifier of a region.
///
/// Ids minted by the editor carry the `wavesurfer_` prefix followed by a v4
/// UUID, so they never collide within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Mint a fresh internal id.
    pub fn generate() -> Self {
        Self(format!("{}{}", REGION_ID_PREFIX, Uuid::new_v4().simple()))
    }

    /// Wrap an id supplied from outside (import, host).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id lives in the editor's own namespace.
    pub fn is_internal(&self) -> bool {
        self.0.starts_with(REGION_ID_PREFIX)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A labeled time interval on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (never before `start`)
    pub end: f64,
    /// Unique identifier
    pub id: RegionId,
    /// Key into the label registry
    pub label: LabelKey,
}

impl Region {
    /// Create a region with a freshly generated id.
    pub fn new(start: f64, end: f64, label: impl Into<LabelKey>) -> Result<Self> {
        Self::with_id(RegionId::generate(), start, end, label)
    }

    /// Create a region with an explicit id.
    pub fn with_id(
        id: RegionId,
        start: f64,
        end: f64,
        label: impl Into<LabelKey>,
    ) -> Result<Self> {
        validate_interval(start, end)?;
        Ok(Self {
            start,
            end,
            id,
            label: label.into(),
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Strict interval overlap; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `time` lies within the closed interval `[start, end]`.
    pub fn contains_time(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Partial update of a region. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionPatch {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub label: Option<LabelKey>,
}

impl RegionPatch {
    pub fn start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn label(mut self, label: impl Into<LabelKey>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Produce the patched region, validating the resulting interval.
    pub fn apply_to(&self, region: &Region) -> Result<Region> {
        let start = self.start.unwrap_or(region.start);
        let end = self.end.unwrap_or(region.end);
        validate_interval(start, end)?;
        Ok(Region {
            start,
            end,
            id: region.id.clone(),
            label: self.label.clone().unwrap_or_else(|| region.label.clone()),
        })
    }
}

/// Reject non-finite bounds and intervals that end before they start.
pub fn validate_interval(start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || end < start {
        return Err(EditorError::InvalidInterval { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_overlap_excludes_touching() {
        let a = Region::new(0.0, 5.0, "a").unwrap();
        let b = Region::new(3.0, 8.0, "b").unwrap();
        let c = Region::new(5.0, 6.0, "c").unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // Touching endpoints
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_invalid_interval_rejected() {
        assert!(matches!(
            Region::new(2.0, 1.0, "a"),
            Err(EditorError::InvalidInterval { .. })
        ));
        assert!(Region::new(f64::NAN, 1.0, "a").is_err());
        assert!(Region::new(1.0, 1.0, "a").is_ok());
    }

    #[test]
    fn test_generated_ids_are_internal_and_unique() {
        let a = RegionId::generate();
        let b = RegionId::generate();
        assert!(a.is_internal());
        assert_ne!(a, b);
        assert!(!RegionId::new("speaker_track_7").is_internal());
    }

    #[test]
    fn test_patch_keeps_id_and_validates() {
        let region = Region::new(1.0, 2.0, "a").unwrap();
        let patched = RegionPatch::default().end(4.0).label("b").apply_to(&region).unwrap();
        assert_eq!(patched.id, region.id);
        assert_eq!(patched.end, 4.0);
        assert_eq!(patched.label.as_str(), "b");

        let bad = RegionPatch::default().start(3.0).apply_to(&region);
        assert!(matches!(bad, Err(EditorError::InvalidInterval { .. })));
    }

    #[test]
    fn test_region_serialization() {
        let region = Region::new(0.5, 1.5, "a").unwrap();
        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains("\"label\":\"a\""));
        let parsed: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, region);
    }
}
