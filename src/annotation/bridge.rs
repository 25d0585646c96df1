use super::{Annotation, Segment};
use crate::error::{EditorError, Result};
use crate::state::{Region, RegionId, RegionStore};

/// Convert the store into an annotation. Track ids are region ids and labels
/// are the display strings of the region label keys.
pub fn export(store: &RegionStore) -> Annotation {
    let mut annotation = Annotation::default();
    for region in store.regions() {
        let label = store
            .labels()
            .display(&region.label)
            .unwrap_or(region.label.as_str());
        annotation.push(Segment::new(region.start, region.end), region.id.as_str(), label);
    }
    annotation
}

/// Replace the store's regions with the annotation's tracks.
///
/// - Unknown label texts get fresh keys, allocated in track order.
/// - Ids with the internal prefix are kept when track ids are unique;
///   everything else gets a fresh id.
/// - Any invalid segment rejects the whole import and leaves the store as is.
pub(crate) fn import_into(store: &mut RegionStore, annotation: &Annotation) -> Result<()> {
    for (index, track) in annotation.tracks.iter().enumerate() {
        let Segment { start, end } = track.segment;
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(EditorError::ImportValidation(format!(
                "track {} ({}) has invalid segment [{}, {}]",
                index, track.track, start, end
            )));
        }
    }

    let keep_ids = annotation.has_unique_tracks();
    if !keep_ids {
        tracing::warn!("annotation has duplicate track ids, regenerating all ids");
    }

    let mut labels = store.labels().clone();
    let mut regions = Vec::with_capacity(annotation.len());
    for track in &annotation.tracks {
        let key = labels.intern_display(&track.label);
        let candidate = RegionId::new(track.track.as_str());
        let id = if keep_ids && candidate.is_internal() {
            candidate
        } else {
            RegionId::generate()
        };
        regions.push(Region::with_id(id, track.segment.start, track.segment.end, key)?);
    }

    store.replace_all_with_labels(regions, labels)
}
