use std::collections::HashSet;

use super::{LabelKey, LabelRegistry, Region, RegionId, RegionPatch};
use crate::core::overlap::{compute_layout, OverlapLayout};
use crate::error::{EditorError, Result};

/// Canonical region list plus the label/color registries.
///
/// Every mutation re-registers missing labels and recomputes the overlap
/// layout before returning, so readers never see a stale layout.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
    labels: LabelRegistry,
    layout: OverlapLayout,
}

impl RegionStore {
    /// Create an empty store whose labels draw colors from `palette`.
    pub fn with_palette(palette: Vec<String>) -> Self {
        Self {
            regions: Vec::new(),
            labels: LabelRegistry::with_palette(palette),
            layout: OverlapLayout::new(),
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn layout(&self) -> &OverlapLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Find a region by ID
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.get(id).is_some()
    }

    /// Regions ordered by `(start, end)` ascending, for forward navigation.
    pub fn sorted_by_start(&self) -> Vec<&Region> {
        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
        sorted
    }

    /// Regions ordered by `(end, start)` ascending, for backward navigation.
    pub fn sorted_by_end(&self) -> Vec<&Region> {
        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by(|a, b| a.end.total_cmp(&b.end).then(a.start.total_cmp(&b.start)));
        sorted
    }

    /// Create a region with a fresh id. Unknown labels register with
    /// themselves as display text.
    pub fn create(&mut self, start: f64, end: f64, label: impl Into<LabelKey>) -> Result<RegionId> {
        let region = Region::new(start, end, label)?;
        let id = region.id.clone();
        self.regions.push(region);
        self.refresh();
        Ok(id)
    }

    /// Apply a partial update. The id never changes.
    pub fn update(&mut self, id: &RegionId, patch: &RegionPatch) -> Result<()> {
        let index = self.index_of(id)?;
        let updated = patch.apply_to(&self.regions[index])?;
        self.regions[index] = updated;
        self.refresh();
        Ok(())
    }

    /// Remove a region by ID. Missing ids are ignored.
    pub fn remove(&mut self, id: &RegionId) -> bool {
        let len = self.regions.len();
        self.regions.retain(|r| &r.id != id);
        let removed = self.regions.len() < len;
        if removed {
            self.refresh();
        }
        removed
    }

    /// Split a region at `at`. The first half keeps the original id; the
    /// second half gets a fresh id, which is returned.
    pub fn split(&mut self, id: &RegionId, at: f64) -> Result<RegionId> {
        let index = self.index_of(id)?;
        let original = &self.regions[index];
        if !original.contains_time(at) {
            return Err(EditorError::InvalidInterval {
                start: original.start,
                end: at,
            });
        }

        let second = Region::new(at, original.end, original.label.clone())?;
        let second_id = second.id.clone();
        self.regions[index].end = at;
        self.regions.insert(index + 1, second);
        self.refresh();
        Ok(second_id)
    }

    /// Replace every region at once. Either the whole list is accepted or
    /// the store is left untouched.
    pub fn replace_all(&mut self, regions: Vec<Region>) -> Result<()> {
        validate_regions(&regions)?;
        self.regions = regions;
        self.refresh();
        Ok(())
    }

    /// Replace regions and labels together, validating both before commit.
    pub(crate) fn replace_all_with_labels(
        &mut self,
        regions: Vec<Region>,
        labels: LabelRegistry,
    ) -> Result<()> {
        validate_regions(&regions)?;
        self.regions = regions;
        self.labels = labels;
        self.refresh();
        Ok(())
    }

    /// Rename the display text of a label key.
    pub fn rename_label(&mut self, key: &LabelKey, display: impl Into<String>) -> Result<()> {
        self.labels.rename(key, display)
    }

    /// Register a label key with a display string ahead of use.
    pub fn register_label(&mut self, key: LabelKey, display: impl Into<String>) -> bool {
        self.labels.register(key, display)
    }

    /// Drop all regions, labels and colors.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.labels.clear();
        self.layout.clear();
    }

    fn index_of(&self, id: &RegionId) -> Result<usize> {
        self.regions
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| EditorError::NotFound { id: id.to_string() })
    }

    /// Register labels referenced by regions (in list order) and rebuild the layout.
    fn refresh(&mut self) {
        for region in &self.regions {
            self.labels.ensure(&region.label);
        }
        self.layout = compute_layout(&self.regions);
    }
}

fn validate_regions(regions: &[Region]) -> Result<()> {
    let mut seen = HashSet::with_capacity(regions.len());
    for region in regions {
        if !region.start.is_finite() || !region.end.is_finite() || region.end < region.start {
            return Err(EditorError::ImportValidation(format!(
                "region {} has invalid interval [{}, {}]",
                region.id, region.start, region.end
            )));
        }
        if !seen.insert(&region.id) {
            return Err(EditorError::ImportValidation(format!(
                "duplicate region id {}",
                region.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::overlap::Stacking;

    #[test]
    fn test_create_registers_label_and_layout() {
        let mut store = RegionStore::default();
        let id = store.create(2.0, 2.5, "a").unwrap();
        assert!(store.labels().contains(&"a".into()));
        assert_eq!(store.labels().display(&"a".into()), Some("a"));
        assert_eq!(store.layout()[&id], Stacking::SINGLE);
    }

    #[test]
    fn test_create_rejects_inverted_interval() {
        let mut store = RegionStore::default();
        let result = store.create(3.0, 1.0, "a");
        assert!(matches!(result, Err(EditorError::InvalidInterval { .. })));
        assert!(store.is_empty());
        assert!(store.labels().is_empty());
    }

    #[test]
    fn test_update_missing_region_is_not_found() {
        let mut store = RegionStore::default();
        let result = store.update(&RegionId::new("nope"), &RegionPatch::default().end(1.0));
        assert!(matches!(result, Err(EditorError::NotFound { .. })));
    }

    #[test]
    fn test_update_recomputes_layout() {
        let mut store = RegionStore::default();
        let a = store.create(0.0, 1.0, "a").unwrap();
        let b = store.create(2.0, 3.0, "a").unwrap();
        assert_eq!(store.layout()[&b], Stacking::SINGLE);

        store.update(&a, &RegionPatch::default().end(2.5)).unwrap();
        assert_eq!(store.layout()[&a].num_levels, 2);
        assert_eq!(store.layout()[&b].num_levels, 2);
    }

    #[test]
    fn test_remove_is_noop_for_missing_id() {
        let mut store = RegionStore::default();
        let id = store.create(0.0, 1.0, "a").unwrap();
        assert!(!store.remove(&RegionId::new("missing")));
        assert_eq!(store.len(), 1);
        assert!(store.remove(&id));
        assert!(store.layout().is_empty());
    }

    #[test]
    fn test_split_keeps_first_id() {
        let mut store = RegionStore::default();
        let id = store.create(1.0, 4.0, "b").unwrap();
        let second = store.split(&id, 2.0).unwrap();

        let first = store.get(&id).unwrap();
        assert_eq!((first.start, first.end), (1.0, 2.0));
        let second = store.get(&second).unwrap();
        assert_eq!((second.start, second.end), (2.0, 4.0));
        assert_eq!(second.label.as_str(), "b");
        assert!(store.split(&id, 9.0).is_err());
    }

    #[test]
    fn test_replace_all_is_atomic() {
        let mut store = RegionStore::default();
        let kept = store.create(0.0, 1.0, "a").unwrap();

        let dup = Region::with_id(RegionId::new("x"), 0.0, 1.0, "a").unwrap();
        let result = store.replace_all(vec![dup.clone(), dup]);
        assert!(matches!(result, Err(EditorError::ImportValidation(_))));
        assert!(store.contains(&kept));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_navigation_orders_differ() {
        let mut store = RegionStore::default();
        let long = store.create(0.0, 10.0, "a").unwrap();
        let short = store.create(1.0, 2.0, "a").unwrap();

        let by_start: Vec<_> = store.sorted_by_start().iter().map(|r| r.id.clone()).collect();
        let by_end: Vec<_> = store.sorted_by_end().iter().map(|r| r.id.clone()).collect();
        assert_eq!(by_start, vec![long.clone(), short.clone()]);
        assert_eq!(by_end, vec![short, long]);
    }

    #[test]
    fn test_clear_resets_labels() {
        let mut store = RegionStore::default();
        store.create(0.0, 1.0, "a").unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.labels().is_empty());
        assert!(store.labels().colors().is_empty());
        assert!(store.layout().is_empty());
    }
}
