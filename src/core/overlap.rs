//! Overlap layout engine
//!
//! Assigns each region a visual stacking level so that overlapping regions
//! are drawn side by side instead of on top of each other.
//!
//! # Algorithm
//!
//! 1. Build the overlap graph: one node per region, an edge between any two
//!    regions whose intervals strictly overlap (touching endpoints do not).
//! 2. Split the graph into connected components.
//! 3. Greedy-color each component, visiting nodes by ascending start time
//!    (ties broken by id) and giving each node the smallest color unused by
//!    its already-colored neighbors.
//! 4. Publish `level = color + 1` and `num_levels = colors used`. Components
//!    needing more than [`MAX_STACKING_LEVELS`] colors wrap around with
//!    `level = color % 4 + 1` and `num_levels = 4`.
//!
//! The layout is a pure function of the region list and is recomputed in full
//! on every change.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};

use crate::constants::MAX_STACKING_LEVELS;
use crate::state::{Region, RegionId};

/// Visual stacking slot of a single region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacking {
    /// 1-based level within the component.
    pub level: usize,
    /// Number of levels the component spans.
    pub num_levels: usize,
}

impl Stacking {
    pub const SINGLE: Stacking = Stacking {
        level: 1,
        num_levels: 1,
    };
}

/// Stacking slot for every region, keyed by region id.
pub type OverlapLayout = BTreeMap<RegionId, Stacking>;

/// Raw greedy coloring of one connected component of the overlap graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentColoring {
    /// `(region id, 0-based color)` in coloring order.
    pub members: Vec<(RegionId, usize)>,
    /// Number of distinct colors used (max color + 1).
    pub num_colors: usize,
}

/// Undirected overlap graph stored as per-node adjacency lists.
/// Node `i` is `regions[i]`.
#[derive(Debug, Clone)]
pub struct OverlapGraph {
    adjacency: Vec<Vec<usize>>,
}

impl OverlapGraph {
    /// Build the graph with a start-sorted sweep: once a later region starts
    /// at or after the current region's end, no further region can overlap it.
    pub fn build(regions: &[Region]) -> Self {
        let mut adjacency = vec![Vec::new(); regions.len()];
        let mut by_start: Vec<usize> = (0..regions.len()).collect();
        by_start.sort_by(|&a, &b| regions[a].start.total_cmp(&regions[b].start));

        for (position, &i) in by_start.iter().enumerate() {
            for &j in &by_start[position + 1..] {
                if regions[j].start >= regions[i].end {
                    break;
                }
                if regions[i].overlaps(&regions[j]) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        Self { adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].contains(&b)
    }

    /// Connected components, each listed in BFS order. Components appear in
    /// order of their lowest node index.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.node_count()];
        let mut components = Vec::new();
        let mut queue = VecDeque::new();

        for root in 0..self.node_count() {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            queue.push_back(root);
            let mut component = Vec::new();
            while let Some(node) = queue.pop_front() {
                component.push(node);
                for &next in &self.adjacency[node] {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }

        components
    }
}

/// Coloring order: ascending start time, then id.
fn coloring_order(regions: &[Region], a: usize, b: usize) -> Ordering {
    regions[a]
        .start
        .total_cmp(&regions[b].start)
        .then_with(|| regions[a].id.cmp(&regions[b].id))
}

/// Greedy-color every connected component of the overlap graph.
pub fn color_components(regions: &[Region]) -> Vec<ComponentColoring> {
    let graph = OverlapGraph::build(regions);
    let mut colors: Vec<Option<usize>> = vec![None; regions.len()];

    graph
        .components()
        .into_iter()
        .map(|mut component| {
            component.sort_by(|&a, &b| coloring_order(regions, a, b));
            let mut members = Vec::with_capacity(component.len());
            let mut num_colors = 0;

            for node in component {
                let neighbors = graph.neighbors(node);
                let mut taken = vec![false; neighbors.len() + 1];
                for color in neighbors.iter().filter_map(|&n| colors[n]) {
                    if color < taken.len() {
                        taken[color] = true;
                    }
                }
                let color = taken.iter().position(|used| !used).unwrap_or(taken.len());
                colors[node] = Some(color);
                num_colors = num_colors.max(color + 1);
                members.push((regions[node].id.clone(), color));
            }

            ComponentColoring {
                members,
                num_colors,
            }
        })
        .collect()
}

/// Compute the stacking layout for a region list.
pub fn compute_layout(regions: &[Region]) -> OverlapLayout {
    let mut layout = OverlapLayout::new();

    for component in color_components(regions) {
        let capped = component.num_colors > MAX_STACKING_LEVELS;
        for (id, color) in component.members {
            let stacking = if capped {
                Stacking {
                    level: color % MAX_STACKING_LEVELS + 1,
                    num_levels: MAX_STACKING_LEVELS,
                }
            } else {
                Stacking {
                    level: color + 1,
                    num_levels: component.num_colors,
                }
            };
            layout.insert(id, stacking);
        }
    }

    tracing::debug!(regions = regions.len(), "recomputed overlap layout");
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn region(id: &str, start: f64, end: f64) -> Region {
        Region::with_id(RegionId::new(id), start, end, "a").unwrap()
    }

    fn stacking(layout: &OverlapLayout, id: &str) -> Stacking {
        layout[&RegionId::new(id)]
    }

    #[test]
    fn test_two_overlapping_and_one_isolated() {
        let regions = vec![
            region("A", 0.0, 5.0),
            region("B", 3.0, 8.0),
            region("C", 10.0, 12.0),
        ];
        let layout = compute_layout(&regions);
        assert_eq!(stacking(&layout, "A"), Stacking { level: 1, num_levels: 2 });
        assert_eq!(stacking(&layout, "B"), Stacking { level: 2, num_levels: 2 });
        assert_eq!(stacking(&layout, "C"), Stacking::SINGLE);
    }

    #[test]
    fn test_touching_regions_do_not_stack() {
        let regions = vec![region("A", 0.0, 1.0), region("B", 1.0, 2.0)];
        let layout = compute_layout(&regions);
        assert_eq!(stacking(&layout, "A"), Stacking::SINGLE);
        assert_eq!(stacking(&layout, "B"), Stacking::SINGLE);
    }

    #[test]
    fn test_chain_reuses_lowest_level() {
        // A-B and B-C overlap, A and C do not
        let regions = vec![
            region("C", 2.5, 4.0),
            region("A", 0.0, 2.0),
            region("B", 1.0, 3.0),
        ];
        let layout = compute_layout(&regions);
        assert_eq!(stacking(&layout, "A").level, 1);
        assert_eq!(stacking(&layout, "B").level, 2);
        assert_eq!(stacking(&layout, "C").level, 1);
        assert!(layout.values().all(|s| s.num_levels == 2));
    }

    #[test]
    fn test_ties_broken_by_id() {
        let regions = vec![region("y", 0.0, 2.0), region("x", 0.0, 3.0)];
        let layout = compute_layout(&regions);
        assert_eq!(stacking(&layout, "x").level, 1);
        assert_eq!(stacking(&layout, "y").level, 2);
    }

    #[test]
    fn test_five_mutually_overlapping_regions_are_capped() {
        let regions: Vec<Region> = (0..5)
            .map(|i| region(&format!("r{i}"), i as f64 * 0.1, 10.0))
            .collect();
        let colorings = color_components(&regions);
        assert_eq!(colorings.len(), 1);
        assert_eq!(colorings[0].num_colors, 5);

        let layout = compute_layout(&regions);
        for color in 0..5 {
            let s = stacking(&layout, &format!("r{color}"));
            assert_eq!(s.num_levels, 4);
            assert_eq!(s.level, color % 4 + 1);
        }
    }

    #[test]
    fn test_empty_layout() {
        assert!(compute_layout(&[]).is_empty());
    }

    fn arb_regions() -> impl Strategy<Value = Vec<Region>> {
        prop::collection::vec((0.0f64..50.0, 0.0f64..10.0), 0..40).prop_map(|spans| {
            spans
                .into_iter()
                .enumerate()
                .map(|(i, (start, length))| region(&format!("r{i:03}"), start, start + length))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_overlapping_regions_get_distinct_levels(regions in arb_regions()) {
            let layout = compute_layout(&regions);
            prop_assert_eq!(layout.len(), regions.len());

            let colorings = color_components(&regions);
            let exact: std::collections::BTreeSet<&RegionId> = colorings
                .iter()
                .filter(|c| c.num_colors <= MAX_STACKING_LEVELS)
                .flat_map(|c| c.members.iter().map(|(id, _)| id))
                .collect();

            for a in &regions {
                for b in &regions {
                    if a.id != b.id && a.overlaps(b) && exact.contains(&a.id) {
                        prop_assert_ne!(layout[&a.id].level, layout[&b.id].level);
                    }
                }
            }
            for s in layout.values() {
                prop_assert!(s.level >= 1 && s.level <= s.num_levels);
                prop_assert!(s.num_levels <= MAX_STACKING_LEVELS);
            }
        }

        #[test]
        fn prop_layout_is_deterministic(regions in arb_regions()) {
            prop_assert_eq!(compute_layout(&regions), compute_layout(&regions));
        }

        #[test]
        fn prop_removed_region_leaves_layout(regions in arb_regions(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!regions.is_empty());
            let mut regions = regions;
            let removed = regions.remove(pick.index(regions.len()));
            let layout = compute_layout(&regions);
            prop_assert!(!layout.contains_key(&removed.id));
            prop_assert_eq!(layout.len(), regions.len());
        }
    }
}
