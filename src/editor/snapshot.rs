use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::overlap::OverlapLayout;
use crate::state::{LabelKey, Region, RegionId};

/// Everything the rendering surface mirrors, taken after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub regions: Vec<Region>,
    pub labels: BTreeMap<LabelKey, String>,
    pub colors: BTreeMap<LabelKey, String>,
    pub overlap: OverlapLayout,
    pub active_region: Option<RegionId>,
    pub active_label: LabelKey,
    pub cursor_time: f64,
    pub playing: bool,
    pub zoom: i32,
}
