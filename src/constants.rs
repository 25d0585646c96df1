//! Shared editor constants such as the label palette, id namespace, and default steps.

/// Cyclic label palette. Labels take colors in allocation order.
pub const LABEL_PALETTE: [&str; 8] = [
    "#ffd700",
    "#00ffff",
    "#ff00ff",
    "#00ff00",
    "#9932cc",
    "#00bfff",
    "#ff7f50",
    "#66cdaa",
];

/// Prefix carried by every region id generated inside the editor.
/// Ids without it are treated as foreign and rewritten on import.
pub const REGION_ID_PREFIX: &str = "wavesurfer_";

/// Fine / coarse step table in seconds, indexed by the coarse modifier.
pub const DEFAULT_PRECISION: [f64; 2] = [0.1, 0.5];
pub const DEFAULT_REGION_DURATION_SECONDS: f64 = 0.5;
pub const DEFAULT_ZOOM: i32 = 20;
pub const DEFAULT_ACTIVE_LABEL: &str = "a";

/// Cursor pullback applied when an end-edge resize leaves the cursor past the region.
pub const RESIZE_CURSOR_PULLBACK_SECONDS: f64 = 1.0;
/// Slack around region bounds when auto-selecting the region under the cursor.
pub const AUTO_SELECT_TOLERANCE_SECONDS: f64 = 0.01;

/// Visual stacking levels are capped here; larger overlap cliques wrap around.
pub const MAX_STACKING_LEVELS: usize = 4;
