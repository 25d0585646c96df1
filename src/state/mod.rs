//! State management module
//!
//! This module contains the core data structures of an editing session:
//! - Region: Labeled time intervals on the timeline
//! - LabelRegistry: Label display strings and their colors
//! - RegionStore: The canonical region list plus registries and layout
//! - SessionState: Cursor, transport, zoom and selection
//! - EditorSettings: Step sizes, defaults and palette

mod region;
mod labels;
mod store;
mod session;
mod settings;

pub use region::*;
pub use labels::*;
pub use store::*;
pub use session::*;
pub use settings::*;
