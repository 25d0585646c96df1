use std::str::FromStr;

use crate::error::EditorError;
use crate::state::LabelKey;

/// Navigation / step direction along the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Backward => -1.0,
            Direction::Forward => 1.0,
        }
    }

    /// Index offset when walking a sorted region list.
    pub fn offset(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

impl FromStr for Direction {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" | "right" | "+" => Ok(Direction::Forward),
            "backward" | "left" | "-" => Ok(Direction::Backward),
            other => Err(EditorError::UnsupportedCommand(other.to_string())),
        }
    }
}

/// Editing commands understood by the editor.
///
/// Keyboard events and command tokens both decode into these, so every
/// input source shares the same semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Sentinel; always a no-op.
    None,
    TogglePlay,
    /// Select the next region by `(start, end)`, cyclically.
    NextRegion,
    /// Select the previous region by `(end, start)`, cyclically.
    PrevRegion,
    Deselect,
    /// Switch the active label; relabels the active region if any.
    SetActiveLabel(LabelKey),
    /// Move the cursor by one step. Only valid without an active region.
    MoveCursor { direction: Direction, coarse: bool },
    /// Move the start (or end) edge of the active region by one step.
    ResizeActive {
        direction: Direction,
        coarse: bool,
        end_edge: bool,
    },
    /// Resize the active region if there is one, otherwise move the cursor.
    Nudge {
        direction: Direction,
        coarse: bool,
        end_edge: bool,
    },
    /// Adjust the zoom level by `delta` (unclamped).
    Zoom(i32),
    /// Remove the active region and select its neighbor in `direction`.
    DeleteActive(Direction),
    /// Create a region at the cursor with the active label.
    InsertRegion,
    /// Split the active region at the cursor.
    SplitActive,
}

impl Command {
    /// Parse a command token.
    ///
    /// Tokens are `name[:arg...]`, e.g. `next-region`, `label:b`,
    /// `resize-active:backward:end:coarse`. Transport (`play`, `forward`,
    /// `fast_backward`, ...) and control-bar (`insert_region`, `cut_region`,
    /// `delete_region`) tokens are accepted as well.
    pub fn parse(token: &str) -> Result<Self, EditorError> {
        let token = token.trim();
        let unsupported = || EditorError::UnsupportedCommand(token.to_string());
        let mut parts = token.split(':');
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let command = match (name, args.as_slice()) {
            ("none", []) => Command::None,
            ("toggle-play" | "play", []) => Command::TogglePlay,
            ("next-region", []) => Command::NextRegion,
            ("prev-region", []) => Command::PrevRegion,
            ("deselect", []) => Command::Deselect,
            ("label" | "set-active-label", [key]) if !key.is_empty() => {
                Command::SetActiveLabel(LabelKey::new(*key))
            }
            ("backward", []) => Command::nudge(Direction::Backward, false),
            ("forward", []) => Command::nudge(Direction::Forward, false),
            ("fast_backward", []) => Command::nudge(Direction::Backward, true),
            ("fast_forward", []) => Command::nudge(Direction::Forward, true),
            ("move-cursor", [direction, flags @ ..]) => {
                let (coarse, end_edge) = parse_flags(flags).ok_or_else(unsupported)?;
                if end_edge {
                    return Err(unsupported());
                }
                Command::MoveCursor {
                    direction: direction.parse().map_err(|_| unsupported())?,
                    coarse,
                }
            }
            ("resize-active", [direction, flags @ ..]) => {
                let (coarse, end_edge) = parse_flags(flags).ok_or_else(unsupported)?;
                Command::ResizeActive {
                    direction: direction.parse().map_err(|_| unsupported())?,
                    coarse,
                    end_edge,
                }
            }
            ("zoom-in", []) => Command::Zoom(1),
            ("zoom-out", []) => Command::Zoom(-1),
            ("delete-active", []) | ("delete_region", []) => Command::DeleteActive(Direction::Forward),
            ("delete-active", [direction]) => {
                Command::DeleteActive(direction.parse().map_err(|_| unsupported())?)
            }
            ("insert-region" | "insert_region", []) => Command::InsertRegion,
            ("split-active" | "cut_region", []) => Command::SplitActive,
            _ => return Err(unsupported()),
        };
        Ok(command)
    }

    /// Transport step: the fast variants use the coarse step on the end edge.
    fn nudge(direction: Direction, fast: bool) -> Self {
        Command::Nudge {
            direction,
            coarse: fast,
            end_edge: fast,
        }
    }
}

fn parse_flags(flags: &[&str]) -> Option<(bool, bool)> {
    let mut coarse = false;
    let mut end_edge = false;
    for flag in flags {
        match *flag {
            "coarse" => coarse = true,
            "end" => end_edge = true,
            _ => return None,
        }
    }
    Some((coarse, end_edge))
}

impl FromStr for Command {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}
