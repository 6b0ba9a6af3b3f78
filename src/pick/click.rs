//! Two-phase click protocol
//!
//! The first click on a point previews it; clicking the same point again
//! commits it. Clicking a different point starts a new preview instead.
//! The state is a plain value handed in and returned, so the protocol can be
//! driven without a live display.

use super::resolver::{AxisScales, ClickPoint, find_nearest};
use crate::error::Result;
use crate::hist::{PlottedPointSet, PointId};

/// Where the click protocol currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickState {
    #[default]
    AwaitingFirstClick,
    PreviewShown(PointId),
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Highlight and describe the point, nothing else
    Preview(PointId),
    /// Second click on the previewed point: hand it to the case action
    Commit(PointId),
}

impl ClickState {
    /// Point shown by the current preview, if any
    pub fn last_nearest(&self) -> Option<PointId> {
        match self {
            ClickState::AwaitingFirstClick => None,
            ClickState::PreviewShown(p) => Some(*p),
        }
    }

    /// True when the next click can only preview
    pub fn is_first_click(&self) -> bool {
        matches!(self, ClickState::AwaitingFirstClick)
    }

    /// Advance on a click that resolved to `nearest`
    pub fn advance(self, nearest: PointId) -> (ClickState, Transition) {
        match self {
            ClickState::PreviewShown(p) if p == nearest => {
                (ClickState::AwaitingFirstClick, Transition::Commit(nearest))
            }
            _ => (ClickState::PreviewShown(nearest), Transition::Preview(nearest)),
        }
    }
}

/// A click delivered by the display, with the axis scaling in effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub position: ClickPoint,
    pub scales: AxisScales,
}

/// Resolve a click and advance the protocol
///
/// On error the caller keeps its previous state untouched.
pub fn handle_click(
    event: &ClickEvent,
    state: ClickState,
    points: &PlottedPointSet,
) -> Result<(ClickState, Transition)> {
    let nearest = find_nearest(event.position, points, &event.scales)?;
    Ok(state.advance(nearest))
}
