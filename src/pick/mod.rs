//! Click picking: nearest-point search, the preview/commit protocol and
//! forwarding commits to the case action.

pub mod click;
pub mod dispatch;
pub mod resolver;

pub use click::{ClickEvent, ClickState, Transition, handle_click};
pub use dispatch::{ActionDispatcher, CaseAction, DispatchContext, DispatchInstruction};
pub use resolver::{AxisKind, AxisScale, AxisScales, ClickPoint, find_nearest};
