pub mod config;
pub mod layout;
pub mod pane;

pub use layout::{ClosedPane, LayoutError, LayoutStore, SessionId};
pub use pane::{ContentId, FocusDirection, PaneId, PaneNode, Rect, SplitDirection};
