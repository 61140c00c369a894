//! Layout core for the linkpage editor: grid geometry, pointer gestures and
//! linear/grid mode conversion.

pub mod blocks;
pub mod document;
pub mod drag;
pub mod grid;
pub mod mode;
pub mod session;

pub use blocks::{Block, BlockType, GridLayout};
pub use document::{DocumentError, EditorMode, PageDocument};
pub use drag::{Cell, DragController, GridMetrics, LayoutChange, PointerPosition, ResizeHandle};
pub use grid::{Breakpoint, CssPlacement, GridConfig, GridPosition};
pub use session::EditorSession;
