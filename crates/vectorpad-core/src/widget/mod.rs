//! Interactive state attached to shapes: selection state and handles.
//!
//! Shapes remain geometry; this module only describes how the pointer can
//! engage them.

mod handles;
mod state;

pub use handles::{Corner, CornerHandle, HandleKind};
pub use state::{EditingKind, WidgetState};
