//! Widget state definitions.

/// The UI state of a shape. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WidgetState {
    /// Normal display state - no interaction.
    #[default]
    Normal,
    /// Pointer is over the shape.
    Hovered,
    /// Shape is selected (handles visible, can be moved or resized).
    Selected,
    /// Shape is being edited in place.
    Editing(EditingKind),
}

impl WidgetState {
    /// Check if the shape is selected (either just selected or editing).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing(_))
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

/// Kind of in-place editing.
#[derive(Debug, Clone, PartialEq)]
pub enum EditingKind {
    /// Caret and selection range editing of a text block.
    Text,
}
