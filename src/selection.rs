//! Whether the transform handles are attached to the photo layer.

/// What a pointer landed on, topmost first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// A corner resize anchor of the transformer.
    Anchor(Anchor),
    /// The rotation handle of the transformer.
    RotateHandle,
    /// The name text box.
    Name,
    /// The visible (unclipped) part of the photo.
    Photo,
    /// The template artwork.
    Background,
}

/// Corner resize anchors. Edge anchors are not offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomRight,
        Anchor::BottomLeft,
    ];

    /// Index into [`crate::TransformBox::corners`].
    pub fn corner_index(self) -> usize {
        match self {
            Anchor::TopLeft => 0,
            Anchor::TopRight => 1,
            Anchor::BottomRight => 2,
            Anchor::BottomLeft => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SelectionState {
    Selected,
    #[default]
    Unselected,
}

impl SelectionState {
    /// Apply a click, tap, or drag start on `target`.
    ///
    /// Only the photo selects and only the background deselects; handles and the name text leave
    /// the state alone.
    pub fn on_pointer(self, target: PointerTarget) -> Self {
        match target {
            PointerTarget::Photo => SelectionState::Selected,
            PointerTarget::Background => SelectionState::Unselected,
            PointerTarget::Anchor(_) | PointerTarget::RotateHandle | PointerTarget::Name => self,
        }
    }

    pub fn is_selected(self) -> bool {
        self == SelectionState::Selected
    }
}
