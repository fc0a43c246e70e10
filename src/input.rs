//! Gesture commands
//!
//! The pose classifier upstream emits class labels; the game only
//! understands three canonical directions.

use std::fmt;

/// A lane-selection command from the gesture classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureCommand {
    Left,
    Center,
    Right,
}

impl GestureCommand {
    pub const ALL: [GestureCommand; 3] = [Self::Left, Self::Center, Self::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Center => "Center",
            Self::Right => "Right",
        }
    }

    /// Parse a canonical command name. Case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Left" => Some(Self::Left),
            "Center" => Some(Self::Center),
            "Right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Map a pose model class label to a command.
    ///
    /// The bundled model is trained with Korean class names; canonical
    /// English names are accepted as well.
    pub fn from_pose_label(label: &str) -> Option<Self> {
        match label.trim() {
            "왼쪽" | "왼쪽기울이기" => Some(Self::Left),
            "정면" | "차렷" => Some(Self::Center),
            "오른쪽" | "오른쪽기울이기" => Some(Self::Right),
            other => Self::parse(other),
        }
    }

    /// Lane index (0 = left, 2 = right)
    pub fn lane(&self) -> usize {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }

    pub fn from_lane(lane: usize) -> Option<Self> {
        Self::ALL.get(lane).copied()
    }
}

impl fmt::Display for GestureCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
