use serde::{Deserialize, Serialize};

/// Outcome of toggling a like on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeState {
    Liked,
    Unliked,
}

impl LikeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeState::Liked => "liked",
            LikeState::Unliked => "unliked",
        }
    }

    pub fn is_liked(&self) -> bool {
        matches!(self, LikeState::Liked)
    }
}
