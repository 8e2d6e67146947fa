/// Coarse visual families. Each owns an arm in the family-arms layout and a
/// base colour that its tags jitter around.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Folder,
    App,
    Image,
    Video,
    Audio,
    Archive,
    Document,
    Text,
    Code,
    Binary,
    Other,
}

impl Family {
    pub const ALL: [Family; 11] = [
        Self::Folder,
        Self::App,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Archive,
        Self::Document,
        Self::Text,
        Self::Code,
        Self::Binary,
        Self::Other,
    ];

    /// Stable lowercase name. Layout orders arms by this string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::App => "app",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Document => "document",
            Self::Text => "text",
            Self::Code => "code",
            Self::Binary => "binary",
            Self::Other => "other",
        }
    }

    /// Base colour as (hue, saturation, value), each in [0, 1].
    pub fn base_hsv(self) -> (f32, f32, f32) {
        match self {
            Self::Folder => (0.11, 0.55, 0.95),
            Self::App => (0.78, 0.50, 0.90),
            Self::Image => (0.92, 0.55, 0.95),
            Self::Video => (0.00, 0.65, 0.90),
            Self::Audio => (0.47, 0.55, 0.85),
            Self::Archive => (0.07, 0.70, 0.90),
            Self::Document => (0.58, 0.55, 0.95),
            Self::Text => (0.33, 0.45, 0.85),
            Self::Code => (0.66, 0.50, 0.95),
            Self::Binary => (0.60, 0.10, 0.65),
            Self::Other => (0.00, 0.00, 0.70),
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
