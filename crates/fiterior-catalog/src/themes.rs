//! Interior style themes.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Identifier of a style theme.
///
/// Parses from and displays as the wire id (`"modern"`, `"nordic"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeId {
    Modern,
    Minimal,
    Nordic,
    Industrial,
    Natural,
    Classic,
}

/// A style theme the user can pick for their room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    /// Icon name from the app's icon set
    pub icon: &'static str,
    /// Swatch colour as `#RRGGBB`
    pub color: &'static str,
    pub description: &'static str,
}

pub static THEMES: [Theme; 6] = [
    Theme {
        id: ThemeId::Modern,
        name: "Modern",
        icon: "cube-outline",
        color: "#2C2C2C",
        description: "Clean lines and refined colours for a contemporary interior",
    },
    Theme {
        id: ThemeId::Minimal,
        name: "Minimal",
        icon: "remove-outline",
        color: "#E8E8E8",
        description: "A simple, uncluttered space with nothing extra",
    },
    Theme {
        id: ThemeId::Nordic,
        name: "Nordic",
        icon: "snow-outline",
        color: "#A8C5DA",
        description: "Bright and warm Scandinavian style",
    },
    Theme {
        id: ThemeId::Industrial,
        name: "Industrial",
        icon: "construct-outline",
        color: "#8B7355",
        description: "The raw charm of exposed concrete and metal",
    },
    Theme {
        id: ThemeId::Natural,
        name: "Natural",
        icon: "leaf-outline",
        color: "#7CB342",
        description: "A relaxed space filled with natural materials and plants",
    },
    Theme {
        id: ThemeId::Classic,
        name: "Classic",
        icon: "library-outline",
        color: "#C9A96E",
        description: "Traditional style with rich detail and an elegant mood",
    },
];

impl ThemeId {
    /// Catalog entry for this id.
    #[must_use]
    pub fn theme(self) -> &'static Theme {
        // THEMES holds exactly one entry per variant, in declaration order.
        &THEMES[self as usize]
    }
}

/// Look up a theme by its wire id.
#[must_use]
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    id.parse::<ThemeId>().ok().map(ThemeId::theme)
}
