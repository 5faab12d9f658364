//! AI models a transform job can run on.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Identifier of an AI model, as sent on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum ModelId {
    #[serde(rename = "gpt-4o")]
    #[strum(serialize = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "claude")]
    #[strum(serialize = "claude")]
    Claude,
    #[serde(rename = "stable-diffusion")]
    #[strum(serialize = "stable-diffusion")]
    StableDiffusion,
    #[serde(rename = "dall-e")]
    #[strum(serialize = "dall-e")]
    DallE,
    #[serde(rename = "midjourney")]
    #[strum(serialize = "midjourney")]
    Midjourney,
}

/// A selectable model with its display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: ModelId,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Human label such as "about 15s"; informational only
    pub estimated_time: &'static str,
    pub cost: &'static str,
}

pub static MODELS: [Model; 5] = [
    Model {
        id: ModelId::Gpt4o,
        name: "GPT-4o",
        icon: "flash-outline",
        color: "#10A37F",
        estimated_time: "about 15s",
        cost: "free",
    },
    Model {
        id: ModelId::Claude,
        name: "Claude",
        icon: "sparkles-outline",
        color: "#D97706",
        estimated_time: "about 20s",
        cost: "free",
    },
    Model {
        id: ModelId::StableDiffusion,
        name: "Stable Diffusion",
        icon: "color-palette-outline",
        color: "#7C3AED",
        estimated_time: "about 30s",
        cost: "free",
    },
    Model {
        id: ModelId::DallE,
        name: "DALL-E 3",
        icon: "image-outline",
        color: "#0EA5E9",
        estimated_time: "about 20s",
        cost: "100 credits",
    },
    Model {
        id: ModelId::Midjourney,
        name: "Midjourney",
        icon: "diamond-outline",
        color: "#E11D48",
        estimated_time: "about 40s",
        cost: "200 credits",
    },
];

impl ModelId {
    /// Catalog entry for this id.
    #[must_use]
    pub fn model(self) -> &'static Model {
        &MODELS[self as usize]
    }
}

/// Look up a model by its wire id.
#[must_use]
pub fn find_model(id: &str) -> Option<&'static Model> {
    id.parse::<ModelId>().ok().map(ModelId::model)
}
