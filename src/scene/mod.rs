//! Scene data model.
//!
//! A `SceneDescription` is the five-field structured document the generation
//! endpoint returns for one dream: title, mood, primary object, color, and
//! animation style. The animator never validates it — every field degrades
//! to a documented fallback.

use serde::{Deserialize, Serialize};

/// Fallback fill/glow color when `primary_color` is missing or malformed.
pub const DEFAULT_COLOR: [f32; 3] = [224.0 / 255.0, 187.0 / 255.0, 1.0];

/// Structured scene description for one dream visualization.
///
/// Field names follow the wire shape (camelCase JSON). Immutable for the
/// duration of one animation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    /// Concise, evocative title for the dream.
    pub scene_title: String,
    /// Primary emotion of the dream (e.g. Calm, Anxious, Joyful).
    pub dominant_mood: String,
    /// Most visually striking element. Descriptive only.
    pub primary_object: String,
    /// Hex color code for the mood/object (e.g. `#FF6AC1`).
    pub primary_color: String,
    /// One of: Particles, Swirl, Mist, Comet, Vortex.
    pub animation_type: String,
}

/// Binary mood classification that scales velocities and angular speed.
///
/// Only `Anxious` is recognized as its own bucket; every other mood string
/// (including empty/unknown) lands in `Calm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodBucket {
    Anxious,
    Calm,
}

/// One of the five named kinematic rules governing particle motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Particles,
    Swirl,
    Mist,
    Comet,
    Vortex,
}

impl AnimationKind {
    /// Resolve an animation-type string. Unrecognized names fall back to
    /// `Particles`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Swirl" => Self::Swirl,
            "Mist" => Self::Mist,
            "Comet" => Self::Comet,
            "Vortex" => Self::Vortex,
            _ => Self::Particles,
        }
    }
}

impl Default for AnimationKind {
    fn default() -> Self {
        Self::Particles
    }
}

impl SceneDescription {
    /// Mood bucket driving the physics branches.
    pub fn mood_bucket(&self) -> MoodBucket {
        if self.dominant_mood == "Anxious" {
            MoodBucket::Anxious
        } else {
            MoodBucket::Calm
        }
    }

    /// Size factor for the central glow: Joyful 1.0, Anxious 0.5, else 0.75.
    pub fn mood_factor(&self) -> f32 {
        match self.dominant_mood.as_str() {
            "Joyful" => 1.0,
            "Anxious" => 0.5,
            _ => 0.75,
        }
    }

    /// Kinematic branch selected by `animation_type`.
    pub fn animation_kind(&self) -> AnimationKind {
        AnimationKind::from_name(&self.animation_type)
    }

    /// Primary color as RGB in 0..1, falling back to [`DEFAULT_COLOR`].
    pub fn color(&self) -> [f32; 3] {
        parse_hex_color(&self.primary_color).unwrap_or(DEFAULT_COLOR)
    }
}

/// Parse a `#rgb` or `#rrggbb` hex color into RGB (0.0–1.0).
pub fn parse_hex_color(val: &str) -> Option<[f32; 3]> {
    let v = val.trim();
    let hex = v.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
        }
        _ => None,
    }
}
