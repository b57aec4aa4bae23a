//! Engine option types.
//!
//! Options can be built in code or deserialized from JSON. Field names use
//! camelCase so option files read like the inline object a caller would pass.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GridError;

/// Default tween duration in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 250;

/// Easing curve applied to every item tween.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum EasingType {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease in (slow start).
    EaseIn,
    /// Quadratic ease out (slow end).
    EaseOut,
    /// Quadratic ease in and out.
    #[default]
    EaseInOut,
    /// Circular ease in.
    CircIn,
    /// Circular ease out.
    CircOut,
    /// Circular ease in and out.
    CircInOut,
    /// Pulls back before moving.
    BackIn,
    /// Overshoots the target before settling.
    BackOut,
    /// Pulls back, then overshoots.
    BackInOut,
    /// Pulls back, then accelerates exponentially.
    Anticipate,
}

impl EasingType {
    /// Every supported curve.
    pub const ALL: [Self; 11] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::CircIn,
        Self::CircOut,
        Self::CircInOut,
        Self::BackIn,
        Self::BackOut,
        Self::BackInOut,
        Self::Anticipate,
    ];

    /// The curve's name as callers spell it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
            Self::CircIn => "circIn",
            Self::CircOut => "circOut",
            Self::CircInOut => "circInOut",
            Self::BackIn => "backIn",
            Self::BackOut => "backOut",
            Self::BackInOut => "backInOut",
            Self::Anticipate => "anticipate",
        }
    }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for EasingType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| GridError::InvalidEasing(s.to_string()))
    }
}

// ============================================================================
// Stagger
// ============================================================================

/// Per-item start delay multiplier.
///
/// Deserializes from a number of milliseconds. Zero, negative and
/// non-numeric values all mean "start every item at once".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stagger(Option<Duration>);

impl Stagger {
    /// No stagger: every item starts in the same frame.
    pub const NONE: Self = Self(None);

    /// Staggers items by `ms` milliseconds per index.
    #[must_use]
    pub const fn millis(ms: u64) -> Self {
        if ms == 0 { Self::NONE } else { Self(Some(Duration::from_millis(ms))) }
    }

    /// Returns the per-item delay, if any.
    #[must_use]
    pub const fn step(self) -> Option<Duration> { self.0 }

    /// Start delay for the item at `index`.
    #[must_use]
    pub fn delay_for(self, index: usize) -> Option<Duration> {
        let step = self.0?;
        Some(step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX)))
    }
}

impl Serialize for Stagger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = self.0.map_or(0, |step| u64::try_from(step.as_millis()).unwrap_or(u64::MAX));
        serializer.serialize_u64(ms)
    }
}

impl<'de> Deserialize<'de> for Stagger {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_f64() {
            Some(ms) if ms.is_finite() && ms > 0.0 => Self::millis(ms.round() as u64),
            _ => Self::NONE,
        })
    }
}

impl JsonSchema for Stagger {
    fn schema_name() -> std::borrow::Cow<'static, str> { "Stagger".into() }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "description": "Delay in milliseconds multiplied by each item's index. \
                            0 or any non-numeric value disables staggering.",
            "type": ["number", "string", "boolean", "null"],
            "default": 0
        })
    }
}

// ============================================================================
// GridOptions
// ============================================================================

/// Options for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    /// Tween duration in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: u64,

    /// Per-item start delay in milliseconds.
    pub stagger: Stagger,

    /// Easing curve name.
    pub easing: EasingType,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            stagger: Stagger::NONE,
            easing: EasingType::default(),
        }
    }
}

impl GridOptions {
    /// Sets the tween duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the stagger step.
    #[must_use]
    pub const fn with_stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = stagger;
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub const fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the easing curve by name.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidEasing`] for unknown names.
    pub fn with_easing_name(self, name: &str) -> Result<Self, GridError> {
        Ok(self.with_easing(name.parse()?))
    }

    /// Tween duration.
    #[must_use]
    pub const fn duration(&self) -> Duration { Duration::from_millis(self.duration_ms) }
}
