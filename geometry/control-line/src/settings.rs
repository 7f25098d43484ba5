//! Per-corner and per-cross-section settings.
//!
//! Every control node either defers to the line-wide default or carries its
//! own value, modelled with [`Setting`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest allowed turn detail (samples per corner arc).
pub const MIN_TURN_DETAIL: u32 = 1;

/// Nominal fillet radius used by corners swept with a single sample.
pub const SINGLE_SAMPLE_TURN_RADIUS: f64 = 0.1;

/// Inner cross-section radius must stay strictly above this value.
pub const MIN_INNER_RADIUS: f64 = 0.1;

/// Either defer to the line default or use a node-specific value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Setting<T> {
    /// Use the line-wide default.
    #[default]
    UsesDefault,
    /// Use this value for the node.
    Custom(T),
}

impl<T> Setting<T> {
    /// The effective value given the line default.
    #[must_use]
    pub fn resolve<'a>(&'a self, default: &'a T) -> &'a T {
        match self {
            Self::UsesDefault => default,
            Self::Custom(value) => value,
        }
    }

    /// Whether this setting follows the line default.
    #[must_use]
    pub const fn uses_default(&self) -> bool {
        matches!(self, Self::UsesDefault)
    }
}

/// Fillet settings for a corner.
///
/// # Example
///
/// ```
/// use control_line::TurnSettings;
///
/// let turn = TurnSettings::default().with_radius(2.0).with_detail(8);
/// assert_eq!(turn.radius(), 2.0);
///
/// // A single-sample corner uses a nominal radius.
/// let sharp = turn.with_detail(1);
/// assert_eq!(sharp.radius(), 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnSettings {
    radius: f64,
    detail: u32,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 5,
        }
    }
}

impl TurnSettings {
    /// Create turn settings. `detail` is clamped to at least one sample.
    #[must_use]
    pub fn new(radius: f64, detail: u32) -> Self {
        Self {
            radius,
            detail: detail.max(MIN_TURN_DETAIL),
        }
    }

    /// Set the configured fillet radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the number of arc samples. Clamped to at least one.
    #[must_use]
    pub fn with_detail(mut self, detail: u32) -> Self {
        self.detail = detail.max(MIN_TURN_DETAIL);
        self
    }

    /// Effective fillet radius.
    ///
    /// Corners swept with a single sample use [`SINGLE_SAMPLE_TURN_RADIUS`].
    #[must_use]
    pub fn radius(&self) -> f64 {
        if self.detail > 1 {
            self.radius
        } else {
            SINGLE_SAMPLE_TURN_RADIUS
        }
    }

    /// Radius as configured, ignoring the single-sample override.
    #[must_use]
    pub const fn configured_radius(&self) -> f64 {
        self.radius
    }

    /// Number of samples on the corner arc.
    #[must_use]
    pub const fn detail(&self) -> u32 {
        self.detail
    }
}

/// Outer and inner cross-section radii.
///
/// Keeps `MIN_INNER_RADIUS < inner < outer`. Setters refuse values that would
/// break the ordering and report whether the value was accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadiusSettings {
    outer: f64,
    inner: f64,
}

impl Default for RadiusSettings {
    fn default() -> Self {
        Self {
            outer: 1.0,
            inner: 0.5,
        }
    }
}

impl RadiusSettings {
    /// Create radius settings, or `None` if `MIN_INNER_RADIUS < inner < outer` does not hold.
    #[must_use]
    pub fn new(outer: f64, inner: f64) -> Option<Self> {
        (inner > MIN_INNER_RADIUS && inner < outer).then_some(Self { outer, inner })
    }

    /// Outer wall radius.
    #[must_use]
    pub const fn outer(&self) -> f64 {
        self.outer
    }

    /// Inner wall radius.
    #[must_use]
    pub const fn inner(&self) -> f64 {
        self.inner
    }

    /// Set the outer radius if it stays above the inner one.
    pub fn set_outer(&mut self, outer: f64) -> bool {
        let accepted = outer > self.inner;
        if accepted {
            self.outer = outer;
        }
        accepted
    }

    /// Set the inner radius if it stays between the minimum and the outer one.
    pub fn set_inner(&mut self, inner: f64) -> bool {
        let accepted = inner < self.outer && inner > MIN_INNER_RADIUS;
        if accepted {
            self.inner = inner;
        }
        accepted
    }
}

/// Line-wide defaults that nodes may defer to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineDefaults {
    /// Default corner fillet.
    pub turn: TurnSettings,
    /// Default cross-section.
    pub radius: RadiusSettings,
}

impl LineDefaults {
    /// Set the default corner fillet.
    #[must_use]
    pub const fn with_turn(mut self, turn: TurnSettings) -> Self {
        self.turn = turn;
        self
    }

    /// Set the default cross-section.
    #[must_use]
    pub const fn with_radius(mut self, radius: RadiusSettings) -> Self {
        self.radius = radius;
        self
    }
}

/// Validation policy of a control line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSettings {
    /// Smallest corner angle, in degrees, that edits may create. Default: 90
    pub min_allowed_angle: f64,
    /// Whether predicates enforce `min_allowed_angle`. Default: true
    pub check_angle: bool,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            min_allowed_angle: 90.0,
            check_angle: true,
        }
    }
}

impl LineSettings {
    /// Set the minimum allowed corner angle in degrees.
    #[must_use]
    pub const fn with_min_allowed_angle(mut self, degrees: f64) -> Self {
        self.min_allowed_angle = degrees;
        self
    }

    /// Disable the minimum-angle check.
    #[must_use]
    pub const fn unchecked_angles(mut self) -> Self {
        self.check_angle = false;
        self
    }

    /// Whether `angle` breaks the minimum-angle policy.
    #[must_use]
    pub fn rejects_angle(&self, angle: f64) -> bool {
        self.check_angle && angle < self.min_allowed_angle
    }
}
