//! Sign modifiers and the modifier-state algebra.
//!
//! In MdC a sign code can be followed by modifiers: `A1\r1` rotates the
//! sign a quarter turn, `A1\` mirrors it, `A1\80` scales it to 80%. A handful
//! of names carry fixed meaning ([`ModifierKind`]); every other name is a
//! generic modifier stored as-is.
//!
//! [`ModifierState::apply`] and [`ModifierState::remove`] are pure: they take
//! a state and return the next one.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;

use serde::{Deserialize, Serialize};

use crate::mdc::error::{ModelError, ModelResult};

/// A modifier as produced by the MdC tokenizer: a name and an optional integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub value: Option<i32>,
}

impl Modifier {
    pub fn new(name: impl Into<String>, value: Option<i32>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// A boolean (trigger) modifier.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// An integer modifier.
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, Some(value))
    }

    /// Number of operands: 0 for triggers, 1 for integer modifiers.
    pub fn arity(&self) -> usize {
        usize::from(self.value.is_some())
    }

    /// Classify this modifier.
    pub fn kind(&self) -> ModifierKind<'_> {
        ModifierKind::classify(&self.name, self.value)
    }
}

impl std::str::FromStr for Modifier {
    type Err = ModelError;

    /// Parse one modifier token, with or without its leading backslash.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ModelError::InvalidModifier {
            token: token.to_string(),
            message: message.to_string(),
        };
        let body = token.strip_prefix('\\').unwrap_or(token);
        let split = body
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .unwrap_or(body.len());
        let (name, digits) = body.split_at(split);
        if !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("names are made of ASCII letters"));
        }
        let value = if digits.is_empty() {
            None
        } else {
            Some(
                digits
                    .parse::<i32>()
                    .map_err(|e| invalid(&format!("bad integer operand: {e}")))?,
            )
        };
        Ok(Self::new(name, value))
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\\{}", self.name)?;
        if let Some(v) = self.value {
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The algebraic meaning of a modifier, with its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind<'a> {
    /// `\` : mirror the sign.
    Reverse,
    /// `\N` : scale to N percent.
    Scale(i32),
    /// `rN` : rotate N quarter turns clockwise.
    QuarterTurn(i32),
    /// `tN` : rotate N quarter turns and mirror.
    ReversedQuarterTurn(i32),
    /// `RN` : rotate to N degrees.
    Angle(i32),
    /// `sN` : halve the area N times.
    HalfArea(i32),
    /// Any other name without operand.
    Flag(&'a str),
    /// Any other name with an operand.
    Integer(&'a str, i32),
}

impl<'a> ModifierKind<'a> {
    /// Map a raw `(name, value)` pair to its kind.
    ///
    /// Reserved names only take their special meaning with an operand
    /// (except `""`); `r` alone is an ordinary flag.
    pub fn classify(name: &'a str, value: Option<i32>) -> Self {
        match (name, value) {
            ("", None) => Self::Reverse,
            ("", Some(v)) => Self::Scale(v),
            ("r", Some(v)) => Self::QuarterTurn(v),
            ("t", Some(v)) => Self::ReversedQuarterTurn(v),
            ("R", Some(v)) => Self::Angle(v),
            ("s", Some(v)) => Self::HalfArea(v),
            (name, Some(v)) => Self::Integer(name, v),
            (name, None) => Self::Flag(name),
        }
    }
}

/// Scale value of an undecorated sign, in percent.
pub const FULL_SCALE: u32 = 100;

/// Decorations on one sign or group.
///
/// Ordered by `(angle, reversed, scale, generic modifiers)`, which gives
/// a deterministic order for diffing and duplicate suppression. `Clone`
/// produces a fully independent copy. Deserialized angles are normalized
/// into `0..360` like every other way of setting them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "StoredModifierState")]
pub struct ModifierState {
    /// Degrees, always in `0..360`.
    angle: u16,
    reversed: bool,
    /// Percent, 100 = full size.
    scale: u32,
    /// At most one entry per name; `None` marks a trigger modifier.
    generic: BTreeMap<String, Option<i32>>,
}

impl Default for ModifierState {
    fn default() -> Self {
        Self {
            angle: 0,
            reversed: false,
            scale: FULL_SCALE,
            generic: BTreeMap::new(),
        }
    }
}

/// Serialized form of a [`ModifierState`], before normalization.
#[derive(Deserialize)]
struct StoredModifierState {
    #[serde(default)]
    angle: i64,
    #[serde(default)]
    reversed: bool,
    #[serde(default = "full_scale")]
    scale: u32,
    #[serde(default)]
    generic: BTreeMap<String, Option<i32>>,
}

fn full_scale() -> u32 {
    FULL_SCALE
}

impl From<StoredModifierState> for ModifierState {
    fn from(stored: StoredModifierState) -> Self {
        Self {
            angle: normalize_angle(stored.angle),
            reversed: stored.reversed,
            scale: stored.scale,
            generic: stored.generic,
        }
    }
}

fn quarter_turn_angle(turns: i32) -> u16 {
    normalize_angle(360 - 90 * i64::from(turns))
}

fn normalize_angle(degrees: i64) -> u16 {
    // rem_euclid(360) is always in 0..360.
    degrees.rem_euclid(360) as u16
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of modifiers into a state, left to right.
    pub fn from_modifiers<'m>(modifiers: impl IntoIterator<Item = &'m Modifier>) -> Self {
        modifiers
            .into_iter()
            .fold(Self::default(), |state, m| state.apply(m))
    }

    /// Rotation in degrees, in `0..360`.
    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Scale in percent.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Generic modifiers by name.
    pub fn generic(&self) -> impl Iterator<Item = (&str, Option<i32>)> {
        self.generic.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True when nothing decorates the sign.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// The state after adding `modifier`.
    #[must_use]
    pub fn apply(self, modifier: &Modifier) -> Self {
        self.apply_kind(modifier.kind())
    }

    /// The transition function.
    ///
    /// Angle-setting kinds overwrite the angle rather than adding to it.
    #[must_use]
    pub fn apply_kind(mut self, kind: ModifierKind<'_>) -> Self {
        match kind {
            ModifierKind::Reverse => self.reversed = true,
            ModifierKind::Scale(v) => self.scale = u32::try_from(v).unwrap_or(0),
            ModifierKind::QuarterTurn(v) => self.angle = quarter_turn_angle(v),
            ModifierKind::ReversedQuarterTurn(v) => {
                self.angle = quarter_turn_angle(v);
                self.reversed = true;
            }
            ModifierKind::Angle(v) => self.angle = normalize_angle(i64::from(v)),
            ModifierKind::HalfArea(v) => {
                let scale = (f64::from(FULL_SCALE) * FRAC_1_SQRT_2.powi(v)).round();
                // Float-to-int casts saturate, so huge operands clamp instead of wrapping.
                self.scale = scale as u32;
            }
            ModifierKind::Flag(name) => {
                self.generic.entry(name.to_string()).or_insert(None);
            }
            ModifierKind::Integer(name, v) => {
                self.generic.insert(name.to_string(), Some(v));
            }
        }
        self
    }

    /// The state after removing `modifier`.
    #[must_use]
    pub fn remove(self, modifier: &Modifier) -> Self {
        self.remove_kind(modifier.kind())
    }

    /// Inverse of [`apply_kind`](Self::apply_kind).
    ///
    /// Special kinds reset to defaults (angle 0, not reversed, scale 100);
    /// they do not restore whatever value preceded the modifier. Generic
    /// modifiers are removed only when their arity matches.
    #[must_use]
    pub fn remove_kind(mut self, kind: ModifierKind<'_>) -> Self {
        match kind {
            ModifierKind::Reverse => self.reversed = false,
            ModifierKind::Scale(_) | ModifierKind::HalfArea(_) => self.scale = FULL_SCALE,
            ModifierKind::QuarterTurn(_) | ModifierKind::Angle(_) => self.angle = 0,
            ModifierKind::ReversedQuarterTurn(_) => {
                self.angle = 0;
                self.reversed = false;
            }
            ModifierKind::Flag(name) => {
                if self.generic.get(name) == Some(&None) {
                    self.generic.remove(name);
                }
            }
            ModifierKind::Integer(name, _) => {
                if matches!(self.generic.get(name), Some(Some(_))) {
                    self.generic.remove(name);
                }
            }
        }
        self
    }

    /// In-place [`apply`](Self::apply), for states embedded in a tree.
    pub fn include(&mut self, modifier: &Modifier) {
        *self = std::mem::take(self).apply(modifier);
    }

    /// In-place [`remove`](Self::remove).
    pub fn exclude(&mut self, modifier: &Modifier) {
        *self = std::mem::take(self).remove(modifier);
    }

    /// Value of a boolean modifier. `""` reads the reversal flag.
    pub fn boolean(&self, name: &str) -> bool {
        if name.is_empty() {
            self.reversed
        } else {
            self.generic.get(name) == Some(&None)
        }
    }

    /// Value of an integer modifier.
    pub fn integer(&self, name: &str) -> ModelResult<i32> {
        match self.generic.get(name) {
            Some(Some(v)) => Ok(*v),
            _ => Err(ModelError::NoSuchModifier {
                name: name.to_string(),
            }),
        }
    }

    /// Value of an integer modifier, or `default` when absent.
    pub fn integer_or(&self, name: &str, default: i32) -> i32 {
        self.integer(name).unwrap_or(default)
    }

    pub fn has_integer(&self, name: &str) -> bool {
        matches!(self.generic.get(name), Some(Some(_)))
    }

    /// Set the angle in degrees, normalized into `0..360`.
    pub fn set_angle(&mut self, degrees: i32) {
        self.angle = normalize_angle(i64::from(degrees));
    }

    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale;
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) {
        let modifier = Modifier::flag(name);
        if value {
            self.include(&modifier);
        } else {
            self.exclude(&modifier);
        }
    }

    pub fn set_integer(&mut self, name: &str, value: i32) {
        self.include(&Modifier::integer(name, value));
    }

    /// Drop the integer modifier `name`, if any.
    pub fn unset_integer(&mut self, name: &str) {
        if self.has_integer(name) {
            self.generic.remove(name);
        }
    }

    /// Modifiers that rebuild this state when applied to the default state.
    pub fn modifiers(&self) -> Vec<Modifier> {
        let mut out = Vec::new();
        if self.reversed {
            out.push(Modifier::flag(""));
        }
        if self.scale != FULL_SCALE {
            out.push(Modifier::integer("", i32::try_from(self.scale).unwrap_or(i32::MAX)));
        }
        if self.angle != 0 {
            out.push(Modifier::integer("R", i32::from(self.angle)));
        }
        out.extend(
            self.generic
                .iter()
                .map(|(name, value)| Modifier::new(name.clone(), *value)),
        );
        out
    }
}

/// MdC suffix form, e.g. `\\R90\red`. Empty for the default state.
impl std::fmt::Display for ModifierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in self.modifiers() {
            write!(f, "{m}")?;
        }
        Ok(())
    }
}
