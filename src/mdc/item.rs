//! Top-level items of a document column.

use serde::Serialize;

use crate::mdc::modifier::{Modifier, ModifierState};
use crate::signs::SignCode;

/// Display state shared by every item kind, toggled by zone operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ItemState {
    pub shaded: bool,
    pub red: bool,
}

/// Quarter-based shading of a cadrat, as a bit set.
///
/// Bits follow MdC's `#1234` notation: top-start, top-end, bottom-start,
/// bottom-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Shading(u8);

impl Shading {
    pub const NONE: Shading = Shading(0);
    pub const TOP_START: Shading = Shading(1);
    pub const TOP_END: Shading = Shading(2);
    pub const BOTTOM_START: Shading = Shading(4);
    pub const BOTTOM_END: Shading = Shading(8);
    pub const FULL: Shading = Shading(15);

    /// Keep only the four quarter bits.
    pub fn from_bits(bits: u8) -> Self {
        Shading(bits & Self::FULL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Shading) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Shading {
    type Output = Shading;

    fn bitor(self, rhs: Shading) -> Shading {
        Shading(self.0 | rhs.0)
    }
}

/// One sign occurrence inside a cadrat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sign {
    pub code: SignCode,
    pub modifiers: ModifierState,
}

impl Sign {
    pub fn new(code: impl Into<SignCode>) -> Self {
        Self {
            code: code.into(),
            modifiers: ModifierState::default(),
        }
    }

    /// Builder: add a modifier.
    pub fn with(mut self, modifier: &Modifier) -> Self {
        self.modifiers.include(modifier);
        self
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.code, self.modifiers)
    }
}

/// A group of signs laid out as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cadrat {
    pub signs: Vec<Sign>,
    pub modifiers: ModifierState,
    pub shading: Shading,
    pub state: ItemState,
}

impl Cadrat {
    pub fn new(signs: Vec<Sign>) -> Self {
        Self {
            signs,
            ..Self::default()
        }
    }
}

/// An item at the top level of a column.
///
/// Closed set of kinds; consumers dispatch with `match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopItem {
    Cadrat(Cadrat),
    AlphabeticText { text: String, state: ItemState },
    LineBreak { state: ItemState },
    PageBreak { state: ItemState },
    Tabulation { stop: u32, state: ItemState },
}

impl TopItem {
    /// A cadrat holding the given sign codes, undecorated.
    pub fn cadrat<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SignCode>,
    {
        TopItem::Cadrat(Cadrat::new(codes.into_iter().map(Sign::new).collect()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        TopItem::AlphabeticText {
            text: text.into(),
            state: ItemState::default(),
        }
    }

    pub fn line_break() -> Self {
        TopItem::LineBreak {
            state: ItemState::default(),
        }
    }

    pub fn page_break() -> Self {
        TopItem::PageBreak {
            state: ItemState::default(),
        }
    }

    pub fn tabulation(stop: u32) -> Self {
        TopItem::Tabulation {
            stop,
            state: ItemState::default(),
        }
    }

    pub fn state(&self) -> &ItemState {
        match self {
            TopItem::Cadrat(c) => &c.state,
            TopItem::AlphabeticText { state, .. }
            | TopItem::LineBreak { state }
            | TopItem::PageBreak { state }
            | TopItem::Tabulation { state, .. } => state,
        }
    }

    pub fn state_mut(&mut self) -> &mut ItemState {
        match self {
            TopItem::Cadrat(c) => &mut c.state,
            TopItem::AlphabeticText { state, .. }
            | TopItem::LineBreak { state }
            | TopItem::PageBreak { state }
            | TopItem::Tabulation { state, .. } => state,
        }
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, TopItem::PageBreak { .. })
    }

    pub fn as_cadrat(&self) -> Option<&Cadrat> {
        match self {
            TopItem::Cadrat(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cadrat_mut(&mut self) -> Option<&mut Cadrat> {
        match self {
            TopItem::Cadrat(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_accessors_cover_every_kind() {
        let mut items = vec![
            TopItem::cadrat(["A1", "B1"]),
            TopItem::text("hello"),
            TopItem::line_break(),
            TopItem::page_break(),
            TopItem::tabulation(3),
        ];
        for item in &mut items {
            assert_eq!(*item.state(), ItemState::default());
            item.state_mut().red = true;
            assert!(item.state().red);
        }
        assert_eq!(items.iter().filter(|i| i.is_page_break()).count(), 1);
    }

    #[test]
    fn shading_bits() {
        let s = Shading::TOP_START | Shading::BOTTOM_END;
        assert_eq!(s.bits(), 9);
        assert!(s.contains(Shading::TOP_START));
        assert!(!s.contains(Shading::TOP_END));
        assert_eq!(Shading::from_bits(0xff), Shading::FULL);
        assert!(Shading::NONE.is_empty());
    }

    #[test]
    fn sign_display_carries_modifiers() {
        let sign = Sign::new("A1").with(&Modifier::integer("r", 1));
        assert_eq!(sign.to_string(), "A1\\R270");
    }

    #[test]
    fn cadrat_clone_is_deep() {
        let original = TopItem::cadrat(["G1"]);
        let mut copy = original.clone();
        if let Some(c) = copy.as_cadrat_mut() {
            c.signs[0].modifiers.set_angle(90);
        }
        assert_eq!(original.as_cadrat().unwrap().signs[0].modifiers.angle(), 0);
    }
}
