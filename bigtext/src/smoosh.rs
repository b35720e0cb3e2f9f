//! Rules for merging the overlapping columns of two glyphs
//!
//! When glyphs are pushed into each other, every overlapping pair of
//! sub-characters is resolved by an ordered chain of [`SmooshRule`]s; the
//! first rule in the chain to reach a decision wins.

use bstr::BString;

/// Characters a [`SmooshRule::Underscore`] underscore yields to.
const UNDERSCORE_REPLACERS: &[u8] = b"|/\\[]{}()<>";

/// An ordered chain of smoosh rules plus the font's hardblank.
///
/// One `Smoosher` is built per font and shared by all of its glyphs, so
/// composing glyphs from the same font never changes merge behavior.
#[derive(Clone, Debug)]
pub struct Smoosher {
    rules: Vec<SmooshRule>,
    hardblank: u8,
    unknown: u8,
}

impl Smoosher {
    /// A smoosher with the default chain, [`SmooshRule::Spaces`] only.
    #[must_use]
    pub fn new(hardblank: u8) -> Self {
        Self::with_rules(hardblank, [SmooshRule::Spaces])
    }

    /// A smoosher applying `rules` in exactly the order given.
    #[must_use]
    pub fn with_rules(hardblank: u8, rules: impl IntoIterator<Item = SmooshRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            hardblank,
            unknown: b'?',
        }
    }

    /// Sets the fallback sub-character used when no rule decides. Defaults to
    /// `?`, which is unreachable as long as the chain ends in a total rule
    /// such as [`SmooshRule::Spaces`].
    #[must_use]
    pub const fn unknown_char(mut self, unknown: u8) -> Self {
        self.unknown = unknown;
        self
    }

    /// The font's hardblank: rendered as a blank but treated as visible.
    #[must_use]
    pub const fn hardblank(&self) -> u8 {
        self.hardblank
    }

    /// Merges a single pair of sub-characters.
    #[must_use]
    pub fn smoosh_pair(&self, left: u8, right: u8) -> u8 {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(left, right, self.hardblank))
            .unwrap_or(self.unknown)
    }

    /// Merges two equal-length column slices pairwise.
    #[must_use]
    pub fn smoosh(&self, left: &[u8], right: &[u8]) -> BString {
        left.iter()
            .zip(right)
            .map(|(&l, &r)| self.smoosh_pair(l, r))
            .collect()
    }
}

/// A single merge rule for one pair of overlapping sub-characters.
///
/// `apply` returns `None` when the rule cannot decide the pair, handing it to
/// the next rule in the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmooshRule {
    /// Blanks lose: the right character wins unless it is a space.
    /// Total, so it terminates any chain it appears in.
    Spaces,
    /// The right character always wins. Total.
    Universal,
    /// Two copies of the same character merge into one, unless it is the
    /// hardblank.
    EqualChar,
    /// An underscore yields to `|/\[]{}()<>`.
    Underscore,
    /// Between two bracketing classes (`|`, `/\`, `[]`, `{}`, `()`, `<>`),
    /// the higher class wins; equal classes do not decide.
    Hierarchy,
    /// Facing bracket pairs close up into `|`.
    OppositePair,
    /// `/\` becomes `|`, `\/` becomes `Y` and `><` becomes `X`.
    BigX,
    /// Two hardblanks merge into one.
    Hardblank,
    /// `-` over `_` (in either order) becomes `=`.
    HorizontalLine,
}

impl SmooshRule {
    /// Decides the merge of `left` and `right`, or `None` to pass.
    #[must_use]
    pub fn apply(self, left: u8, right: u8, hardblank: u8) -> Option<u8> {
        match self {
            Self::Spaces => Some(if right == b' ' { left } else { right }),
            Self::Universal => Some(right),
            Self::EqualChar => (left == right && left != hardblank).then_some(left),
            Self::Underscore => match (left, right) {
                (b'_', c) | (c, b'_') if UNDERSCORE_REPLACERS.contains(&c) => Some(c),
                _ => None,
            },
            Self::Hierarchy => match (bracket_class(left), bracket_class(right)) {
                (Some(l), Some(r)) if l != r => Some(if l > r { left } else { right }),
                _ => None,
            },
            Self::OppositePair => matches!(
                (left, right),
                (b'[', b']')
                    | (b']', b'[')
                    | (b'{', b'}')
                    | (b'}', b'{')
                    | (b'(', b')')
                    | (b')', b'(')
            )
            .then_some(b'|'),
            Self::BigX => match (left, right) {
                (b'/', b'\\') => Some(b'|'),
                (b'\\', b'/') => Some(b'Y'),
                (b'>', b'<') => Some(b'X'),
                _ => None,
            },
            Self::Hardblank => (left == hardblank && right == hardblank).then_some(hardblank),
            Self::HorizontalLine => {
                matches!((left, right), (b'-', b'_') | (b'_', b'-')).then_some(b'=')
            }
        }
    }

    /// Decodes a legacy `old_layout` header value into a rule chain.
    ///
    /// Non-positive values mean plain fitting. Positive values enable the six
    /// controlled rules from their low bits, in canonical order. Either way
    /// the chain ends in [`SmooshRule::Spaces`], so it always decides.
    #[must_use]
    pub fn from_old_layout(code: i32) -> Vec<Self> {
        const CONTROLLED: [SmooshRule; 6] = [
            SmooshRule::EqualChar,
            SmooshRule::Underscore,
            SmooshRule::Hierarchy,
            SmooshRule::OppositePair,
            SmooshRule::BigX,
            SmooshRule::Hardblank,
        ];
        let mut rules = Vec::new();
        if code > 0 {
            let bits = code.unsigned_abs();
            rules.extend(
                CONTROLLED
                    .into_iter()
                    .enumerate()
                    .filter(|&(bit, _)| bits & (1 << bit) != 0)
                    .map(|(_, rule)| rule),
            );
        }
        rules.push(Self::Spaces);
        rules
    }
}

/// The bracketing class for [`SmooshRule::Hierarchy`], higher is stronger.
const fn bracket_class(c: u8) -> Option<u8> {
    match c {
        b'|' => Some(1),
        b'/' | b'\\' => Some(2),
        b'[' | b']' => Some(3),
        b'{' | b'}' => Some(4),
        b'(' | b')' => Some(5),
        b'<' | b'>' => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{SmooshRule, Smoosher};

    #[test]
    fn default_chain_prefers_visible() {
        let smoosher = Smoosher::new(b'$');
        assert_eq!(smoosher.smoosh_pair(b'x', b' '), b'x');
        assert_eq!(smoosher.smoosh_pair(b' ', b'y'), b'y');
        assert_eq!(smoosher.smoosh_pair(b'x', b'y'), b'y');
        assert_eq!(smoosher.smoosh_pair(b' ', b' '), b' ');
    }

    #[test]
    fn smoosh_zips_columns() {
        let smoosher = Smoosher::new(b'$');
        assert_eq!(smoosher.smoosh(b"ab ", b"  c"), "abc");
    }

    #[test]
    fn equal_char_skips_hardblank() {
        assert_eq!(SmooshRule::EqualChar.apply(b'#', b'#', b'$'), Some(b'#'));
        assert_eq!(SmooshRule::EqualChar.apply(b'$', b'$', b'$'), None);
        assert_eq!(SmooshRule::EqualChar.apply(b'#', b'%', b'$'), None);
    }

    #[test]
    fn underscore_yields_to_replacers() {
        assert_eq!(SmooshRule::Underscore.apply(b'_', b'|', b'$'), Some(b'|'));
        assert_eq!(SmooshRule::Underscore.apply(b')', b'_', b'$'), Some(b')'));
        assert_eq!(SmooshRule::Underscore.apply(b'_', b'x', b'$'), None);
        assert_eq!(SmooshRule::Underscore.apply(b'_', b'_', b'$'), None);
    }

    #[test]
    fn hierarchy_higher_class_wins() {
        assert_eq!(SmooshRule::Hierarchy.apply(b'|', b'>', b'$'), Some(b'>'));
        assert_eq!(SmooshRule::Hierarchy.apply(b'}', b'/', b'$'), Some(b'}'));
        // equal classes do not decide
        assert_eq!(SmooshRule::Hierarchy.apply(b'/', b'\\', b'$'), None);
        assert_eq!(SmooshRule::Hierarchy.apply(b'a', b'|', b'$'), None);
    }

    #[test]
    fn opposite_pairs_close_up() {
        assert_eq!(SmooshRule::OppositePair.apply(b'[', b']', b'$'), Some(b'|'));
        assert_eq!(SmooshRule::OppositePair.apply(b')', b'(', b'$'), Some(b'|'));
        assert_eq!(SmooshRule::OppositePair.apply(b'[', b'[', b'$'), None);
        assert_eq!(SmooshRule::OppositePair.apply(b'(', b']', b'$'), None);
    }

    #[test]
    fn big_x_is_ordered() {
        assert_eq!(SmooshRule::BigX.apply(b'/', b'\\', b'$'), Some(b'|'));
        assert_eq!(SmooshRule::BigX.apply(b'\\', b'/', b'$'), Some(b'Y'));
        assert_eq!(SmooshRule::BigX.apply(b'>', b'<', b'$'), Some(b'X'));
        assert_eq!(SmooshRule::BigX.apply(b'<', b'>', b'$'), None);
    }

    #[test]
    fn hardblanks_merge() {
        assert_eq!(SmooshRule::Hardblank.apply(b'$', b'$', b'$'), Some(b'$'));
        assert_eq!(SmooshRule::Hardblank.apply(b'$', b' ', b'$'), None);
        // the rule tracks the font's hardblank, not a fixed character
        assert_eq!(SmooshRule::Hardblank.apply(b'$', b'$', b'#'), None);
    }

    #[test]
    fn horizontal_lines_join() {
        assert_eq!(SmooshRule::HorizontalLine.apply(b'-', b'_', b'$'), Some(b'='));
        assert_eq!(SmooshRule::HorizontalLine.apply(b'_', b'-', b'$'), Some(b'='));
        assert_eq!(SmooshRule::HorizontalLine.apply(b'-', b'-', b'$'), None);
    }

    #[test]
    fn chain_order_matters() {
        let x_first = Smoosher::with_rules(b'$', [SmooshRule::BigX, SmooshRule::Universal]);
        assert_eq!(x_first.smoosh_pair(b'/', b'\\'), b'|');
        let universal_first = Smoosher::with_rules(b'$', [SmooshRule::Universal, SmooshRule::BigX]);
        assert_eq!(universal_first.smoosh_pair(b'/', b'\\'), b'\\');
    }

    #[test]
    fn undecided_pairs_fall_back() {
        let partial = Smoosher::with_rules(b'$', [SmooshRule::Hierarchy]);
        assert_eq!(partial.smoosh_pair(b'a', b'b'), b'?');
        let marked = Smoosher::with_rules(b'$', [SmooshRule::Hierarchy]).unknown_char(b'!');
        assert_eq!(marked.smoosh_pair(b'a', b'b'), b'!');
    }

    #[test]
    fn old_layout_non_positive_is_fitting() {
        assert_eq!(SmooshRule::from_old_layout(0), [SmooshRule::Spaces]);
        assert_eq!(SmooshRule::from_old_layout(-1), [SmooshRule::Spaces]);
    }

    #[test]
    fn old_layout_bits_enable_rules_in_order() {
        assert_eq!(
            SmooshRule::from_old_layout(0b1111),
            [
                SmooshRule::EqualChar,
                SmooshRule::Underscore,
                SmooshRule::Hierarchy,
                SmooshRule::OppositePair,
                SmooshRule::Spaces,
            ]
        );
        assert_eq!(
            SmooshRule::from_old_layout(32),
            [SmooshRule::Hardblank, SmooshRule::Spaces]
        );
    }
}
