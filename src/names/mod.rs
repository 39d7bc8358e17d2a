//! Abbreviation-tolerant comparison of personal names.
//!
//! Two names are compared on their given-name sequences once surname and
//! lineage agree exactly. `M. Lukin` and `Mikhail Lukin` are compatible, the
//! fuller one carrying more information; `M. D. Lukin` and `M. J. Lukin` are not.

use std::fmt;

use crate::catalog::Name;

/// Outcome of comparing two names `a` and `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compatibility {
    Incompatible,
    /// Same given names, surname and lineage
    Identical,
    /// `a` carries at least as much information as `b`
    Superset,
    /// `b` carries at least as much information as `a`
    Subset,
    /// Each carries at least as much information as the other without being identical
    Equivalent,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        self != Compatibility::Incompatible
    }

    /// The same comparison seen from the other side
    pub fn reversed(self) -> Self {
        match self {
            Compatibility::Superset => Compatibility::Subset,
            Compatibility::Subset => Compatibility::Superset,
            other => other,
        }
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Compatibility::Incompatible => "incompatible",
            Compatibility::Identical => "identical",
            Compatibility::Superset => "superset",
            Compatibility::Subset => "subset",
            Compatibility::Equivalent => "equivalent",
        };
        f.write_str(label)
    }
}

/// How two single given-name tokens relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMatch {
    Incompatible,
    Identical,
    /// The first token is an abbreviation of the second (`M.` of `Mikhail`)
    Abbreviates,
    /// The second token is an abbreviation of the first
    AbbreviatedBy,
}

/// Compare two given-name tokens.
///
/// A token ending in `.` abbreviates any token starting with the text before
/// the dot. Empty tokens and a bare `.` only match an equal token.
pub fn token_compatibility(a: &str, b: &str) -> TokenMatch {
    if a == b {
        return TokenMatch::Identical;
    }
    if is_abbreviation_of(a, b) {
        return TokenMatch::Abbreviates;
    }
    if is_abbreviation_of(b, a) {
        return TokenMatch::AbbreviatedBy;
    }
    TokenMatch::Incompatible
}

fn is_abbreviation_of(short: &str, long: &str) -> bool {
    match short.strip_suffix('.') {
        Some(stem) if !stem.is_empty() => long.starts_with(stem),
        _ => false,
    }
}

/// Does `x` carry at least as much given-name information as `y`?
///
/// Every token of `y`, in order, must be covered by a distinct later token of
/// `x` that is identical to it or that it abbreviates. Tokens of `x` may be
/// passed over; a token of `y` that finds no cover fails the whole test.
pub fn permits(x: &[String], y: &[String]) -> bool {
    let mut next = 0;
    for wanted in y {
        let found = x[next..].iter().position(|candidate| {
            matches!(
                token_compatibility(wanted, candidate),
                TokenMatch::Identical | TokenMatch::Abbreviates
            )
        });
        match found {
            Some(offset) => next += offset + 1,
            None => return false,
        }
    }
    true
}

/// Classify how `a` relates to `b`
pub fn compatible(a: &Name, b: &Name) -> Compatibility {
    if a.surname() != b.surname() || a.lineage() != b.lineage() {
        return Compatibility::Incompatible;
    }
    if a.given() == b.given() {
        return Compatibility::Identical;
    }
    match (permits(a.given(), b.given()), permits(b.given(), a.given())) {
        (true, true) => Compatibility::Equivalent,
        (true, false) => Compatibility::Superset,
        (false, true) => Compatibility::Subset,
        (false, false) => Compatibility::Incompatible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(given: &[&str], last: &str) -> Name {
        Name::new(given.to_vec(), last)
    }

    fn tokens(given: &[&str]) -> Vec<String> {
        given.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_token_compatibility() {
        assert_eq!(token_compatibility("M.", "M."), TokenMatch::Identical);
        assert_eq!(token_compatibility("M.", "Mikhail"), TokenMatch::Abbreviates);
        assert_eq!(token_compatibility("Mikhail", "M."), TokenMatch::AbbreviatedBy);
        assert_eq!(token_compatibility("Mi.", "Mikhail"), TokenMatch::Abbreviates);
        assert_eq!(token_compatibility("M.", "J."), TokenMatch::Incompatible);
        assert_eq!(token_compatibility("Mikhail", "Michael"), TokenMatch::Incompatible);
    }

    #[test]
    fn test_degenerate_tokens_do_not_panic() {
        assert_eq!(token_compatibility("", "M."), TokenMatch::Incompatible);
        assert_eq!(token_compatibility(".", "Mikhail"), TokenMatch::Incompatible);
        assert_eq!(token_compatibility("Mikhail", "."), TokenMatch::Incompatible);
        assert_eq!(token_compatibility("", ""), TokenMatch::Identical);
    }

    #[test]
    fn test_abbreviation_is_directional() {
        let short = name(&["M."], "Lukin");
        let long = name(&["Mikhail"], "Lukin");
        assert_eq!(compatible(&short, &long), Compatibility::Subset);
        assert_eq!(compatible(&long, &short), Compatibility::Superset);
    }

    #[test]
    fn test_different_middle_initials_are_incompatible() {
        let a = name(&["M.", "D."], "Lukin");
        let b = name(&["M.", "J."], "Lukin");
        assert_eq!(compatible(&a, &b), Compatibility::Incompatible);
    }

    #[test]
    fn test_surname_or_lineage_mismatch_short_circuits() {
        assert_eq!(
            compatible(&name(&["M."], "Smith"), &name(&["M."], "Lukin")),
            Compatibility::Incompatible
        );
        let senior = name(&["John"], "Smith");
        let junior = name(&["John"], "Smith").with_lineage("Jr.");
        assert_eq!(compatible(&senior, &junior), Compatibility::Incompatible);
    }

    #[test]
    fn test_extra_middle_name_carries_more_information() {
        let short = name(&["M."], "Lukin");
        let long = name(&["Mikhail", "Deluxe"], "Lukin");
        assert_eq!(compatible(&long, &short), Compatibility::Superset);
        assert_eq!(compatible(&short, &long), Compatibility::Subset);
    }

    #[test]
    fn test_identical_and_equivalent() {
        let a = name(&["M.", "D."], "Lukin");
        assert_eq!(compatible(&a, &a.clone()), Compatibility::Identical);

        // Each side spells out a token the other only abbreviates
        let b = name(&["Mikhail", "D."], "Lukin");
        let c = name(&["M.", "Dmitri"], "Lukin");
        assert_eq!(compatible(&b, &c), Compatibility::Incompatible);

        let d = name(&["M.", "M."], "Lukin");
        let e = name(&["M."], "Lukin");
        assert_eq!(compatible(&d, &e), Compatibility::Superset);

        // Tokens that abbreviate each other
        let f = name(&["M.."], "Lukin");
        let g = name(&["M."], "Lukin");
        assert_eq!(compatible(&f, &g), Compatibility::Equivalent);
    }

    #[test]
    fn test_surname_only_names() {
        let bare = name(&[], "Feynman");
        let full = name(&["Richard", "P."], "Feynman");
        assert_eq!(compatible(&full, &bare), Compatibility::Superset);
        assert_eq!(compatible(&bare, &bare.clone()), Compatibility::Identical);
    }

    #[test]
    fn test_permits_does_not_reuse_positions() {
        assert!(permits(&tokens(&["Mikhail", "Dmitri"]), &tokens(&["M.", "D."])));
        assert!(!permits(&tokens(&["Mikhail"]), &tokens(&["M.", "M."])));
        assert!(!permits(&tokens(&["Dmitri", "Mikhail"]), &tokens(&["M.", "D."])));
        assert!(permits(&tokens(&["A.", "B."]), &[]));
    }

    #[test]
    fn test_reversed() {
        assert_eq!(Compatibility::Superset.reversed(), Compatibility::Subset);
        assert_eq!(Compatibility::Equivalent.reversed(), Compatibility::Equivalent);
        assert!(!Compatibility::Incompatible.is_compatible());
    }
}
