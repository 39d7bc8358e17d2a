use log::debug;
use serde::Serialize;

use super::vocabulary::PacsVocabulary;

/// Separator between units of a PACS keyword string
pub const UNIT_SEPARATOR: &str = ", ";

/// Result of splitting a keyword string into vocabulary codes and leftovers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Segmentation {
    /// Resolved codes, in source order
    pub codes: Vec<String>,
    /// Unresolved phrases, in source order
    pub leftover: Vec<String>,
    /// Number of units left unresolved
    pub cost: usize,
}

impl Segmentation {
    pub fn is_fully_resolved(&self) -> bool {
        self.leftover.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    start: usize,
    resolved: bool,
    cost: usize,
}

/// Split `s` into the fewest unresolved units.
///
/// `s` is a `", "`-separated list in which a run of consecutive units may form
/// one vocabulary phrase (PACS names contain commas themselves). Each prefix of
/// the unit list gets its cheapest covering: a recognised phrase adds nothing,
/// an unrecognised fragment adds one per unit. Among equally cheap choices the
/// shortest trailing fragment wins, so leftovers always come out one unit each.
/// Never fails: with no match at all every unit is a leftover.
pub fn segment(s: &str, vocabulary: &PacsVocabulary) -> Segmentation {
    if s.is_empty() {
        return Segmentation::default();
    }

    let units: Vec<&str> = s.split(UNIT_SEPARATOR).collect();
    let n = units.len();

    let mut best: Vec<Step> = Vec::with_capacity(n + 1);
    best.push(Step { start: 0, resolved: false, cost: 0 });

    for cur in 1..=n {
        let mut chosen = Step { start: cur - 1, resolved: false, cost: usize::MAX };
        for len in 1..=cur {
            let start = cur - len;
            let phrase = units[start..cur].join(UNIT_SEPARATOR);
            let resolved = vocabulary.code_for(&phrase).is_some();
            let cost = best[start].cost + if resolved { 0 } else { len };
            if cost < chosen.cost {
                chosen = Step { start, resolved, cost };
            }
        }
        best.push(chosen);
    }

    let mut codes = Vec::new();
    let mut leftover = Vec::new();
    let mut cur = n;
    while cur > 0 {
        let step = best[cur];
        let phrase = units[step.start..cur].join(UNIT_SEPARATOR);
        match vocabulary.code_for(&phrase) {
            Some(code) if step.resolved => codes.push(code.to_string()),
            _ => leftover.push(phrase),
        }
        cur = step.start;
    }
    codes.reverse();
    leftover.reverse();

    debug!(
        "Segmented {} units into {} codes and {} leftovers",
        n,
        codes.len(),
        leftover.len()
    );

    Segmentation {
        codes,
        leftover,
        cost: best[n].cost,
    }
}
