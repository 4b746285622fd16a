//! Host version parsing and comparison.
//!
//! Versions are dot-separated part sequences ("1.8", "1.10.2", and in
//! lexicographical mode "1.0rc"). Comparison is part-by-part and
//! deliberately NOT semver; the order of the length checks in the scan is
//! load-bearing (see [`compare_versions`]) and must not be "fixed".

use std::cmp::Ordering;

/// Flags controlling how version parts are validated and compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Allow trailing letters in a part ("1.0rc") and compare parts as
    /// strings instead of numbers.
    pub lexicographical: bool,
    /// Pad the shorter version with "0" parts before comparing, so that
    /// "1.2" and "1.2.0" are equal.
    pub zero_extend: bool,
}

lazy_static::lazy_static! {
    static ref NUMERIC_PART: regex::Regex = regex::Regex::new(r"^\d+$").unwrap();
    static ref LEXICAL_PART: regex::Regex = regex::Regex::new(r"^\d+[A-Za-z]*$").unwrap();
}

/// Compare two version strings part-by-part, left to right.
///
/// Returns `None` when either operand contains a part that fails
/// validation for the active mode. Callers must treat `None` as "cannot
/// determine, do not gate", never as an ordering.
///
/// Without `zero_extend`, trailing parts break ties asymmetrically: the
/// scan walks the left operand's parts, so `("1.2.0", "1.2")` is
/// `Greater` (the right side runs out mid-scan) while `("1.2", "1.2.0")`
/// is `Less` (the scan finds no difference and the length check runs
/// after it). Downstream gates depend on this exact ordering of checks.
pub fn compare_versions(left: &str, right: &str, options: CompareOptions) -> Option<Ordering> {
    let part_pattern: &regex::Regex = if options.lexicographical {
        &LEXICAL_PART
    } else {
        &NUMERIC_PART
    };

    let mut lhs: Vec<&str> = left.split('.').collect();
    let mut rhs: Vec<&str> = right.split('.').collect();

    if !lhs.iter().chain(rhs.iter()).all(|part| part_pattern.is_match(part)) {
        return None;
    }

    if options.zero_extend {
        while lhs.len() < rhs.len() {
            lhs.push("0");
        }
        while rhs.len() < lhs.len() {
            rhs.push("0");
        }
    }

    for (i, left_part) in lhs.iter().enumerate() {
        let Some(right_part) = rhs.get(i) else {
            return Some(Ordering::Greater);
        };

        let ordering = if options.lexicographical {
            left_part.cmp(right_part)
        } else {
            let l: u128 = left_part.parse().ok()?;
            let r: u128 = right_part.parse().ok()?;
            l.cmp(&r)
        };

        if ordering != Ordering::Equal {
            return Some(ordering);
        }
    }

    if lhs.len() != rhs.len() {
        return Some(Ordering::Less);
    }

    Some(Ordering::Equal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
