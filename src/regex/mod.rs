//! Regular-expression string combinators.
//!
//! Pure helpers with no automaton dependency, used by the state-elimination
//! solver in [`equation`]: wrapping fragments in parentheses, detecting
//! fragments that are already wrapped, and applying the Kleene star with
//! the right precedence (star binds tighter than union and concatenation,
//! so any multi-character fragment that is not already parenthesized must
//! be wrapped before starring).

pub mod equation;

/// Whether `fragment` is fully wrapped by one matching outer pair.
///
/// `(a+b)` is wrapped; `(a)(b)` and `(a)+(b)` are not, even though they
/// start with `(` and end with `)`.
pub fn is_in_parentheses(fragment: &str) -> bool {
    if !fragment.starts_with('(') || !fragment.ends_with(')') {
        return false;
    }

    let mut depth = 0u32;
    for (position, character) in fragment.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                // The outer pair may only close at the very end.
                if depth == 0 && position + 1 < fragment.len() {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0
}

/// Wrap a fragment in parentheses.
pub fn parenthesize(fragment: &str) -> String {
    format!("({fragment})")
}

/// Apply the Kleene star to a fragment.
///
/// A single symbol or an already-parenthesized fragment stars directly;
/// anything else is parenthesized first to avoid changing its meaning.
pub fn star(fragment: &str) -> String {
    let single_symbol = fragment.chars().count() == 1;
    if single_symbol || is_in_parentheses(fragment) {
        format!("{fragment}*")
    } else {
        format!("({fragment})*")
    }
}
