//! The linear-equation view of a DFA over the regular-language semiring.
//!
//! A DFA induces one language equation per state: `X_i = Σ A[i][j]·X_j +
//! B[i]`, where `A[i][j]` is the union of symbols labeling `i -> j` and
//! `B[i]` is the empty word for final states. Solving the system by
//! Gauss-style elimination, with Arden's lemma (`X = AX + B  =>  X = A*B`)
//! resolving self-loops, leaves the regular expression of the language
//! accepted from the initial state in `B[0]`.
//!
//! Both matrices are per-call scratch values; nothing is retained across
//! calls.

use std::borrow::Cow;
use std::mem;

use crate::automaton::{Automaton, Dfa, StateId};
use crate::regex::{parenthesize, star};

/// The token marking "empty word" in a free term.
///
/// Distinct from every user alphabet symbol, in particular from the
/// reserved `'0'` epsilon sentinel of NFA transition tables.
pub(crate) const EMPTY_WORD: &str = "ε";

/// Union of two fragments; the empty fragment is the absorbing "no term"
/// side and simply loses.
fn union(left: &str, right: &str) -> String {
    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left.to_string();
    }
    format!("{left}+{right}")
}

/// Whether a fragment contains a union operator outside any parentheses.
fn has_top_level_union(fragment: &str) -> bool {
    let mut depth = 0u32;
    for character in fragment.chars() {
        match character {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Group a fragment for use as a concatenation operand.
fn grouped(fragment: &str) -> Cow<'_, str> {
    if has_top_level_union(fragment) {
        Cow::Owned(parenthesize(fragment))
    } else {
        Cow::Borrowed(fragment)
    }
}

/// Concatenation of two non-empty fragments, parenthesizing any side whose
/// top-level union would otherwise change precedence.
fn concat(left: &str, right: &str) -> String {
    format!("{}{}", grouped(left), grouped(right))
}

/// Per-call scratch system: an `n x n` coefficient matrix and an `n`-entry
/// free-term vector of regex fragments. The empty string denotes "no term".
pub(crate) struct EquationSystem {
    coefficients: Vec<Vec<String>>,
    free_terms: Vec<String>,
}

impl EquationSystem {
    /// Build the system for a DFA.
    ///
    /// Several symbols labeling the same `i -> j` edge union into one cell
    /// (`a+b`); final states get the empty-word token as their free term.
    pub(crate) fn from_dfa(dfa: &Dfa) -> Self {
        let n = dfa.state_count() as usize;
        let mut coefficients = vec![vec![String::new(); n]; n];
        for (&(from, symbol), targets) in dfa.core().transitions() {
            let cell = &mut coefficients[from as usize][targets[0] as usize];
            *cell = union(cell, &symbol.to_string());
        }

        let free_terms = (0..n as StateId)
            .map(|state| {
                if dfa.is_final_state(state) {
                    EMPTY_WORD.to_string()
                } else {
                    String::new()
                }
            })
            .collect();

        EquationSystem {
            coefficients,
            free_terms,
        }
    }

    /// Eliminate every state from the highest index down; the free term of
    /// state 0 is the answer (empty when the automaton rejects everything).
    pub(crate) fn solve(mut self) -> String {
        for index in (0..self.free_terms.len()).rev() {
            self.apply_ardens_lemma(index);
            self.eliminate(index);
        }
        self.free_terms.into_iter().next().unwrap_or_default()
    }

    /// Resolve the self-loop of `index` with Arden's lemma: prefix the
    /// state's free term and outgoing coefficients with the starred loop
    /// label, then clear the loop.
    fn apply_ardens_lemma(&mut self, index: usize) {
        let self_loop = mem::take(&mut self.coefficients[index][index]);
        if self_loop.is_empty() {
            return;
        }
        let starred = star(&self_loop);

        if !self.free_terms[index].is_empty() {
            self.free_terms[index] = if self.free_terms[index] == EMPTY_WORD {
                starred.clone()
            } else {
                concat(&starred, &self.free_terms[index])
            };
        }

        for j in 0..self.coefficients.len() {
            if j != index && !self.coefficients[index][j].is_empty() {
                self.coefficients[index][j] = concat(&starred, &self.coefficients[index][j]);
            }
        }
    }

    /// Substitute state `index` away: every edge into it composes with its
    /// outgoing edges and free term, folding as a union into any occupied
    /// destination cell.
    fn eliminate(&mut self, index: usize) {
        let row = self.coefficients[index].clone();
        let free = self.free_terms[index].clone();

        for j in 0..self.coefficients.len() {
            if j == index {
                continue;
            }
            let into = mem::take(&mut self.coefficients[j][index]);
            if into.is_empty() {
                continue;
            }

            for (k, label) in row.iter().enumerate() {
                if label.is_empty() {
                    continue;
                }
                let term = concat(&into, label);
                self.coefficients[j][k] = union(&self.coefficients[j][k], &term);
            }

            if !free.is_empty() {
                let term = if free == EMPTY_WORD {
                    into.clone()
                } else {
                    concat(&into, &free)
                };
                self.free_terms[j] = union(&self.free_terms[j], &term);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{StateSet, Symbol, TransitionMap};
    use smallvec::SmallVec;

    fn dfa_with(
        state_count: u32,
        initial: StateId,
        finals: &[StateId],
        transitions: &[(StateId, Symbol, StateId)],
    ) -> Dfa {
        let mut map = TransitionMap::new();
        for &(from, symbol, to) in transitions {
            map.insert((from, symbol), SmallVec::from_slice(&[to]));
        }
        Dfa::new(state_count, initial, finals.iter().copied().collect(), map)
    }

    #[test]
    fn union_absorbs_the_empty_side() {
        assert_eq!(union("", "a"), "a");
        assert_eq!(union("a", ""), "a");
        assert_eq!(union("a", "b"), "a+b");
    }

    #[test]
    fn concat_groups_top_level_unions() {
        assert_eq!(concat("a", "b"), "ab");
        assert_eq!(concat("a+b", "c"), "(a+b)c");
        assert_eq!(concat("(a+b)*", "c"), "(a+b)*c");
    }

    #[test]
    fn duplicate_edge_labels_union_instead_of_overwriting() {
        // Both 'a' and 'b' go 0 -> 1; the coefficient must keep both.
        let dfa = dfa_with(2, 0, &[1], &[(0, 'a', 1), (0, 'b', 1)]);
        let system = EquationSystem::from_dfa(&dfa);
        assert_eq!(system.coefficients[0][1], "a+b");

        assert_eq!(system.solve(), "a+b");
    }

    #[test]
    fn self_loop_resolves_through_ardens_lemma() {
        let dfa = dfa_with(2, 0, &[1], &[(0, 'a', 1), (1, 'a', 1)]);
        assert_eq!(EquationSystem::from_dfa(&dfa).solve(), "aa*");
    }

    #[test]
    fn final_initial_state_keeps_the_empty_word_term() {
        // Even-length words over {a}: initial state is final.
        let dfa = dfa_with(2, 0, &[0], &[(0, 'a', 1), (1, 'a', 0)]);
        let expression = EquationSystem::from_dfa(&dfa).solve();
        assert_eq!(expression, "(aa)*");
    }

    #[test]
    fn unconditional_rejection_yields_the_empty_sentinel() {
        // A final state exists but cannot be reached.
        let dfa = dfa_with(3, 0, &[2], &[(0, 'a', 1), (1, 'a', 0)]);
        assert_eq!(EquationSystem::from_dfa(&dfa).solve(), "");
    }
}
