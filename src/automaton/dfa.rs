//! The deterministic engine: acceptance, bounded word search, minimization,
//! and regular-expression synthesis.

use crate::automaton::minimize::{assemble, partition, MinimizationStrategy};
use crate::automaton::{Automaton, AutomatonCore, StateId, StateSet, Symbol, TransitionMap, EPSILON};
use crate::regex::equation::EquationSystem;

/// A deterministic finite automaton.
///
/// Every `(state, symbol)` pair maps to at most one successor state and no
/// entry uses the reserved epsilon symbol; both invariants are checked at
/// construction. Minimization and regular-expression synthesis are defined
/// only on this kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Dfa {
    core: AutomatonCore,
}

impl Dfa {
    /// Create a DFA from already-validated parts.
    ///
    /// # Panics
    ///
    /// Panics on the construction contract violations listed for
    /// [`AutomatonCore::new`], on an epsilon entry, or on a multi-successor
    /// entry. Malformed input from an external source should be rejected by
    /// the loader before it reaches this constructor.
    pub fn new(
        state_count: u32,
        initial_state: StateId,
        final_states: StateSet,
        transitions: TransitionMap,
    ) -> Self {
        let core = AutomatonCore::new(state_count, initial_state, final_states, transitions);
        for ((from, symbol), targets) in &core.transitions {
            assert_ne!(
                *symbol, EPSILON,
                "epsilon transition from state {from} in a deterministic automaton"
            );
            assert!(
                targets.len() == 1,
                "state {from} has {} successors under {symbol:?}",
                targets.len()
            );
        }
        Dfa { core }
    }

    /// The single successor of `state` under `symbol`, if any.
    pub fn transition(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.core
            .transitions
            .get(&(state, symbol))
            .and_then(|targets| targets.first().copied())
    }

    /// Minimize in place with the chosen strategy.
    ///
    /// Unreachable states are pruned first; the surviving states are then
    /// partitioned into the coarsest right-congruence classes (two states
    /// merge iff no distinguishing suffix exists) and each class becomes one
    /// state of the replacement automaton. Both strategies produce the same
    /// partition; they differ only in complexity. Degenerate automata are
    /// left untouched.
    pub fn minimize(&mut self, strategy: MinimizationStrategy) {
        if !self.core.has_states() || !self.core.has_transitions() || !self.core.has_final_states()
        {
            return;
        }

        self.core.remove_unreachable_states();
        let blocks = partition(self, strategy);
        *self = assemble(self, &blocks);
    }

    /// Synthesize a regular expression for the accepted language.
    ///
    /// Arden's-lemma state elimination over the regular-language semiring:
    /// a coefficient matrix of regex fragments and a free-term vector are
    /// built from the transition function, then states are eliminated from
    /// the highest index down, starring self-loops and folding
    /// concatenations and unions. The entry for the initial state is the
    /// answer; the empty string is the sentinel for an automaton that
    /// rejects unconditionally.
    pub fn regular_expression(&self) -> String {
        if !self.core.has_states() || !self.core.has_transitions() || !self.core.has_final_states()
        {
            return String::new();
        }

        EquationSystem::from_dfa(self).solve()
    }

    /// Backtracking search for a word of exactly `remaining` more symbols.
    ///
    /// Transitions leave the map in ascending symbol order, which fixes the
    /// search order and makes the result deterministic.
    fn search_word(&self, state: StateId, remaining: usize, word: &mut String) -> bool {
        if remaining == 0 {
            return self.core.is_final_state(state);
        }

        for (symbol, targets) in self.core.transitions_from(state) {
            word.push(symbol);
            if self.search_word(targets[0], remaining - 1, word) {
                return true;
            }
            word.pop();
        }

        false
    }
}

impl Automaton for Dfa {
    fn core(&self) -> &AutomatonCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AutomatonCore {
        &mut self.core
    }

    /// Deterministic walk from the initial state; a missing transition
    /// rejects immediately. The empty word is accepted iff the initial
    /// state is final.
    fn is_accepted(&self, word: &str) -> bool {
        if !self.core.has_states() || !self.core.has_final_states() || !self.core.has_transitions()
        {
            return false;
        }

        let mut current = self.core.initial_state;
        for symbol in word.chars() {
            match self.transition(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }

        self.core.is_final_state(current)
    }

    fn generate_word(&self, length: usize) -> Option<String> {
        if !self.core.has_states() || !self.core.has_final_states() || !self.core.has_transitions()
        {
            return None;
        }

        let mut word = String::with_capacity(length);
        self.search_word(self.core.initial_state, length, &mut word)
            .then_some(word)
    }

    fn reverse(&mut self) {
        if !self.core.has_states() || !self.core.has_transitions() || !self.core.has_final_states()
        {
            return;
        }

        *self = self.reversed().to_dfa();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    /// The two-state automaton for `aa*`: 0 -a-> 1, 1 -a-> 1, final {1}.
    fn one_or_more_a() -> Dfa {
        dfa_with(2, 0, &[1], &[(0, 'a', 1), (1, 'a', 1)])
    }

    #[test]
    fn acceptance_walks_the_transition_function() {
        let dfa = one_or_more_a();
        assert!(dfa.is_accepted("a"));
        assert!(dfa.is_accepted("aaa"));
        assert!(!dfa.is_accepted(""));
        assert!(!dfa.is_accepted("b"));
    }

    #[test]
    fn empty_word_depends_on_initial_state_finality() {
        let dfa = dfa_with(2, 0, &[0], &[(0, 'a', 1), (1, 'a', 0)]);
        assert!(dfa.is_accepted(""));
        assert!(!dfa.is_accepted("a"));
        assert!(dfa.is_accepted("aa"));
    }

    #[test]
    fn generate_word_finds_the_shortest_witness() {
        let dfa = one_or_more_a();
        assert_eq!(dfa.generate_word(1), Some("a".to_string()));
        assert_eq!(dfa.generate_word(3), Some("aaa".to_string()));
    }

    #[test]
    fn generate_word_backtracks_over_dead_branches() {
        // 'a' leads into a dead end; only "ba" has length two.
        let dfa = dfa_with(
            4,
            0,
            &[2],
            &[(0, 'a', 3), (0, 'b', 1), (1, 'a', 2)],
        );
        assert_eq!(dfa.generate_word(2), Some("ba".to_string()));
        assert_eq!(dfa.generate_word(4), None);
    }

    #[test]
    fn generate_word_zero_length_is_explicit() {
        let accepts_empty = dfa_with(2, 0, &[0], &[(0, 'a', 1)]);
        assert_eq!(accepts_empty.generate_word(0), Some(String::new()));

        let rejects_empty = one_or_more_a();
        assert_eq!(rejects_empty.generate_word(0), None);
    }

    #[test]
    fn regular_expression_for_one_or_more_a() {
        assert_eq!(one_or_more_a().regular_expression(), "aa*");
    }

    #[test]
    fn reverse_yields_the_mirror_language() {
        // Language ab*: reversed is b*a.
        let mut dfa = dfa_with(2, 0, &[1], &[(0, 'a', 1), (1, 'b', 1)]);
        dfa.reverse();

        assert!(dfa.is_accepted("a"));
        assert!(dfa.is_accepted("bba"));
        assert!(!dfa.is_accepted("ab"));
    }

    #[test]
    fn minimize_merges_indistinguishable_states() {
        // States 1 and 2 both lead to the final state 3 under 'b': the
        // classic redundant pair.
        let dfa = dfa_with(
            4,
            0,
            &[3],
            &[
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'b', 3),
                (2, 'b', 3),
                (3, 'a', 3),
                (3, 'b', 3),
            ],
        );

        for strategy in [MinimizationStrategy::Moore, MinimizationStrategy::Hopcroft] {
            let mut minimized = dfa.clone();
            minimized.minimize(strategy);

            assert_eq!(minimized.state_count(), 3, "{strategy:?}");
            for word in ["ab", "bb", "abab", "a", "b", ""] {
                assert_eq!(
                    dfa.is_accepted(word),
                    minimized.is_accepted(word),
                    "{strategy:?} on {word:?}"
                );
            }
        }
    }

    #[test]
    fn minimize_preserves_the_language_of_partial_automata() {
        // Accepts exactly "ac". Missing transitions reject, so state 2 (a
        // reachable dead end) must not merge with states that still lead
        // to acceptance, and both strategies must agree on the result.
        let dfa = dfa_with(4, 0, &[3], &[(0, 'a', 1), (0, 'b', 2), (1, 'c', 3)]);

        for strategy in [MinimizationStrategy::Moore, MinimizationStrategy::Hopcroft] {
            let mut minimized = dfa.clone();
            minimized.minimize(strategy);

            assert_eq!(minimized.state_count(), 4, "{strategy:?}");
            for word in ["ac", "a", "c", "b", "bc", "ab", "abc", "cc", ""] {
                assert_eq!(
                    dfa.is_accepted(word),
                    minimized.is_accepted(word),
                    "{strategy:?} on {word:?}"
                );
            }
        }
    }

    #[test]
    fn minimize_prunes_unreachable_states_first() {
        let dfa = dfa_with(
            3,
            0,
            &[1],
            &[(0, 'a', 1), (1, 'a', 1), (2, 'a', 1)],
        );

        let mut minimized = dfa.clone();
        minimized.minimize(MinimizationStrategy::Hopcroft);
        assert_eq!(minimized.state_count(), 2);
        assert!(minimized.is_accepted("aa"));
    }

    #[test]
    fn brzozowski_agrees_with_partition_strategies() {
        let dfa = dfa_with(
            4,
            0,
            &[3],
            &[
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'b', 3),
                (2, 'b', 3),
                (3, 'a', 3),
                (3, 'b', 3),
            ],
        );

        let reference = dfa.minimized();
        let mut by_refinement = dfa.clone();
        by_refinement.minimize(MinimizationStrategy::Hopcroft);

        assert_eq!(reference.state_count(), by_refinement.state_count());
        for word in ["ab", "bb", "ba", "abba", "abb", ""] {
            assert_eq!(reference.is_accepted(word), by_refinement.is_accepted(word));
        }
    }

    #[test]
    fn degenerate_dfa_answers_with_sentinels() {
        let empty = Dfa::default();
        assert!(!empty.is_accepted(""));
        assert_eq!(empty.generate_word(0), None);
        assert_eq!(empty.regular_expression(), "");

        let mut untouched = empty.clone();
        untouched.minimize(MinimizationStrategy::Moore);
        assert_eq!(untouched, empty);
    }

    #[test]
    #[should_panic(expected = "epsilon transition")]
    fn epsilon_entry_fails_fast() {
        dfa_with(2, 0, &[1], &[(0, EPSILON, 1)]);
    }
}
