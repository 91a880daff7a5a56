//! The nondeterministic engine: epsilon closure, symbol moves, and subset
//! construction.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use smallvec::smallvec;

use crate::automaton::{
    Automaton, AutomatonCore, Dfa, StateId, StateSet, Symbol, TransitionMap, EPSILON,
};

/// A nondeterministic finite automaton.
///
/// Transitions may fan out to several successor states, and entries under
/// the reserved [`EPSILON`] symbol denote silent moves consumed during
/// closure computation. Acceptance and word generation delegate to the
/// deterministic engine through [`Nfa::to_dfa`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Nfa {
    core: AutomatonCore,
}

impl Nfa {
    /// Create an NFA from already-validated parts.
    ///
    /// # Panics
    ///
    /// Panics on the construction contract violations listed for
    /// [`AutomatonCore::new`].
    pub fn new(
        state_count: u32,
        initial_state: StateId,
        final_states: StateSet,
        transitions: TransitionMap,
    ) -> Self {
        Nfa {
            core: AutomatonCore::new(state_count, initial_state, final_states, transitions),
        }
    }

    /// The set of states reachable from `state` by zero or more epsilon
    /// moves, including `state` itself.
    ///
    /// Breadth-first over epsilon entries only; an out-of-range state has
    /// an empty closure.
    pub fn lambda_closure(&self, state: StateId) -> StateSet {
        let mut closure = StateSet::new();
        if state >= self.core.state_count {
            return closure;
        }

        let mut visited = vec![false; self.core.state_count as usize];
        let mut queue = VecDeque::new();

        closure.insert(state);
        visited[state as usize] = true;
        queue.push_back(state);

        while let Some(current) = queue.pop_front() {
            if let Some(targets) = self.core.transitions.get(&(current, EPSILON)) {
                for &target in targets {
                    if !visited[target as usize] {
                        visited[target as usize] = true;
                        closure.insert(target);
                        queue.push_back(target);
                    }
                }
            }
        }

        closure
    }

    /// The union of the epsilon closures of every member of `states`.
    pub fn lambda_closure_of(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::new();
        for &state in states {
            closure.extend(self.lambda_closure(state));
        }
        closure
    }

    /// The states directly reachable from `state` by consuming exactly one
    /// occurrence of `symbol`.
    ///
    /// The epsilon symbol is never a valid argument here; silent moves are
    /// the business of [`Nfa::lambda_closure`].
    pub fn move_to(&self, state: StateId, symbol: Symbol) -> StateSet {
        debug_assert_ne!(symbol, EPSILON, "move_to consumes real symbols only");
        self.core
            .transitions
            .get(&(state, symbol))
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The union of [`Nfa::move_to`] over every member of `states`.
    pub fn move_set_to(&self, states: &StateSet, symbol: Symbol) -> StateSet {
        let mut result = StateSet::new();
        for &state in states {
            result.extend(self.move_to(state, symbol));
        }
        result
    }

    /// Subset construction: an equivalent DFA over the same alphabet.
    ///
    /// Starting from the epsilon closure of the initial state, the worklist
    /// of distinct subsets grows by `lambda_closure(move_set_to(subset,
    /// symbol))` for every discovered subset and alphabet symbol. Each
    /// discovered subset becomes one DFA state, numbered by first-discovery
    /// order (the initial subset is DFA state 0); a DFA state is final iff
    /// its subset contains an NFA final state. Only reachable subsets are
    /// ever materialized, so this terminates well below the `2^n` bound in
    /// practice. Degenerate automata determinize to the empty DFA.
    pub fn to_dfa(&self) -> Dfa {
        if !self.core.has_states() || !self.core.has_transitions() {
            return Dfa::default();
        }

        let alphabet = self.core.alphabet();
        let mut subsets: Vec<StateSet> = vec![self.lambda_closure(self.core.initial_state)];
        let mut index_of: FxHashMap<StateSet, StateId> = FxHashMap::default();
        index_of.insert(subsets[0].clone(), 0);
        let mut transitions = TransitionMap::new();

        let mut current = 0;
        while current < subsets.len() {
            for &symbol in &alphabet {
                let target = self.lambda_closure_of(&self.move_set_to(&subsets[current], symbol));
                if target.is_empty() {
                    continue;
                }

                let target_index = match index_of.get(&target) {
                    Some(&index) => index,
                    None => {
                        let index = subsets.len() as StateId;
                        index_of.insert(target.clone(), index);
                        subsets.push(target);
                        index
                    }
                };

                transitions.insert((current as StateId, symbol), smallvec![target_index]);
            }
            current += 1;
        }

        let final_states: StateSet = subsets
            .iter()
            .enumerate()
            .filter(|(_, subset)| self.core.contains_final_state(subset))
            .map(|(index, _)| index as StateId)
            .collect();

        Dfa::new(subsets.len() as u32, 0, final_states, transitions)
    }
}

impl Automaton for Nfa {
    fn core(&self) -> &AutomatonCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AutomatonCore {
        &mut self.core
    }

    /// The empty word is accepted iff the epsilon closure of the initial
    /// state contains a final state; everything else goes through
    /// determinization.
    fn is_accepted(&self, word: &str) -> bool {
        if !self.core.has_states() || !self.core.has_final_states() || !self.core.has_transitions()
        {
            return false;
        }

        if word.is_empty() {
            return self
                .core
                .contains_final_state(&self.lambda_closure(self.core.initial_state));
        }

        self.to_dfa().is_accepted(word)
    }

    fn generate_word(&self, length: usize) -> Option<String> {
        if !self.core.has_states() || !self.core.has_final_states() || !self.core.has_transitions()
        {
            return None;
        }

        self.to_dfa().generate_word(length)
    }

    fn reverse(&mut self) {
        if !self.core.has_states() || !self.core.has_transitions() || !self.core.has_final_states()
        {
            return;
        }

        *self = self.core.reversed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::SmallVec;

    fn nfa_with(
        state_count: u32,
        initial: StateId,
        finals: &[StateId],
        transitions: &[(StateId, Symbol, StateId)],
    ) -> Nfa {
        let mut map = TransitionMap::new();
        for &(from, symbol, to) in transitions {
            let targets = map.entry((from, symbol)).or_insert_with(SmallVec::new);
            if !targets.contains(&to) {
                targets.push(to);
            }
        }
        Nfa::new(state_count, initial, finals.iter().copied().collect(), map)
    }

    fn set(states: &[StateId]) -> StateSet {
        states.iter().copied().collect()
    }

    #[test]
    fn lambda_closure_follows_epsilon_chains() {
        let nfa = nfa_with(
            4,
            0,
            &[3],
            &[(0, EPSILON, 1), (1, EPSILON, 2), (1, 'a', 3), (2, 'b', 3)],
        );
        assert_eq!(nfa.lambda_closure(0), set(&[0, 1, 2]));
        assert_eq!(nfa.lambda_closure(3), set(&[3]));
    }

    #[test]
    fn lambda_closure_survives_epsilon_cycles() {
        let nfa = nfa_with(2, 0, &[1], &[(0, EPSILON, 1), (1, EPSILON, 0)]);
        assert_eq!(nfa.lambda_closure(0), set(&[0, 1]));
    }

    #[test]
    fn move_to_ignores_missing_transitions() {
        let nfa = nfa_with(2, 0, &[1], &[(0, 'a', 1)]);
        assert_eq!(nfa.move_to(0, 'a'), set(&[1]));
        assert!(nfa.move_to(0, 'b').is_empty());
        assert_eq!(nfa.move_set_to(&set(&[0, 1]), 'a'), set(&[1]));
    }

    #[test]
    fn epsilon_reaching_final_accepts_empty_word() {
        // 0 -epsilon-> 1 with 1 final: the empty word is accepted through
        // the closure alone.
        let nfa = nfa_with(2, 0, &[1], &[(0, EPSILON, 1)]);
        assert!(nfa.is_accepted(""));
        assert!(!nfa.is_accepted("a"));
    }

    #[test]
    fn subset_construction_numbers_subsets_by_discovery() {
        // Ends-with-'a' over {a, b}: two reachable subsets.
        let nfa = nfa_with(
            2,
            0,
            &[1],
            &[(0, 'a', 0), (0, 'b', 0), (0, 'a', 1)],
        );
        let dfa = nfa.to_dfa();

        assert_eq!(dfa.state_count(), 2);
        assert_eq!(dfa.initial_state(), 0);
        assert!(!dfa.is_final_state(0));
        assert!(dfa.is_final_state(1));
        assert!(dfa.is_accepted("ba"));
        assert!(dfa.is_accepted("aa"));
        assert!(!dfa.is_accepted("ab"));
    }

    #[test]
    fn acceptance_agrees_with_determinization() {
        let nfa = nfa_with(
            3,
            0,
            &[2],
            &[
                (0, 'a', 0),
                (0, 'b', 0),
                (0, 'a', 1),
                (1, 'b', 2),
            ],
        );
        let dfa = nfa.to_dfa();

        for word in ["", "a", "ab", "aab", "bab", "abb", "ba"] {
            assert_eq!(nfa.is_accepted(word), dfa.is_accepted(word), "word {word:?}");
        }
    }

    #[test]
    fn generate_word_delegates_to_dfa() {
        let nfa = nfa_with(2, 0, &[1], &[(0, EPSILON, 1), (1, 'a', 1)]);
        assert_eq!(nfa.generate_word(2), Some("aa".to_string()));
        assert_eq!(nfa.generate_word(0), Some(String::new()));
    }

    #[test]
    fn reverse_replaces_in_place() {
        let mut nfa = nfa_with(2, 0, &[1], &[(0, 'a', 1), (1, 'b', 1)]);
        assert!(nfa.is_accepted("ab"));

        nfa.reverse();
        assert!(nfa.is_accepted("ba"));
        assert!(!nfa.is_accepted("ab"));
    }

    #[test]
    fn degenerate_nfa_answers_with_sentinels() {
        let empty = Nfa::default();
        assert!(!empty.is_accepted("a"));
        assert_eq!(empty.generate_word(1), None);
        assert_eq!(empty.to_dfa(), Dfa::default());
    }
}
