//! Shared automaton storage and the queries every algorithm builds on.

use std::collections::BTreeSet;
use std::mem;

use smallvec::SmallVec;

use crate::automaton::nfa::Nfa;
use crate::automaton::{StateId, StateSet, Symbol, TransitionMap, EPSILON};

/// State, final-state, and transition storage common to both automaton kinds.
///
/// States are dense unsigned integers in `[0, state_count)`; the removal
/// operations keep them that way by renumbering survivors contiguously.
/// The deterministic single-successor discipline is layered on top by
/// [`Dfa`](crate::automaton::Dfa), not enforced here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AutomatonCore {
    pub(crate) state_count: u32,
    pub(crate) initial_state: StateId,
    pub(crate) final_states: StateSet,
    pub(crate) transitions: TransitionMap,
}

impl AutomatonCore {
    /// Create storage from already-validated parts.
    ///
    /// # Panics
    ///
    /// Panics when the construction contract is violated: an out-of-range
    /// initial state, final state, or transition endpoint, an empty
    /// successor list, or any of those present on a zero-state automaton.
    /// Malformed input from an external source should be rejected by the
    /// loader before it reaches this constructor.
    pub fn new(
        state_count: u32,
        initial_state: StateId,
        final_states: StateSet,
        transitions: TransitionMap,
    ) -> Self {
        if state_count == 0 {
            assert!(
                final_states.is_empty() && transitions.is_empty(),
                "zero-state automaton cannot carry final states or transitions"
            );
            return AutomatonCore {
                state_count,
                initial_state: 0,
                final_states,
                transitions,
            };
        }

        assert!(
            initial_state < state_count,
            "initial state {initial_state} out of range for {state_count} states"
        );
        assert!(
            final_states.iter().all(|&f| f < state_count),
            "final state out of range for {state_count} states"
        );
        for ((from, _), targets) in &transitions {
            assert!(
                *from < state_count,
                "transition source {from} out of range for {state_count} states"
            );
            assert!(!targets.is_empty(), "transition with no successor states");
            assert!(
                targets.iter().all(|&t| t < state_count),
                "transition target out of range for {state_count} states"
            );
        }

        AutomatonCore {
            state_count,
            initial_state,
            final_states,
            transitions,
        }
    }

    /// Number of states.
    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    /// The initial state.
    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    /// The set of final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// The transition relation.
    pub fn transitions(&self) -> &TransitionMap {
        &self.transitions
    }

    /// Whether any states exist.
    pub fn has_states(&self) -> bool {
        self.state_count != 0
    }

    /// Whether any final states exist.
    pub fn has_final_states(&self) -> bool {
        !self.final_states.is_empty()
    }

    /// Whether any transitions exist.
    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Whether `state` is a final state.
    ///
    /// Out-of-range states are simply not final.
    pub fn is_final_state(&self, state: StateId) -> bool {
        state < self.state_count && self.final_states.contains(&state)
    }

    /// Whether any member of `states` is a final state.
    ///
    /// This is the "is this power-set state accepting" question asked by
    /// subset construction and partition refinement.
    pub fn contains_final_state(&self, states: &StateSet) -> bool {
        states.iter().any(|&s| self.is_final_state(s))
    }

    /// The distinct non-epsilon symbols appearing in the transition relation.
    pub fn alphabet(&self) -> BTreeSet<Symbol> {
        self.transitions
            .keys()
            .map(|&(_, symbol)| symbol)
            .filter(|&symbol| symbol != EPSILON)
            .collect()
    }

    /// All transitions leaving `state`, in ascending symbol order.
    pub fn transitions_from(
        &self,
        state: StateId,
    ) -> impl Iterator<Item = (Symbol, &SmallVec<[StateId; 1]>)> {
        self.transitions
            .range((state, '\0')..=(state, char::MAX))
            .map(|(&(_, symbol), targets)| (symbol, targets))
    }

    /// Depth-first reachability from the initial state.
    ///
    /// Each state is visited at most once regardless of parallel edges;
    /// epsilon transitions count as edges like any other. Returns an empty
    /// vector for a zero-state automaton.
    pub fn reachable_states(&self) -> Vec<bool> {
        if !self.has_states() {
            return Vec::new();
        }

        let mut visited = vec![false; self.state_count as usize];
        let mut stack = vec![self.initial_state];
        visited[self.initial_state as usize] = true;

        while let Some(current) = stack.pop() {
            for (_, targets) in self.transitions_from(current) {
                for &target in targets {
                    if !visited[target as usize] {
                        visited[target as usize] = true;
                        stack.push(target);
                    }
                }
            }
        }

        visited
    }

    /// Remove a single state and renumber the survivors contiguously.
    ///
    /// Every transition touching the state is dropped; every state index
    /// above it shifts down by one, in transition keys, successor lists,
    /// the final-state set, and the initial state. Removing the initial
    /// state or an out-of-range state is a no-op.
    pub fn remove_state(&mut self, state: StateId) {
        if !self.has_states() || state >= self.state_count || state == self.initial_state {
            return;
        }

        let remap = |s: StateId| if s > state { s - 1 } else { s };

        let mut transitions = TransitionMap::new();
        for ((from, symbol), targets) in mem::take(&mut self.transitions) {
            if from == state {
                continue;
            }
            let kept: SmallVec<[StateId; 1]> = targets
                .into_iter()
                .filter(|&t| t != state)
                .map(remap)
                .collect();
            if !kept.is_empty() {
                transitions.insert((remap(from), symbol), kept);
            }
        }

        self.transitions = transitions;
        self.final_states = self
            .final_states
            .iter()
            .filter(|&&f| f != state)
            .map(|&f| remap(f))
            .collect();
        self.initial_state = remap(self.initial_state);
        self.state_count -= 1;
    }

    /// Drop every state not reachable from the initial state.
    ///
    /// An automaton with no transitions at all collapses to its single
    /// initial state, kept final only if it already was.
    pub fn remove_unreachable_states(&mut self) {
        if !self.has_states() {
            return;
        }

        if !self.has_transitions() {
            let was_final = self.is_final_state(self.initial_state);
            self.state_count = 1;
            self.initial_state = 0;
            self.final_states.clear();
            if was_final {
                self.final_states.insert(0);
            }
            return;
        }

        let reachable = self.reachable_states();

        // Dense renumbering over the surviving states.
        let mut remap: Vec<Option<StateId>> = vec![None; self.state_count as usize];
        let mut next = 0;
        for (old, &kept) in reachable.iter().enumerate() {
            if kept {
                remap[old] = Some(next);
                next += 1;
            }
        }

        let mut transitions = TransitionMap::new();
        for ((from, symbol), targets) in mem::take(&mut self.transitions) {
            let Some(new_from) = remap[from as usize] else {
                continue;
            };
            // Every successor of a reachable state is itself reachable.
            let kept: SmallVec<[StateId; 1]> = targets
                .iter()
                .filter_map(|&t| remap[t as usize])
                .collect();
            transitions.insert((new_from, symbol), kept);
        }

        self.transitions = transitions;
        self.final_states = self
            .final_states
            .iter()
            .filter_map(|&f| remap[f as usize])
            .collect();
        self.initial_state = remap[self.initial_state as usize].unwrap_or(0);
        self.state_count = next;
    }

    /// A new NFA accepting the reversed language.
    ///
    /// Every transition `(p, a, q)` becomes `(q, a, p)`. A sole original
    /// final state becomes the new initial state; several original final
    /// states get a fresh initial state with epsilon transitions to each of
    /// them. The sole new final state is the original initial state.
    /// Degenerate automata reverse to the empty NFA.
    pub fn reversed(&self) -> Nfa {
        if !self.has_states() || !self.has_transitions() || !self.has_final_states() {
            return Nfa::default();
        }

        let mut transitions = TransitionMap::new();
        for ((from, symbol), targets) in &self.transitions {
            for &to in targets {
                let predecessors = transitions.entry((to, *symbol)).or_default();
                if !predecessors.contains(from) {
                    predecessors.push(*from);
                }
            }
        }

        let mut state_count = self.state_count;
        let initial_state = if self.final_states.len() == 1 {
            *self.final_states.first().unwrap()
        } else {
            // A reversed automaton needs a single start state: add a fresh
            // one with epsilon transitions to every original final state.
            let fresh = state_count;
            state_count += 1;
            let epsilon_targets = transitions.entry((fresh, EPSILON)).or_default();
            epsilon_targets.extend(self.final_states.iter().copied());
            fresh
        };

        let final_states: StateSet = [self.initial_state].into_iter().collect();
        Nfa::new(state_count, initial_state, final_states, transitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use smallvec::smallvec;

    fn core_with(
        state_count: u32,
        initial: StateId,
        finals: &[StateId],
        transitions: &[(StateId, Symbol, StateId)],
    ) -> AutomatonCore {
        let mut map = TransitionMap::new();
        for &(from, symbol, to) in transitions {
            let targets = map.entry((from, symbol)).or_insert_with(SmallVec::new);
            if !targets.contains(&to) {
                targets.push(to);
            }
        }
        AutomatonCore::new(state_count, initial, finals.iter().copied().collect(), map)
    }

    #[test]
    fn alphabet_excludes_epsilon() {
        let core = core_with(3, 0, &[2], &[(0, 'a', 1), (1, EPSILON, 2), (1, 'b', 2)]);
        let alphabet: Vec<Symbol> = core.alphabet().into_iter().collect();
        assert_eq!(alphabet, vec!['a', 'b']);
    }

    #[test]
    fn reachability_visits_once_despite_parallel_edges() {
        let mut map = TransitionMap::new();
        map.insert((0, 'a'), smallvec![1, 1, 1]);
        map.insert((1, 'b'), smallvec![0]);
        let core = AutomatonCore::new(3, 0, StateSet::new(), map);

        assert_eq!(core.reachable_states(), vec![true, true, false]);
    }

    #[test]
    fn zero_state_core_has_no_reachability() {
        let core = AutomatonCore::default();
        assert!(core.reachable_states().is_empty());
        assert!(!core.is_final_state(0));
    }

    #[test]
    fn remove_state_renumbers_survivors() {
        // 0 -a-> 1 -a-> 2, removing 1 must shift 2 down to 1 and drop the
        // transitions through the removed state.
        let mut core = core_with(3, 0, &[2], &[(0, 'a', 1), (1, 'a', 2), (0, 'b', 2)]);
        core.remove_state(1);

        assert_eq!(core.state_count(), 2);
        let expected: StateSet = [1].into_iter().collect();
        assert_eq!(core.final_states(), &expected);
        assert_eq!(core.transitions().len(), 1);
        assert_eq!(core.transitions()[&(0, 'b')].as_slice(), &[1]);
    }

    #[test]
    fn remove_initial_state_is_a_no_op() {
        let mut core = core_with(2, 0, &[1], &[(0, 'a', 1)]);
        core.remove_state(0);
        assert_eq!(core.state_count(), 2);
    }

    #[test]
    fn remove_unreachable_collapses_transitionless_automaton() {
        let mut core = core_with(4, 2, &[2, 3], &[]);
        core.remove_unreachable_states();

        assert_eq!(core.state_count(), 1);
        assert_eq!(core.initial_state(), 0);
        assert!(core.is_final_state(0));
    }

    #[test]
    fn remove_unreachable_renumbers_contiguously() {
        // State 1 is unreachable; state 2 must become state 1.
        let mut core = core_with(3, 0, &[2], &[(0, 'a', 2), (1, 'a', 2), (2, 'b', 0)]);
        core.remove_unreachable_states();

        assert_eq!(core.state_count(), 2);
        let expected: StateSet = [1].into_iter().collect();
        assert_eq!(core.final_states(), &expected);
        assert!(core.transitions().contains_key(&(0, 'a')));
        assert!(core.transitions().contains_key(&(1, 'b')));
    }

    #[test]
    fn reversed_single_final_state_becomes_initial() {
        let core = core_with(2, 0, &[1], &[(0, 'a', 1), (1, 'a', 1)]);
        let reversed = core.reversed();

        assert_eq!(reversed.state_count(), 2);
        assert_eq!(reversed.initial_state(), 1);
        assert!(reversed.is_final_state(0));
        assert!(reversed.core().transitions().contains_key(&(1, 'a')));
    }

    #[test]
    fn reversed_multiple_final_states_get_fresh_initial() {
        let core = core_with(3, 0, &[1, 2], &[(0, 'a', 1), (0, 'b', 2)]);
        let reversed = core.reversed();

        assert_eq!(reversed.state_count(), 4);
        assert_eq!(reversed.initial_state(), 3);
        let epsilon_targets = &reversed.core().transitions()[&(3, EPSILON)];
        assert_eq!(epsilon_targets.as_slice(), &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "initial state")]
    fn out_of_range_initial_state_fails_fast() {
        AutomatonCore::new(2, 2, StateSet::new(), TransitionMap::new());
    }
}
