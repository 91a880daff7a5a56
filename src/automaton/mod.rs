//! Finite-automata representations and the shared capability seam.
//!
//! This module provides the two automaton kinds ([`Dfa`] and [`Nfa`]), the
//! storage they share ([`AutomatonCore`]), and the [`Automaton`] trait that
//! exposes the operations common to both: acceptance testing, bounded word
//! generation, reachability pruning, and reversal.
//!
//! The two kinds are deliberately kept as concrete types behind a shared
//! trait rather than an inheritance-style hierarchy: the only behavior they
//! genuinely share is reachability and final-state bookkeeping over a common
//! transition relation.

pub mod core;
pub mod dfa;
pub mod minimize;
pub mod nfa;

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

pub use self::core::AutomatonCore;
pub use self::dfa::Dfa;
pub use self::minimize::{Block, MinimizationStrategy};
pub use self::nfa::Nfa;

/// A state identifier, dense in `[0, state_count)`.
pub type StateId = u32;

/// One input symbol from a finite alphabet.
pub type Symbol = char;

/// An ordered set of states.
///
/// Ordered so that subsets discovered during determinization compare and
/// hash structurally, and so iteration over members is deterministic.
pub type StateSet = BTreeSet<StateId>;

/// The transition relation: `(state, symbol)` to successor states.
///
/// A [`Dfa`] stores exactly one successor per key and never uses
/// [`EPSILON`]; an [`Nfa`] may store several successors and epsilon
/// entries. The ordered map gives every traversal a fixed ascending
/// `(state, symbol)` order, which word generation relies on.
pub type TransitionMap = BTreeMap<(StateId, Symbol), SmallVec<[StateId; 1]>>;

/// The reserved symbol marking an epsilon/lambda transition.
///
/// Only meaningful inside an [`Nfa`]; it must never appear as a real
/// alphabet symbol in a [`Dfa`].
pub const EPSILON: Symbol = '0';

/// Capabilities shared by both automaton kinds.
///
/// Required methods cover the polymorphic operations whose implementations
/// differ between the deterministic and nondeterministic engines; the
/// provided methods delegate to the shared [`AutomatonCore`] queries.
///
/// Every operation treats a degenerate automaton (no states, no final
/// states, or no transitions) as a valid empty automaton and answers with
/// a neutral sentinel instead of erroring.
pub trait Automaton {
    /// Shared state and transition storage.
    fn core(&self) -> &AutomatonCore;

    /// Mutable access to the shared storage.
    fn core_mut(&mut self) -> &mut AutomatonCore;

    /// Whether the automaton accepts the given word.
    fn is_accepted(&self, word: &str) -> bool;

    /// Search for any accepted word of exactly `length` symbols.
    ///
    /// Returns `None` when no accepted word of that length exists. A
    /// request for length zero answers the empty-word question explicitly:
    /// `Some(String::new())` iff the empty word is accepted.
    fn generate_word(&self, length: usize) -> Option<String>;

    /// Replace this automaton with one accepting the reversed language.
    ///
    /// The full result is computed before any field is overwritten, so the
    /// automaton is never observable half-updated.
    fn reverse(&mut self);

    /// Whether the automaton has any states at all.
    fn has_states(&self) -> bool {
        self.core().has_states()
    }

    /// Whether the automaton has any final states.
    fn has_final_states(&self) -> bool {
        self.core().has_final_states()
    }

    /// Whether the automaton has any transitions.
    fn has_transitions(&self) -> bool {
        self.core().has_transitions()
    }

    /// Number of states.
    fn state_count(&self) -> u32 {
        self.core().state_count()
    }

    /// The initial state.
    fn initial_state(&self) -> StateId {
        self.core().initial_state()
    }

    /// Whether `state` is a final state.
    fn is_final_state(&self, state: StateId) -> bool {
        self.core().is_final_state(state)
    }

    /// The distinct non-epsilon symbols used by the transition relation.
    fn alphabet(&self) -> BTreeSet<Symbol> {
        self.core().alphabet()
    }

    /// Depth-first reachability from the initial state.
    ///
    /// Returns one flag per state; empty for a zero-state automaton.
    fn reachable_states(&self) -> Vec<bool> {
        self.core().reachable_states()
    }

    /// Remove a single state, renumbering the survivors contiguously.
    fn remove_state(&mut self, state: StateId) {
        self.core_mut().remove_state(state)
    }

    /// Drop every state not reachable from the initial state.
    fn remove_unreachable_states(&mut self) {
        self.core_mut().remove_unreachable_states()
    }

    /// A new NFA accepting the reversed language, leaving `self` untouched.
    fn reversed(&self) -> Nfa {
        self.core().reversed()
    }

    /// Brzozowski minimization: reverse, determinize, reverse, determinize.
    ///
    /// Works on either automaton kind and always yields a minimal DFA,
    /// because determinizing a reversed automaton merges states that are
    /// equivalent in the original. Useful as a strategy-agnostic reference
    /// for the dedicated DFA minimization strategies.
    fn minimized(&self) -> Dfa {
        self.reversed().to_dfa().reversed().to_dfa()
    }
}
