//! # libautomata
//!
//! Classical finite-automata algorithms over a finite alphabet:
//! acceptance testing, reachability pruning, NFA-to-DFA subset
//! construction, DFA minimization (Moore's distinguishability matrix and
//! Hopcroft's partition refinement, plus Brzozowski's double-reversal as a
//! strategy-agnostic reference), automaton reversal, bounded-length word
//! generation, and regular-expression synthesis by state elimination
//! (Arden's lemma).
//!
//! Automata are plain values: every conversion produces a new value, and
//! the in-place transforms (`reverse`, `minimize`) compute their full
//! result before replacing anything. Degenerate automata (no states, no
//! final states, no transitions) are valid inputs everywhere and answer
//! with neutral sentinels rather than errors.
//!
//! ## Example
//!
//! ```
//! use libautomata::prelude::*;
//!
//! // 0 -a-> 1, 1 -a-> 1, final {1}: the language aa*.
//! let mut dfa = parse_dfa("2 0 1\n1\n0 a 1\n1 a 1").unwrap();
//!
//! assert!(dfa.is_accepted("aaa"));
//! assert_eq!(dfa.generate_word(2), Some("aa".to_string()));
//! assert_eq!(dfa.regular_expression(), "aa*");
//!
//! dfa.minimize(MinimizationStrategy::Hopcroft);
//! assert!(dfa.is_accepted("a"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
pub mod loader;
pub mod regex;

/// Common imports for convenient usage.
pub mod prelude {
    pub use crate::automaton::{
        Automaton, AutomatonCore, Block, Dfa, MinimizationStrategy, Nfa, StateId, StateSet,
        Symbol, TransitionMap, EPSILON,
    };
    pub use crate::loader::{parse_dfa, parse_nfa, read_dfa, read_nfa, LoadError};
}
