//! Loading automata from textual transition tables.
//!
//! The format is whitespace-separated, in three sections:
//!
//! ```text
//! state_count initial_state final_state_count
//! final_1 ... final_k
//! repeated: from symbol to
//! ```
//!
//! Symbols are single characters; the reserved `'0'` marks an epsilon
//! transition and is only legal in a nondeterministic table. All contract
//! violations the core would fail fast on (out-of-range states, epsilon or
//! duplicated entries in a deterministic table) are rejected here with a
//! structured error instead, so a validated automaton is the only thing
//! that ever reaches the constructors.
//!
//! # Example
//!
//! ```
//! use libautomata::prelude::*;
//!
//! let dfa = parse_dfa("2 0 1\n1\n0 a 1\n1 a 1").unwrap();
//! assert!(dfa.is_accepted("aaa"));
//! ```

use std::io::Read;
use std::str::SplitWhitespace;

use smallvec::SmallVec;
use thiserror::Error;

use crate::automaton::{Dfa, Nfa, StateId, StateSet, Symbol, TransitionMap, EPSILON};

/// Errors raised while reading a transition table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input ended before a required token.
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    /// A token could not be parsed as what the schema requires.
    #[error("invalid token {token:?}: expected {expected}")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// What the schema expected at this position.
        expected: &'static str,
    },

    /// The declared initial state does not fit the declared state count.
    #[error("initial state {initial} out of range for {state_count} states")]
    InitialStateOutOfRange {
        /// The declared initial state.
        initial: StateId,
        /// The declared number of states.
        state_count: u32,
    },

    /// More final states were declared than states exist.
    #[error("{declared} final states declared for {state_count} states")]
    TooManyFinalStates {
        /// The declared number of final states.
        declared: u32,
        /// The declared number of states.
        state_count: u32,
    },

    /// A state in the body is not in `[0, state_count)`.
    #[error("state {state} out of range for {state_count} states")]
    StateOutOfRange {
        /// The offending state.
        state: StateId,
        /// The declared number of states.
        state_count: u32,
    },

    /// The epsilon sentinel appeared in a deterministic table.
    #[error("epsilon symbol '0' is not allowed in a deterministic automaton")]
    EpsilonInDfa,

    /// A `(state, symbol)` pair appeared twice in a deterministic table.
    #[error("duplicate transition from state {state} on symbol {symbol:?}")]
    DuplicateTransition {
        /// The source state of the duplicated pair.
        state: StateId,
        /// The symbol of the duplicated pair.
        symbol: Symbol,
    },

    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn next_token<'a>(
    tokens: &mut SplitWhitespace<'a>,
    what: &'static str,
) -> Result<&'a str, LoadError> {
    tokens.next().ok_or(LoadError::UnexpectedEof(what))
}

fn next_state(
    tokens: &mut SplitWhitespace<'_>,
    what: &'static str,
) -> Result<StateId, LoadError> {
    let token = next_token(tokens, what)?;
    token.parse().map_err(|_| LoadError::InvalidToken {
        token: token.to_string(),
        expected: what,
    })
}

fn next_symbol(
    tokens: &mut SplitWhitespace<'_>,
    what: &'static str,
) -> Result<Symbol, LoadError> {
    let token = next_token(tokens, what)?;
    let mut characters = token.chars();
    match (characters.next(), characters.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(LoadError::InvalidToken {
            token: token.to_string(),
            expected: what,
        }),
    }
}

/// The validated pieces of a table, before kind-specific assembly.
struct Table {
    state_count: u32,
    initial_state: StateId,
    final_states: StateSet,
    transitions: Vec<(StateId, Symbol, StateId)>,
}

fn parse_table(text: &str) -> Result<Table, LoadError> {
    let mut tokens = text.split_whitespace();

    let state_count = next_state(&mut tokens, "state count")?;
    let initial_state = next_state(&mut tokens, "initial state")?;
    let final_count = next_state(&mut tokens, "final state count")?;

    if state_count > 0 && initial_state >= state_count {
        return Err(LoadError::InitialStateOutOfRange {
            initial: initial_state,
            state_count,
        });
    }
    if final_count > state_count {
        return Err(LoadError::TooManyFinalStates {
            declared: final_count,
            state_count,
        });
    }

    let in_range = |state: StateId| -> Result<StateId, LoadError> {
        if state < state_count {
            Ok(state)
        } else {
            Err(LoadError::StateOutOfRange { state, state_count })
        }
    };

    let mut final_states = StateSet::new();
    for _ in 0..final_count {
        final_states.insert(in_range(next_state(&mut tokens, "final state")?)?);
    }

    let mut transitions = Vec::new();
    while let Some(token) = tokens.next() {
        let from = in_range(token.parse().map_err(|_| LoadError::InvalidToken {
            token: token.to_string(),
            expected: "transition source state",
        })?)?;
        let symbol = next_symbol(&mut tokens, "transition symbol")?;
        let to = in_range(next_state(&mut tokens, "transition target state")?)?;
        transitions.push((from, symbol, to));
    }

    Ok(Table {
        state_count,
        initial_state,
        final_states,
        transitions,
    })
}

/// Parse a nondeterministic automaton from a transition table.
///
/// Repeated `(from, symbol)` lines accumulate successors; epsilon entries
/// (`'0'`) are legal and meaningful.
pub fn parse_nfa(text: &str) -> Result<Nfa, LoadError> {
    let table = parse_table(text)?;

    let mut transitions = TransitionMap::new();
    for (from, symbol, to) in table.transitions {
        let targets = transitions
            .entry((from, symbol))
            .or_insert_with(SmallVec::new);
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    Ok(Nfa::new(
        table.state_count,
        table.initial_state,
        table.final_states,
        transitions,
    ))
}

/// Parse a deterministic automaton from a transition table.
///
/// Rejects epsilon entries and duplicated `(from, symbol)` pairs; both are
/// data contract violations in a deterministic table.
pub fn parse_dfa(text: &str) -> Result<Dfa, LoadError> {
    let table = parse_table(text)?;

    let mut transitions = TransitionMap::new();
    for (from, symbol, to) in table.transitions {
        if symbol == EPSILON {
            return Err(LoadError::EpsilonInDfa);
        }
        if transitions
            .insert((from, symbol), SmallVec::from_slice(&[to]))
            .is_some()
        {
            return Err(LoadError::DuplicateTransition {
                state: from,
                symbol,
            });
        }
    }

    Ok(Dfa::new(
        table.state_count,
        table.initial_state,
        table.final_states,
        transitions,
    ))
}

/// Read a deterministic automaton from any reader.
pub fn read_dfa<R: Read>(mut reader: R) -> Result<Dfa, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_dfa(&text)
}

/// Read a nondeterministic automaton from any reader.
pub fn read_nfa<R: Read>(mut reader: R) -> Result<Nfa, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_nfa(&text)
}
