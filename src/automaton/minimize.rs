//! DFA minimization strategies.
//!
//! Two interchangeable partitioning strategies live here, both producing
//! the coarsest partition of states into right-congruence classes: the
//! quadratic distinguishability matrix (Moore) and the near-linear
//! partition refinement (Hopcroft). [`Dfa::minimize`] picks one, then
//! rebuilds the automaton from the resulting blocks.
//!
//! Both strategies run over a completed view of the transition function:
//! a partial DFA (missing `(state, symbol)` entries reject) gets a virtual
//! non-final sink state absorbing the missing entries, so a state with no
//! transition under a symbol is distinguishable from one whose transition
//! leads toward acceptance. The sink is stripped from the partition before
//! assembly and never appears in the result.

use smallvec::smallvec;

use crate::automaton::{Automaton, Dfa, StateId, StateSet, Symbol, TransitionMap};

/// Which partitioning strategy [`Dfa::minimize`] runs.
///
/// Both yield the same partition; the choice is a complexity and
/// implementation trade-off, not a semantic one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinimizationStrategy {
    /// Quadratic distinguishability matrix: mark `(final, non-final)`
    /// pairs distinct, then propagate distinctions backwards over the
    /// transition function to a fixpoint.
    Moore,
    /// Partition refinement: split blocks by the predecessor sets of a
    /// worklist of splitter blocks, enqueueing the smaller half.
    Hopcroft,
}

/// One equivalence class of the minimal automaton.
///
/// A transient value produced by partitioning and consumed when the
/// minimized automaton is assembled; never part of persisted state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The original states merged into this class.
    pub states: StateSet,
    /// Whether any member is a final state.
    pub is_final: bool,
}

/// Partition the states of `dfa` with the chosen strategy.
pub(crate) fn partition(dfa: &Dfa, strategy: MinimizationStrategy) -> Vec<Block> {
    match strategy {
        MinimizationStrategy::Moore => moore_partition(dfa),
        MinimizationStrategy::Hopcroft => hopcroft_partition(dfa),
    }
}

/// Successor table of the completed transition function:
/// `table[state][symbol index]` over the ascending alphabet.
///
/// Missing entries resolve to a virtual non-final sink appended after the
/// real states; a total transition function gets no sink row. The sink
/// index is always `dfa.state_count()` when present, and
/// `dfa.transition(sink, _)` is `None`, so the sink self-loops on every
/// symbol without a special case.
fn completed_successors(dfa: &Dfa) -> Vec<Vec<StateId>> {
    let n = dfa.state_count();
    let alphabet: Vec<Symbol> = dfa.alphabet().into_iter().collect();
    let total = dfa.core().transitions().len() == n as usize * alphabet.len();
    let count = if total { n } else { n + 1 };

    let sink = n;
    (0..count)
        .map(|state| {
            alphabet
                .iter()
                .map(|&symbol| dfa.transition(state, symbol).unwrap_or(sink))
                .collect()
        })
        .collect()
}

/// Drop the virtual sink from a partition over the completed states.
///
/// A real dead state may share the sink's class; the class survives with
/// the sink removed. A class holding only the sink disappears, which
/// leaves the corresponding transitions out of the assembled automaton —
/// exactly the missing entries of the original partial function.
fn strip_sink(mut sets: Vec<StateSet>, real_count: u32) -> Vec<StateSet> {
    for set in &mut sets {
        set.retain(|&state| state < real_count);
    }
    sets.retain(|set| !set.is_empty());
    sets
}

/// Distinguishability-matrix partitioning.
///
/// Seeds the matrix with every `(final, non-final)` pair, then propagates:
/// whenever `(p, q)` is distinct and transitions `r -a-> p`, `s -a-> q`
/// exist in the completed function, `(r, s)` becomes distinct too. A
/// worklist of newly distinguished pairs drives the fixpoint. States never
/// marked distinct merge into one block.
fn moore_partition(dfa: &Dfa) -> Vec<Block> {
    let successors = completed_successors(dfa);
    let n = successors.len();
    let symbol_count = successors.first().map_or(0, Vec::len);

    // Reverse edges of the completed function, per (target, symbol index).
    let mut predecessors = vec![vec![Vec::new(); symbol_count]; n];
    for (from, row) in successors.iter().enumerate() {
        for (index, &to) in row.iter().enumerate() {
            predecessors[to as usize][index].push(from as StateId);
        }
    }

    let mut distinct = vec![vec![false; n]; n];
    let mut worklist: Vec<(usize, usize)> = Vec::new();

    for p in 0..n {
        for q in 0..p {
            if dfa.is_final_state(p as StateId) != dfa.is_final_state(q as StateId) {
                distinct[p][q] = true;
                distinct[q][p] = true;
                worklist.push((p, q));
            }
        }
    }

    while let Some((p, q)) = worklist.pop() {
        for index in 0..symbol_count {
            for &r in &predecessors[p][index] {
                for &s in &predecessors[q][index] {
                    let (r, s) = (r as usize, s as usize);
                    if r != s && !distinct[r][s] {
                        distinct[r][s] = true;
                        distinct[s][r] = true;
                        worklist.push((r, s));
                    }
                }
            }
        }
    }

    // Merge: each state joins the block of the first earlier state it is
    // not distinct from; non-distinctness is an equivalence at fixpoint.
    // The sink participates so a real dead state can land in its class.
    let mut block_of: Vec<usize> = vec![usize::MAX; n];
    let mut sets: Vec<StateSet> = Vec::new();
    for state in 0..n {
        match (0..state).find(|&earlier| !distinct[state][earlier]) {
            Some(earlier) => {
                let index = block_of[earlier];
                sets[index].insert(state as StateId);
                block_of[state] = index;
            }
            None => {
                block_of[state] = sets.len();
                sets.push([state as StateId].into_iter().collect());
            }
        }
    }

    strip_sink(sets, dfa.state_count())
        .into_iter()
        .map(|states| Block {
            is_final: dfa.core().contains_final_state(&states),
            states,
        })
        .collect()
}

/// Partition-refinement partitioning.
///
/// Starts from the final/non-final split of the completed states and
/// repeatedly refines: popping a splitter block from the worklist,
/// computing its predecessor set under each symbol of the completed
/// function, and cutting every block that set properly intersects. A
/// block already queued is replaced by both halves; otherwise only the
/// smaller half is queued.
fn hopcroft_partition(dfa: &Dfa) -> Vec<Block> {
    let successors = completed_successors(dfa);
    let n = successors.len() as StateId;
    let symbol_count = successors.first().map_or(0, Vec::len);

    let final_states = dfa.core().final_states().clone();
    let inconclusive: StateSet = (0..n).filter(|s| !final_states.contains(s)).collect();

    let mut partition: Vec<StateSet> = Vec::new();
    if !inconclusive.is_empty() {
        partition.push(inconclusive);
    }
    if !final_states.is_empty() {
        partition.push(final_states);
    }

    let mut worklist: Vec<StateSet> = match partition.as_slice() {
        [lone] => vec![lone.clone()],
        [first, second] => {
            let smaller = if first.len() <= second.len() { first } else { second };
            vec![smaller.clone()]
        }
        _ => Vec::new(),
    };

    while let Some(splitter) = worklist.pop() {
        for index in 0..symbol_count {
            let predecessors: StateSet = (0..n)
                .filter(|&state| splitter.contains(&successors[state as usize][index]))
                .collect();
            if predecessors.is_empty() {
                continue;
            }

            let mut position = 0;
            while position < partition.len() {
                let cut: StateSet = partition[position]
                    .intersection(&predecessors)
                    .copied()
                    .collect();
                if cut.is_empty() || cut.len() == partition[position].len() {
                    position += 1;
                    continue;
                }
                let rest: StateSet = partition[position]
                    .difference(&predecessors)
                    .copied()
                    .collect();

                let whole = std::mem::replace(&mut partition[position], cut.clone());
                partition.insert(position + 1, rest.clone());

                if let Some(queued) = worklist.iter().position(|block| *block == whole) {
                    worklist[queued] = cut;
                    worklist.push(rest);
                } else if cut.len() <= rest.len() {
                    worklist.push(cut);
                } else {
                    worklist.push(rest);
                }

                position += 2;
            }
        }
    }

    strip_sink(partition, dfa.state_count())
        .into_iter()
        .map(|states| Block {
            is_final: dfa.core().contains_final_state(&states),
            states,
        })
        .collect()
}

/// Rebuild a DFA with one state per block.
///
/// Blocks are numbered by their index; the successor of a block under a
/// symbol is the block holding the successor of any member (deterministic
/// single-successor semantics make the choice of member irrelevant). A
/// block whose members all lack a transition under a symbol gets none
/// either.
pub(crate) fn assemble(dfa: &Dfa, blocks: &[Block]) -> Dfa {
    let mut block_of = vec![0 as StateId; dfa.state_count() as usize];
    for (index, block) in blocks.iter().enumerate() {
        for &state in &block.states {
            block_of[state as usize] = index as StateId;
        }
    }

    let alphabet = dfa.alphabet();
    let mut transitions = TransitionMap::new();
    for (index, block) in blocks.iter().enumerate() {
        for &symbol in &alphabet {
            if let Some(target) = block
                .states
                .iter()
                .find_map(|&state| dfa.transition(state, symbol))
            {
                transitions.insert(
                    (index as StateId, symbol),
                    smallvec![block_of[target as usize]],
                );
            }
        }
    }

    let final_states: StateSet = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.is_final)
        .map(|(index, _)| index as StateId)
        .collect();
    let initial_state = block_of[dfa.initial_state() as usize];

    Dfa::new(blocks.len() as u32, initial_state, final_states, transitions)
}
