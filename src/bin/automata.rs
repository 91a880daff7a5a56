//! CLI driver for the libautomata toolkit.
//!
//! Loads an automaton from a transition-table file and runs one of the
//! core operations against it: acceptance testing, bounded word
//! generation, minimization, reversal, or regular-expression synthesis.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use libautomata::prelude::*;

#[derive(Parser)]
#[command(name = "automata")]
#[command(about = "Classical finite-automata algorithms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    /// Deterministic transition table (no epsilon, unique (state, symbol))
    Dfa,
    /// Nondeterministic transition table ('0' marks epsilon)
    Nfa,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyChoice {
    /// Quadratic distinguishability matrix
    Moore,
    /// Near-linear partition refinement
    Hopcroft,
    /// Reverse-determinize twice (works for NFA input too)
    Brzozowski,
}

#[derive(Subcommand)]
enum Commands {
    /// Test whether the automaton accepts a word
    Accept {
        /// Transition-table file
        #[arg(short, long)]
        file: PathBuf,

        /// Automaton kind
        #[arg(short, long, value_enum, default_value = "dfa")]
        kind: Kind,

        /// The word to test (empty for the empty word)
        #[arg(default_value = "")]
        word: String,
    },

    /// Search for an accepted word of exactly the given length
    Generate {
        /// Transition-table file
        #[arg(short, long)]
        file: PathBuf,

        /// Automaton kind
        #[arg(short, long, value_enum, default_value = "dfa")]
        kind: Kind,

        /// Requested word length
        length: usize,
    },

    /// Minimize a deterministic automaton and print its transition table
    Minimize {
        /// Transition-table file (deterministic)
        #[arg(short, long)]
        file: PathBuf,

        /// Minimization strategy
        #[arg(short, long, value_enum, default_value = "hopcroft")]
        strategy: StrategyChoice,
    },

    /// Reverse the automaton and print its transition table
    Reverse {
        /// Transition-table file
        #[arg(short, long)]
        file: PathBuf,

        /// Automaton kind
        #[arg(short, long, value_enum, default_value = "dfa")]
        kind: Kind,
    },

    /// Synthesize a regular expression for the accepted language
    Regex {
        /// Transition-table file (deterministic)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show basic facts: states, alphabet, reachability
    Info {
        /// Transition-table file
        #[arg(short, long)]
        file: PathBuf,

        /// Automaton kind
        #[arg(short, long, value_enum, default_value = "dfa")]
        kind: Kind,
    },
}

fn load_dfa(path: &PathBuf) -> Result<Dfa> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_dfa(file).with_context(|| format!("parsing {}", path.display()))
}

fn load_nfa(path: &PathBuf) -> Result<Nfa> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_nfa(file).with_context(|| format!("parsing {}", path.display()))
}

/// Print an automaton back out in the transition-table format.
fn print_table(core: &AutomatonCore) {
    let finals: Vec<String> = core.final_states().iter().map(|f| f.to_string()).collect();
    println!(
        "{} {} {}",
        core.state_count(),
        core.initial_state(),
        finals.len()
    );
    if !finals.is_empty() {
        println!("{}", finals.join(" "));
    }
    for (&(from, symbol), targets) in core.transitions() {
        for &to in targets {
            println!("{from} {symbol} {to}");
        }
    }
}

fn run_accept(file: PathBuf, kind: Kind, word: String) -> Result<()> {
    let accepted = match kind {
        Kind::Dfa => load_dfa(&file)?.is_accepted(&word),
        Kind::Nfa => load_nfa(&file)?.is_accepted(&word),
    };
    if accepted {
        println!("{} {:?}", "accepted".green().bold(), word);
    } else {
        println!("{} {:?}", "rejected".red().bold(), word);
    }
    Ok(())
}

fn run_generate(file: PathBuf, kind: Kind, length: usize) -> Result<()> {
    let word = match kind {
        Kind::Dfa => load_dfa(&file)?.generate_word(length),
        Kind::Nfa => load_nfa(&file)?.generate_word(length),
    };
    match word {
        Some(word) => println!("{} {:?}", "found".green().bold(), word),
        None => println!("{} no word of length {length}", "none".yellow().bold()),
    }
    Ok(())
}

fn run_minimize(file: PathBuf, strategy: StrategyChoice) -> Result<()> {
    let mut dfa = load_dfa(&file)?;
    let before = dfa.state_count();
    match strategy {
        StrategyChoice::Moore => dfa.minimize(MinimizationStrategy::Moore),
        StrategyChoice::Hopcroft => dfa.minimize(MinimizationStrategy::Hopcroft),
        StrategyChoice::Brzozowski => dfa = dfa.minimized(),
    }
    eprintln!(
        "{} {} -> {} states",
        "minimized".green().bold(),
        before,
        dfa.state_count()
    );
    print_table(dfa.core());
    Ok(())
}

fn run_reverse(file: PathBuf, kind: Kind) -> Result<()> {
    let reversed = match kind {
        Kind::Dfa => load_dfa(&file)?.reversed(),
        Kind::Nfa => load_nfa(&file)?.reversed(),
    };
    print_table(reversed.core());
    Ok(())
}

fn run_regex(file: PathBuf) -> Result<()> {
    let expression = load_dfa(&file)?.regular_expression();
    if expression.is_empty() {
        println!("{} the automaton rejects every word", "empty".yellow().bold());
    } else {
        println!("{expression}");
    }
    Ok(())
}

fn run_info(file: PathBuf, kind: Kind) -> Result<()> {
    let core = match kind {
        Kind::Dfa => load_dfa(&file)?.core().clone(),
        Kind::Nfa => load_nfa(&file)?.core().clone(),
    };
    let alphabet: String = core.alphabet().into_iter().collect();
    let reachable = core.reachable_states().iter().filter(|&&r| r).count();

    println!("{} {}", "states:".bold(), core.state_count());
    println!("{} {}", "initial:".bold(), core.initial_state());
    println!("{} {:?}", "final:".bold(), core.final_states());
    println!("{} {:?}", "alphabet:".bold(), alphabet);
    println!(
        "{} {}/{}",
        "reachable:".bold(),
        reachable,
        core.state_count()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Accept { file, kind, word } => run_accept(file, kind, word),
        Commands::Generate { file, kind, length } => run_generate(file, kind, length),
        Commands::Minimize { file, strategy } => run_minimize(file, strategy),
        Commands::Reverse { file, kind } => run_reverse(file, kind),
        Commands::Regex { file } => run_regex(file),
        Commands::Info { file, kind } => run_info(file, kind),
    }
}
