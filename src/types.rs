//! This module defines the core data structures used throughout the simulator: the parsed
//! machine `Definition`, its `Transition`s, the mutable `Configuration` of a run, and the
//! error types surfaced at the crate boundary.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::Rule;

/// The only blank symbol a definition may declare.
pub const BLANK_SYMBOL: char = '_';
/// The wildcard marker used in transition read/write/move fields.
pub const WILDCARD: char = '*';

/// A parsed and validated Turing machine description.
///
/// Built once by the parser and never mutated afterwards, so a single definition can be
/// shared read-only between any number of simulations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Declared state names (`#Q`).
    pub states: BTreeSet<String>,
    /// Symbols an input string may contain (`#S`).
    pub input_alphabet: BTreeSet<char>,
    /// Symbols that may appear on any tape (`#G`), including the blank.
    pub tape_alphabet: BTreeSet<char>,
    /// State the machine starts in (`#q0`).
    pub initial_state: String,
    /// Symbol held by every cell that was never written (`#B`).
    pub blank: char,
    /// Accepting states (`#F`), possibly empty.
    pub final_states: BTreeSet<String>,
    /// Number of tapes every transition addresses (`#N`).
    pub tape_count: usize,
    /// Transitions in declaration order. The first match wins.
    pub transitions: Vec<Transition>,
}

impl Definition {
    /// Returns the transitions leaving `state`, in declaration order.
    pub fn transitions_from<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.from_state == state)
    }

    /// Checks whether `state` is one of the declared final states.
    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }
}

/// A symbol slot in a transition: either a concrete tape symbol or the wildcard.
///
/// On read the wildcard matches any non-blank symbol, on write it leaves the cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Wildcard,
    Literal(char),
}

impl Symbol {
    /// Checks whether this read pattern accepts the `observed` symbol.
    pub fn matches(self, observed: char, blank: char) -> bool {
        match self {
            Symbol::Wildcard => observed != blank,
            Symbol::Literal(c) => c == observed,
        }
    }

    /// Returns the character used for this symbol in the text format.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Wildcard => WILDCARD,
            Symbol::Literal(c) => c,
        }
    }
}

/// Represents a single transition rule for a Turing Machine.
///
/// `read`, `write` and `directions` always hold exactly `tape_count` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this rule applies in.
    pub from_state: String,
    /// A pattern for the symbol under each tape's head.
    pub read: Vec<Symbol>,
    /// The symbol to write under each tape's head.
    pub write: Vec<Symbol>,
    /// The head movement for each tape.
    pub directions: Vec<Direction>,
    /// The next state the machine transitions to.
    pub next_state: String,
}

impl fmt::Display for Transition {
    /// Formats the transition the way it is written in a definition: `q0 0 1 r q1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let read: String = self.read.iter().map(|s| s.as_char()).collect();
        let write: String = self.write.iter().map(|s| s.as_char()).collect();
        let moves: String = self.directions.iter().map(|d| d.as_char()).collect();

        write!(
            f,
            "{} {read} {write} {moves} {}",
            self.from_state, self.next_state
        )
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the signed offset this direction applies to a head position.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }

    /// Returns the move letter used in the text format.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Stay => WILDCARD,
        }
    }
}

/// A tape that is unbounded in both directions.
///
/// Only written cells are stored; every other index implicitly holds the blank symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
    head: i64,
    blank: char,
}

impl Tape {
    /// Creates an empty tape with its head at position 0.
    pub fn new(blank: char) -> Self {
        Self {
            cells: BTreeMap::new(),
            head: 0,
            blank,
        }
    }

    /// Creates a tape holding `content` at positions `0..content.len()`.
    pub fn with_content(content: &str, blank: char) -> Self {
        let mut tape = Self::new(blank);
        tape.cells = content.chars().zip(0..).map(|(c, i)| (i, c)).collect();
        tape
    }

    /// Returns the symbol at `index`, or the blank symbol if it was never written.
    pub fn get(&self, index: i64) -> char {
        self.cells.get(&index).copied().unwrap_or(self.blank)
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.get(self.head)
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells.insert(self.head, symbol);
    }

    /// Moves the head one cell in `direction`.
    pub fn shift(&mut self, direction: Direction) {
        self.head += direction.offset();
    }

    /// Returns the current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the range between the leftmost and rightmost written cells.
    pub fn span(&self) -> Option<RangeInclusive<i64>> {
        let (&first, _) = self.cells.first_key_value()?;
        let (&last, _) = self.cells.last_key_value()?;
        Some(first..=last)
    }

    /// Returns the written span extended so that it also covers the head.
    pub fn window(&self) -> RangeInclusive<i64> {
        match self.span() {
            Some(span) => (*span.start()).min(self.head)..=(*span.end()).max(self.head),
            None => self.head..=self.head,
        }
    }

    /// Returns the contents of the written span, with blanks for unwritten cells inside it.
    ///
    /// | a | _ | c |   cells 0 and 2 written
    ///   0   1   2     index
    ///
    /// returns "a_c"
    pub fn occupied(&self) -> String {
        self.span()
            .map(|span| span.map(|i| self.get(i)).collect())
            .unwrap_or_default()
    }
}

/// The mutable state of one simulation: the current state name plus one tape per track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: String,
    pub tapes: Vec<Tape>,
}

impl Configuration {
    /// Returns the symbols currently under each tape's head.
    pub fn symbols(&self) -> Vec<char> {
        self.tapes.iter().map(Tape::read).collect()
    }
}

/// Represents the outcome of a Turing Machine execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine applied a transition and may continue.
    Continue,
    /// No transition matched the current configuration.
    Halt,
}

/// Errors raised while reading or parsing a machine definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// A grammar or cross-reference violation, located at the offending line.
    #[error("Syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    /// A whole-definition requirement failed, such as a missing directive.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The definition file could not be read.
    #[error("File error: {0}")]
    File(String),
}

impl FormatError {
    /// Returns the bare cause of the error, without location information.
    pub fn message(&self) -> String {
        match self {
            FormatError::Syntax(e) => match &e.variant {
                pest::error::ErrorVariant::CustomError { message } => message.clone(),
                _ => e.to_string(),
            },
            FormatError::Validation(msg) | FormatError::File(msg) => msg.clone(),
        }
    }
}

/// Errors raised when an input string does not fit a definition's input alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{symbol}' was not declared in the set of input symbols")]
    IllegalSymbol { symbol: char, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let stay: Direction = serde_json::from_str(&stay_json).unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_wildcard_never_matches_blank() {
        assert!(!Symbol::Wildcard.matches(BLANK_SYMBOL, BLANK_SYMBOL));
        assert!(Symbol::Wildcard.matches('0', BLANK_SYMBOL));
        assert!(Symbol::Wildcard.matches('x', BLANK_SYMBOL));
    }

    #[test]
    fn test_literal_matches_only_itself() {
        assert!(Symbol::Literal('_').matches('_', BLANK_SYMBOL));
        assert!(Symbol::Literal('1').matches('1', BLANK_SYMBOL));
        assert!(!Symbol::Literal('1').matches('0', BLANK_SYMBOL));
    }

    #[test]
    fn test_transition_display() {
        let transition = Transition {
            from_state: "q0".to_string(),
            read: vec![Symbol::Literal('a'), Symbol::Wildcard],
            write: vec![Symbol::Wildcard, Symbol::Literal('_')],
            directions: vec![Direction::Left, Direction::Stay],
            next_state: "q1".to_string(),
        };

        assert_eq!(transition.to_string(), "q0 a* *_ l* q1");
    }

    #[test]
    fn test_tape_defaults_to_blank() {
        let tape = Tape::with_content("ab", BLANK_SYMBOL);

        assert_eq!(tape.get(-5), BLANK_SYMBOL);
        assert_eq!(tape.get(0), 'a');
        assert_eq!(tape.get(1), 'b');
        assert_eq!(tape.get(2), BLANK_SYMBOL);
        assert_eq!(tape.read(), 'a');
    }

    #[test]
    fn test_tape_head_moves_past_both_ends() {
        let mut tape = Tape::new(BLANK_SYMBOL);
        tape.shift(Direction::Left);
        tape.shift(Direction::Left);
        assert_eq!(tape.head(), -2);

        tape.write('x');
        assert_eq!(tape.span(), Some(-2..=-2));
        assert_eq!(tape.window(), -2..=-2);

        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        assert_eq!(tape.window(), -2..=1);
    }

    #[test]
    fn test_tape_occupied_fills_gaps() {
        let mut tape = Tape::new(BLANK_SYMBOL);
        assert_eq!(tape.occupied(), "");
        assert_eq!(tape.span(), None);

        tape.write('a');
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        tape.write('c');

        assert_eq!(tape.occupied(), "a_c");
    }

    #[test]
    fn test_error_display() {
        let error = InputError::IllegalSymbol {
            symbol: '2',
            position: 3,
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("'2'"));
        assert!(error_msg.contains("input symbols"));
    }
}
