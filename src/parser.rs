//! This module provides the parser for Turing machine definitions, utilizing the `pest` crate.
//! The grammar in `grammar.pest` splits the text into directive and transition lines; this
//! module validates each line in file order against the directives declared before it and
//! assembles the resulting `Definition`.

use crate::types::{
    Definition, Direction, FormatError, Symbol, Transition, BLANK_SYMBOL, WILDCARD,
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::BTreeSet;
use tracing::debug;

/// Characters that may never be declared as alphabet symbols.
const RESERVED_SYMBOLS: [char; 6] = [' ', ',', ';', '{', '}', WILDCARD];

/// Derives a `PestParser` for the definition grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Parses the given text into a validated `Definition`.
///
/// Lines are processed strictly in order, so every directive may only refer to sets that
/// were declared on earlier lines. A repeated directive replaces the earlier one. Any violation aborts the parse; no partial definition
/// is ever returned.
///
/// # Returns
///
/// * `Ok(Definition)` if the text describes a complete, consistent machine.
/// * `Err(FormatError::Syntax)` pointing at the first offending line.
/// * `Err(FormatError::Validation)` if a required directive is missing.
pub fn parse(input: &str) -> Result<Definition, FormatError> {
    let root = DefinitionParser::parse(Rule::definition, input).map_err(Box::new)?;
    let definition = parse_definition(root)?;

    debug!(
        states = definition.states.len(),
        transitions = definition.transitions.len(),
        tapes = definition.tape_count,
        "parsed definition"
    );

    Ok(definition)
}

/// Walks the classified lines and builds the definition, directive by directive.
fn parse_definition(root: Pairs<Rule>) -> Result<Definition, FormatError> {
    let mut states: Option<BTreeSet<String>> = None;
    let mut input_alphabet: Option<BTreeSet<char>> = None;
    let mut tape_alphabet: Option<BTreeSet<char>> = None;
    let mut initial_state: Option<String> = None;
    let mut blank: Option<char> = None;
    let mut final_states: Option<BTreeSet<String>> = None;
    let mut tape_count: Option<usize> = None;
    let mut transitions = Vec::new();

    let empty_states = BTreeSet::new();
    let empty_symbols = BTreeSet::new();

    for pair in root.flat_map(|definition| definition.into_inner()) {
        let span = pair.as_span();
        let line = pair.as_str().trim();

        match pair.as_rule() {
            Rule::directive => {
                match directive_keyword(&pair) {
                    "#Q" => states = Some(parse_states(line, span)?),
                    "#S" => {
                        let symbols = parse_alphabet(line, span, &[BLANK_SYMBOL])?;
                        if let Some(tape_alphabet) = &tape_alphabet {
                            check_subset(&symbols, tape_alphabet, span)?;
                        }
                        input_alphabet = Some(symbols);
                    }
                    "#G" => {
                        let symbols = parse_alphabet(line, span, &[])?;
                        if let Some(input_alphabet) = &input_alphabet {
                            check_subset(input_alphabet, &symbols, span)?;
                        }
                        tape_alphabet = Some(symbols);
                    }
                    "#q0" => {
                        let state = parse_value(line, span)?;
                        check_state(state, states.as_ref().unwrap_or(&empty_states), span)?;
                        initial_state = Some(state.to_string());
                    }
                    "#B" => {
                        let symbols = tape_alphabet.as_ref().unwrap_or(&empty_symbols);
                        blank = Some(parse_blank(line, symbols, span)?);
                    }
                    "#F" => {
                        let declared = states.as_ref().unwrap_or(&empty_states);
                        let finals = parse_set(line, span)?;
                        for state in &finals {
                            check_state(state, declared, span)?;
                        }
                        final_states = Some(finals.into_iter().map(String::from).collect());
                    }
                    "#N" => {
                        // Parsed transitions are sized by the current count
                        if !transitions.is_empty() {
                            return Err(parse_error(
                                "tape count (#N) cannot be redeclared after transitions",
                                span,
                            ));
                        }
                        tape_count = Some(parse_tape_count(line, span)?);
                    }
                    _ => {} // Grammar only yields the keywords above
                }
            }
            Rule::transition => {
                let tape_count = tape_count.ok_or_else(|| {
                    parse_error("tape count (#N) must be declared before any transition", span)
                })?;

                transitions.push(parse_transition(
                    line,
                    tape_count,
                    states.as_ref().unwrap_or(&empty_states),
                    tape_alphabet.as_ref().unwrap_or(&empty_symbols),
                    span,
                )?);
            }
            _ => {} // Skip EOI
        }
    }

    // Handle mandatory checks
    let states = check_required_directive(states, "#Q")?;
    let tape_alphabet = check_required_directive(tape_alphabet, "#G")?;
    let initial_state = check_required_directive(initial_state, "#q0")?;
    let blank = check_required_directive(blank, "#B")?;
    let tape_count = check_required_directive(tape_count, "#N")?;

    Ok(Definition {
        states,
        input_alphabet: input_alphabet.unwrap_or_default(),
        tape_alphabet,
        initial_state,
        blank,
        final_states: final_states.unwrap_or_default(),
        tape_count,
        transitions,
    })
}

/// Returns the keyword that opens a directive line.
fn directive_keyword<'i>(pair: &Pair<'i, Rule>) -> &'i str {
    pair.clone()
        .into_inner()
        .find(|p| p.as_rule() == Rule::keyword)
        .map_or("", |p| p.as_str())
}

/// Parses a `#Q` line into a non-empty set of state names.
fn parse_states(line: &str, span: Span) -> Result<BTreeSet<String>, FormatError> {
    let items = parse_set(line, span)?;
    if items.is_empty() {
        return Err(parse_error("state set must not be empty", span));
    }

    for item in &items {
        if !item.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(parse_error(
                &format!("invalid character in state name '{item}'"),
                span,
            ));
        }
    }

    Ok(items.into_iter().map(String::from).collect())
}

/// Parses a `#S` or `#G` line into a set of single-character symbols.
///
/// Besides the reserved characters, any character in `excluded` is rejected as well.
fn parse_alphabet(line: &str, span: Span, excluded: &[char]) -> Result<BTreeSet<char>, FormatError> {
    parse_set(line, span)?
        .into_iter()
        .map(|item| {
            let mut chars = item.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !RESERVED_SYMBOLS.contains(&c) && !excluded.contains(&c) => {
                    Ok(c)
                }
                (Some(_), None) => Err(parse_error(
                    &format!("symbol '{item}' is not allowed in this alphabet"),
                    span,
                )),
                _ => Err(parse_error(
                    &format!("alphabet symbol '{item}' must be a single character"),
                    span,
                )),
            }
        })
        .collect()
}

/// Parses the `#B` line. The blank must be `_` and already declared in the tape alphabet.
fn parse_blank(line: &str, tape_alphabet: &BTreeSet<char>, span: Span) -> Result<char, FormatError> {
    let value = parse_value(line, span)?;
    let mut chars = value.chars();

    let blank = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(parse_error(
                "blank symbol must be a single character",
                span,
            ))
        }
    };

    if blank != BLANK_SYMBOL {
        return Err(parse_error(
            &format!("blank symbol must be '{BLANK_SYMBOL}', found '{blank}'"),
            span,
        ));
    }

    if !tape_alphabet.contains(&blank) {
        return Err(parse_error(
            &format!("blank symbol '{blank}' is not declared in the tape alphabet"),
            span,
        ));
    }

    Ok(blank)
}

/// Parses the `#N` line into a positive tape count.
fn parse_tape_count(line: &str, span: Span) -> Result<usize, FormatError> {
    let value = parse_value(line, span)?;
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(parse_error(
            &format!("tape count '{value}' is not a valid integer"),
            span,
        ));
    }

    match value.parse::<usize>() {
        Ok(0) => Err(parse_error("tape count must be positive", span)),
        Ok(count) => Ok(count),
        Err(_) => Err(parse_error(
            &format!("tape count '{value}' is too large"),
            span,
        )),
    }
}

/// Parses a transition line: `from read write moves to`.
fn parse_transition(
    line: &str,
    tape_count: usize,
    states: &BTreeSet<String>,
    tape_alphabet: &BTreeSet<char>,
    span: Span,
) -> Result<Transition, FormatError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [from_state, read, write, moves, next_state] = fields[..] else {
        return Err(parse_error(
            &format!("transition must have exactly 5 fields, found {}", fields.len()),
            span,
        ));
    };

    let read: Vec<char> = read.chars().collect();
    let write: Vec<char> = write.chars().collect();
    let moves: Vec<char> = moves.chars().collect();

    if read.len() != tape_count || write.len() != tape_count || moves.len() != tape_count {
        return Err(parse_error(
            &format!(
                "transition field lengths must match the tape count {tape_count}: read={}, write={}, moves={}",
                read.len(),
                write.len(),
                moves.len()
            ),
            span,
        ));
    }

    check_state(from_state, states, span)?;
    check_state(next_state, states, span)?;

    Ok(Transition {
        from_state: from_state.to_string(),
        read: parse_symbols(&read, tape_alphabet, span)?,
        write: parse_symbols(&write, tape_alphabet, span)?,
        directions: moves
            .iter()
            .map(|&c| parse_direction(c, span))
            .collect::<Result<_, _>>()?,
        next_state: next_state.to_string(),
    })
}

/// Parses the per-tape symbols of a transition field.
fn parse_symbols(
    symbols: &[char],
    tape_alphabet: &BTreeSet<char>,
    span: Span,
) -> Result<Vec<Symbol>, FormatError> {
    symbols
        .iter()
        .map(|&c| match c {
            WILDCARD => Ok(Symbol::Wildcard),
            c if tape_alphabet.contains(&c) => Ok(Symbol::Literal(c)),
            c => Err(parse_error(
                &format!("symbol '{c}' is not declared in the tape alphabet"),
                span,
            )),
        })
        .collect()
}

/// Parses a single move letter.
///
/// Supports 'l' for Left, 'r' for Right, and '*' for Stay.
fn parse_direction(c: char, span: Span) -> Result<Direction, FormatError> {
    match c {
        'l' => Ok(Direction::Left),
        'r' => Ok(Direction::Right),
        WILDCARD => Ok(Direction::Stay),
        _ => Err(parse_error(&format!("unsupported direction: {c}"), span)),
    }
}

/// Splits a set directive into its trimmed, deduplicated items.
///
/// Only `{}` is the empty set; any empty item, including `{ }`, is an error.
fn parse_set<'a>(line: &'a str, span: Span) -> Result<BTreeSet<&'a str>, FormatError> {
    let value = parse_value(line, span)?;
    let inner = value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .ok_or_else(|| parse_error("set must be enclosed in braces", span))?;

    if inner.is_empty() {
        return Ok(BTreeSet::new());
    }

    inner
        .split(',')
        .map(str::trim)
        .map(|item| match item {
            "" => Err(parse_error("empty item in set", span)),
            item => Ok(item),
        })
        .collect()
}

/// Returns the trimmed value after the single ` = ` of a directive line.
fn parse_value<'a>(line: &'a str, span: Span) -> Result<&'a str, FormatError> {
    match line.split_once(" = ") {
        Some((_, value)) if !value.contains(" = ") => Ok(value.trim()),
        _ => Err(parse_error(
            "directive must contain exactly one ' = '",
            span,
        )),
    }
}

/// Checks that `state` was declared in `#Q`.
fn check_state(state: &str, states: &BTreeSet<String>, span: Span) -> Result<(), FormatError> {
    if !states.contains(state) {
        return Err(parse_error(
            &format!("state '{state}' is not declared in the state set"),
            span,
        ));
    }

    Ok(())
}

/// Checks that every input symbol also belongs to the tape alphabet.
fn check_subset(
    input_alphabet: &BTreeSet<char>,
    tape_alphabet: &BTreeSet<char>,
    span: Span,
) -> Result<(), FormatError> {
    match input_alphabet.difference(tape_alphabet).next() {
        Some(symbol) => Err(parse_error(
            &format!("input symbol '{symbol}' is not declared in the tape alphabet"),
            span,
        )),
        None => Ok(()),
    }
}

/// Checks if a required directive is present, returning an `Err` if it's missing.
fn check_required_directive<T>(value: Option<T>, keyword: &str) -> Result<T, FormatError> {
    value.ok_or_else(|| FormatError::Validation(format!("missing {keyword} declaration")))
}

/// Creates a `FormatError::Syntax` from a message and the `Span` of the offending line.
fn parse_error(msg: &str, span: Span) -> FormatError {
    FormatError::Syntax(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
