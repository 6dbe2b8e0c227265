//! This module implements the simulation engine. The free functions `initialize`, `step` and
//! `run` operate on a caller-owned `Configuration`; the `TuringMachine` struct wraps them with
//! a step counter for hosts that drive a machine interactively.

use crate::types::{Configuration, Definition, Step, Symbol, Tape, Transition};
use tracing::{debug, trace};

/// Builds the starting configuration for `input`.
///
/// The input is placed on tape 0 starting at position 0, all other tapes start empty, every
/// head sits at position 0 and the machine is in its initial state. The input is assumed to
/// have been checked against the input alphabet already.
pub fn initialize(definition: &Definition, input: &str) -> Configuration {
    let tapes = (0..definition.tape_count)
        .map(|i| match i {
            0 => Tape::with_content(input, definition.blank),
            _ => Tape::new(definition.blank),
        })
        .collect();

    Configuration {
        state: definition.initial_state.clone(),
        tapes,
    }
}

/// Finds the first transition, in declaration order, that applies to `configuration`.
///
/// A transition applies when it leaves the current state and each of its read patterns
/// accepts the symbol under the corresponding head.
pub fn find_transition<'a>(
    definition: &'a Definition,
    configuration: &Configuration,
) -> Option<&'a Transition> {
    definition.transitions.iter().find(|t| {
        t.from_state == configuration.state
            && t.read
                .iter()
                .zip(&configuration.tapes)
                .all(|(pattern, tape)| pattern.matches(tape.read(), definition.blank))
    })
}

/// Applies `transition` to `configuration`: writes, then moves every head, then switches state.
///
/// Each tape is updated from its own head only, so the order tapes are visited in is irrelevant.
pub fn apply(configuration: &mut Configuration, transition: &Transition) {
    for ((tape, write), &direction) in configuration
        .tapes
        .iter_mut()
        .zip(&transition.write)
        .zip(&transition.directions)
    {
        if let Symbol::Literal(symbol) = *write {
            tape.write(symbol);
        }
        tape.shift(direction);
    }

    configuration.state.clone_from(&transition.next_state);
}

/// Executes a single step.
///
/// # Returns
///
/// * `true` if a transition matched and was applied.
/// * `false` if nothing matched. The machine has halted and `configuration` is untouched.
pub fn step(definition: &Definition, configuration: &mut Configuration) -> bool {
    match find_transition(definition, configuration) {
        Some(transition) => {
            trace!(%transition, "applying transition");
            apply(configuration, transition);
            true
        }
        None => false,
    }
}

/// Steps `configuration` until no transition matches and returns the number of steps taken.
///
/// There is no step bound: a machine that never halts keeps this running forever. Use
/// `TuringMachine::run_for` to impose a limit.
pub fn run(definition: &Definition, configuration: &mut Configuration) -> usize {
    let mut steps = 0;
    while step(definition, configuration) {
        steps += 1;
    }

    debug!(steps, state = %configuration.state, "machine halted");
    steps
}

/// Represents a running multi-tape Turing Machine.
///
/// The machine borrows its `Definition`, so one parsed definition can drive any number of
/// machines on different inputs.
pub struct TuringMachine<'a> {
    definition: &'a Definition,
    input: String,
    configuration: Configuration,
    step_count: usize,
}

impl<'a> TuringMachine<'a> {
    /// Creates a new machine positioned at the start configuration for `input`.
    pub fn new(definition: &'a Definition, input: &str) -> Self {
        Self {
            definition,
            input: input.to_string(),
            configuration: initialize(definition, input),
            step_count: 0,
        }
    }

    /// Executes a single step of the Turing Machine's computation.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt` if no transition matches the current configuration.
    pub fn step(&mut self) -> Step {
        if step(self.definition, &mut self.configuration) {
            self.step_count += 1;
            Step::Continue
        } else {
            Step::Halt
        }
    }

    /// Runs the machine until it halts.
    pub fn run(&mut self) -> Step {
        while self.step() == Step::Continue {}

        debug!(steps = self.step_count, state = %self.state(), "machine halted");
        Step::Halt
    }

    /// Runs the machine for at most `max_steps` further steps.
    ///
    /// Returns `Step::Continue` if the machine was still running when the limit was reached.
    pub fn run_for(&mut self, max_steps: usize) -> Step {
        for _ in 0..max_steps {
            if self.step() == Step::Halt {
                return Step::Halt;
            }
        }

        if self.is_halted() {
            Step::Halt
        } else {
            Step::Continue
        }
    }

    /// Resets the machine to the start configuration for its input.
    pub fn reset(&mut self) {
        self.configuration = initialize(self.definition, &self.input);
        self.step_count = 0;
    }

    /// Checks if no transition matches the current configuration.
    pub fn is_halted(&self) -> bool {
        find_transition(self.definition, &self.configuration).is_none()
    }

    /// Checks if the current state is one of the definition's final states.
    pub fn is_final(&self) -> bool {
        self.definition.is_final(self.state())
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.configuration.state
    }

    /// Returns the current configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Consumes the machine, returning its configuration.
    pub fn into_configuration(self) -> Configuration {
        self.configuration
    }

    /// Returns the total number of steps executed by the Turing Machine.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}
