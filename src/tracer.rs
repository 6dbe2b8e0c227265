//! This module drives a simulation step by step and reports every intermediate configuration
//! to an `Observer`. It owns no formatting; presenting the configurations is up to the observer.

use crate::machine::TuringMachine;
use crate::types::{Configuration, Definition, Step};

/// Receives the configurations of a traced run.
pub trait Observer {
    /// Called before every step attempt with the number of steps applied so far.
    fn on_step(&mut self, step: usize, configuration: &Configuration);

    /// Called once the machine has halted.
    fn on_halt(&mut self, steps: usize, configuration: &Configuration);
}

/// Runs `definition` on `input`, reporting each configuration to `observer`.
///
/// The observer sees the configuration before every step attempt, including the final
/// attempt that finds no matching transition, and then once more through `on_halt`.
/// The counter only advances after a transition was applied.
pub fn simulate_and_trace<O: Observer + ?Sized>(
    definition: &Definition,
    input: &str,
    observer: &mut O,
) -> Configuration {
    let mut machine = TuringMachine::new(definition, input);
    trace(&mut machine, observer, None);
    machine.into_configuration()
}

/// Steps `machine` while reporting to `observer`, for at most `max_steps` further steps.
///
/// # Returns
///
/// * `Step::Halt` once no transition matches; `on_halt` has been called.
/// * `Step::Continue` if the limit was reached first. `on_halt` is not called, and the
///   current configuration is left for the next call to report, so a resumed trace yields
///   the same sequence as a single unbounded one.
pub fn trace<O: Observer + ?Sized>(
    machine: &mut TuringMachine,
    observer: &mut O,
    max_steps: Option<usize>,
) -> Step {
    let limit = max_steps.map(|max| machine.step_count().saturating_add(max));

    loop {
        if limit.is_some_and(|limit| machine.step_count() >= limit) && !machine.is_halted() {
            return Step::Continue;
        }

        observer.on_step(machine.step_count(), machine.configuration());

        if machine.step() == Step::Halt {
            break;
        }
    }

    observer.on_halt(machine.step_count(), machine.configuration());
    Step::Halt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[derive(Default)]
    struct Recorder {
        steps: Vec<(usize, String, i64)>,
        halted: Option<(usize, String)>,
    }

    impl Observer for Recorder {
        fn on_step(&mut self, step: usize, configuration: &Configuration) {
            self.steps.push((
                step,
                configuration.state.clone(),
                configuration.tapes[0].head(),
            ));
        }

        fn on_halt(&mut self, steps: usize, configuration: &Configuration) {
            self.halted = Some((steps, configuration.tapes[0].occupied()));
        }
    }

    fn definition() -> Definition {
        parse("#Q = {s,t}\n#S = {a}\n#G = {a,b,_}\n#q0 = s\n#B = _\n#N = 1\ns a b r s\ns _ * l t\n")
            .unwrap()
    }

    #[test]
    fn test_trace_reports_every_configuration() {
        let mut recorder = Recorder::default();
        let configuration = simulate_and_trace(&definition(), "aa", &mut recorder);

        assert_eq!(
            recorder.steps,
            vec![
                (0, "s".to_string(), 0),
                (1, "s".to_string(), 1),
                (2, "s".to_string(), 2),
                (3, "t".to_string(), 1),
            ]
        );
        assert_eq!(recorder.halted, Some((3, "bb".to_string())));
        assert_eq!(configuration.state, "t");
    }

    #[test]
    fn test_trace_matches_plain_run() {
        let definition = definition();
        let traced = simulate_and_trace(&definition, "aaa", &mut Recorder::default());

        let mut configuration = crate::machine::initialize(&definition, "aaa");
        crate::machine::run(&definition, &mut configuration);

        assert_eq!(traced, configuration);
    }

    #[test]
    fn test_trace_of_immediately_halting_machine() {
        let mut recorder = Recorder::default();
        simulate_and_trace(&definition(), "b", &mut recorder);

        assert_eq!(recorder.steps, vec![(0, "s".to_string(), 0)]);
        assert_eq!(recorder.halted, Some((0, "b".to_string())));
    }

    #[test]
    fn test_bounded_trace_stops_at_limit() {
        let definition = definition();
        let mut machine = TuringMachine::new(&definition, "aaaa");
        let mut recorder = Recorder::default();

        assert_eq!(trace(&mut machine, &mut recorder, Some(2)), Step::Continue);
        assert_eq!(recorder.steps.len(), 2);
        assert_eq!(recorder.halted, None);
        assert_eq!(machine.step_count(), 2);

        assert_eq!(trace(&mut machine, &mut recorder, None), Step::Halt);
        assert_eq!(recorder.halted, Some((5, "bbbb".to_string())));
    }

    #[test]
    fn test_resumed_trace_reports_each_configuration_once() {
        let definition = definition();
        let mut whole = Recorder::default();
        simulate_and_trace(&definition, "aaaa", &mut whole);

        let mut machine = TuringMachine::new(&definition, "aaaa");
        let mut pieces = Recorder::default();
        assert_eq!(trace(&mut machine, &mut pieces, Some(2)), Step::Continue);
        assert_eq!(trace(&mut machine, &mut pieces, Some(1)), Step::Continue);
        assert_eq!(trace(&mut machine, &mut pieces, None), Step::Halt);

        let counters: Vec<usize> = pieces.steps.iter().map(|(step, _, _)| *step).collect();
        assert_eq!(counters, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(pieces.steps, whole.steps);
        assert_eq!(pieces.halted, whole.halted);
    }

    #[test]
    fn test_bounded_trace_reports_halt_at_limit() {
        let definition = definition();
        let mut machine = TuringMachine::new(&definition, "a");
        let mut recorder = Recorder::default();

        // two steps bring the machine to its halting configuration
        assert_eq!(trace(&mut machine, &mut recorder, Some(2)), Step::Halt);
        assert_eq!(recorder.halted, Some((2, "b".to_string())));
    }
}
