//! Rendering of simulation results, traces and input errors.

use turing::{Configuration, InputError, Observer, Tape};

const RULE: &str = "---------------------------------------------";

/// Renders a `==== NAME ====` banner line.
fn banner(name: &str) -> String {
    let bar = "=".repeat(20);
    format!("{bar} {name} {bar}")
}

/// Renders the final result: the written span of the first tape.
pub fn render_result(configuration: &Configuration) -> String {
    configuration
        .tapes
        .first()
        .map(Tape::occupied)
        .unwrap_or_default()
}

/// Renders the header printed before a traced run.
pub fn render_start(input: &str) -> String {
    format!("Input: {input}\n{}\n", banner("RUN"))
}

/// Renders one traced configuration.
///
/// Each tape gets an index ruler, its symbols and a head marker, covering the written
/// span plus the head. Symbols are right-aligned under their (absolute) index.
pub fn render_step(step: usize, configuration: &Configuration) -> String {
    let mut out = format!("Step   : {step}\nState  : {}\n", configuration.state);

    for (i, tape) in configuration.tapes.iter().enumerate() {
        let mut index_line = format!("Index{i} :");
        let mut tape_line = format!("Tape{i}  :");
        let mut head_line = format!("Head{i}  :");

        for j in tape.window() {
            let index = j.unsigned_abs().to_string();
            let pad = " ".repeat(index.len());

            index_line.push(' ');
            index_line.push_str(&index);

            tape_line.push_str(&pad);
            tape_line.push(tape.get(j));

            head_line.push_str(&pad);
            head_line.push(if j == tape.head() { '^' } else { ' ' });
        }

        for line in [index_line, tape_line, head_line] {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

/// Renders the footer printed after a traced run halted.
pub fn render_verbose_result(configuration: &Configuration) -> String {
    format!("Result: {}\n{}\n", render_result(configuration), banner("END"))
}

/// Renders the verbose report for an input containing an undeclared symbol.
pub fn render_illegal_input(input: &str, error: &InputError) -> String {
    let InputError::IllegalSymbol { position, .. } = error;

    format!(
        "Input: {input}\n{}\nerror: {error}\nInput: {input}\n       {}^\n{}\n",
        banner("ERR"),
        " ".repeat(*position),
        banner("END")
    )
}

/// Prints every configuration of a traced run to stdout.
pub struct VerbosePrinter;

impl Observer for VerbosePrinter {
    fn on_step(&mut self, step: usize, configuration: &Configuration) {
        print!("{}", render_step(step, configuration));
    }

    fn on_halt(&mut self, _steps: usize, configuration: &Configuration) {
        print!("{}", render_verbose_result(configuration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing::{initialize, parse, run, Direction, Tape, BLANK_SYMBOL};

    fn configuration(tapes: Vec<Tape>) -> Configuration {
        Configuration {
            state: "q0".to_string(),
            tapes,
        }
    }

    #[test]
    fn test_render_result_fills_gaps() {
        let mut tape = Tape::with_content("1", BLANK_SYMBOL);
        tape.shift(Direction::Left);
        tape.shift(Direction::Left);
        tape.write('0');

        assert_eq!(render_result(&configuration(vec![tape])), "0_1");
    }

    #[test]
    fn test_render_result_of_empty_tape() {
        let tapes = vec![Tape::new(BLANK_SYMBOL), Tape::with_content("ab", BLANK_SYMBOL)];
        assert_eq!(render_result(&configuration(tapes)), "");
    }

    #[test]
    fn test_render_step_layout() {
        let configuration = configuration(vec![Tape::with_content("011", BLANK_SYMBOL)]);

        assert_eq!(
            render_step(0, &configuration),
            "Step   : 0\n\
             State  : q0\n\
             Index0 : 0 1 2\n\
             Tape0  : 0 1 1\n\
             Head0  : ^    \n\
             ---------------------------------------------\n"
        );
    }

    #[test]
    fn test_render_step_includes_head_outside_span() {
        let mut tape = Tape::new(BLANK_SYMBOL);
        tape.shift(Direction::Left);

        let rendered = render_step(3, &configuration(vec![tape]));
        assert!(rendered.contains("Index0 : 1\n"));
        assert!(rendered.contains("Tape0  : _\n"));
        assert!(rendered.contains("Head0  : ^\n"));
    }

    #[test]
    fn test_render_step_aligns_wide_indices() {
        let definition = parse(
            "#Q = {s}\n#S = {a}\n#G = {a,_}\n#q0 = s\n#B = _\n#N = 1\ns a * r s\n",
        )
        .unwrap();
        let mut configuration = initialize(&definition, &"a".repeat(11));
        run(&definition, &mut configuration);

        let rendered = render_step(11, &configuration);
        assert!(rendered.contains("Index0 : 0 1 2 3 4 5 6 7 8 9 10 11\n"));
        assert!(rendered.contains("Tape0  : a a a a a a a a a a  a  _\n"));
        assert!(rendered.contains("Head0  :                         ^\n"));
    }

    #[test]
    fn test_render_illegal_input() {
        let error = InputError::IllegalSymbol {
            symbol: '2',
            position: 2,
        };

        assert_eq!(
            render_illegal_input("012", &error),
            "Input: 012\n\
             ==================== ERR ====================\n\
             error: '2' was not declared in the set of input symbols\n\
             Input: 012\n\
             \x20        ^\n\
             ==================== END ====================\n"
        );
    }

    #[test]
    fn test_render_start_and_end() {
        assert_eq!(
            render_start("01"),
            "Input: 01\n==================== RUN ====================\n"
        );

        let configuration = configuration(vec![Tape::with_content("10", BLANK_SYMBOL)]);
        assert_eq!(
            render_verbose_result(&configuration),
            "Result: 10\n==================== END ====================\n"
        );
    }
}
