//! The `run` and `step` commands: execute a file in a debugging session.

use jstep_eval::{ExecutionState, Session, SessionConfig};

use super::{read_file, render_error};

/// Options shared by `run` and `step`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub path: String,
    pub config: SessionConfig,
    /// Print [`ExecutionState`] as JSON instead of text.
    pub json: bool,
}

/// Parse `<file.js> [--max-steps=N] [--lenient] [--json]`, in any order.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut path = None;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--max-steps=") {
            let max_steps = value
                .parse::<usize>()
                .map_err(|_| format!("invalid --max-steps value '{value}'"))?;
            options.config = options.config.max_steps(max_steps);
        } else if arg == "--lenient" {
            options.config = options.config.lenient();
        } else if arg == "--json" {
            options.json = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument '{arg}'"));
        }
    }

    options.path = path.ok_or_else(|| "missing file path".to_string())?;
    Ok(options)
}

/// Run a file to completion. Prints the output lines, then the final
/// variables; returns `false` if execution ended in an error.
pub fn run_file(options: &RunOptions) -> bool {
    let source = read_file(&options.path);
    let mut session = Session::with_source(options.config.clone(), &source);
    session.run_to_end();

    let state = session.state();
    if options.json {
        print_json(state);
    } else {
        for line in &state.output {
            println!("{line}");
        }
        if !state.variables.is_empty() {
            println!();
            print_variables(state, false);
        }
    }
    report_error(options, &source, state)
}

/// Step through a file, printing the state after every step.
pub fn step_file(options: &RunOptions) -> bool {
    let source = read_file(&options.path);
    let mut session = Session::with_source(options.config.clone(), &source);
    let lines: Vec<&str> = source.lines().collect();

    let max_steps = options.config.max_steps;
    while session.can_step() {
        if session.steps() >= max_steps {
            eprintln!("stopped after {max_steps} steps (raise the limit with --max-steps)");
            return false;
        }
        let line = session.state().current_line;
        let printed_output = session.state().output.len();
        session.step();

        let state = session.state();
        if options.json {
            print_json(state);
            continue;
        }

        let text = usize::try_from(line)
            .ok()
            .and_then(|l| lines.get(l.saturating_sub(1)))
            .map_or("", |t| t.trim());
        println!("[{:>4}] {line:>3} | {text}", session.steps());
        for out in state.output.iter().skip(printed_output) {
            println!("       > {out}");
        }
        print_variables(state, true);
    }

    if options.json && session.steps() == 0 {
        print_json(session.state());
    }
    report_error(options, &source, session.state())
}

fn print_json(state: &ExecutionState) {
    match serde_json::to_string(state) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: cannot serialize state: {e}"),
    }
}

fn print_variables(state: &ExecutionState, changed_only: bool) {
    for var in &state.variables {
        if changed_only && !var.changed {
            continue;
        }
        let marker = if var.changed { '*' } else { ' ' };
        println!("       {marker} {} = {} ({})", var.name, var.value, var.value_type);
    }
}

/// Print the terminal error, if any, and report whether execution succeeded.
fn report_error(options: &RunOptions, source: &str, state: &ExecutionState) -> bool {
    match &state.error {
        Some(error) => {
            if !options.json {
                eprint!("{}", render_error(&options.path, source, error));
            }
            false
        }
        None => true,
    }
}
