//! Command-line entry: interpret argv, run the command, map to an exit code.

use std::io::Write;

use tracing::debug;

use crate::commands::CommandProvider;
use crate::interpreter::{CommandLineArgumentInterpreter, bind_arguments};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Run the command selected by `argv` and return the process exit code.
///
/// An empty command line shows help. An unknown or ambiguous command shows
/// help and fails. Command errors are written to `out` with their cause
/// chain.
pub fn run<S: AsRef<str>>(provider: &CommandProvider, argv: &[S], out: &mut dyn Write) -> i32 {
    let Some(first) = argv.first() else {
        return run_help(provider, out);
    };

    let interpreter = CommandLineArgumentInterpreter::new(provider.commands());
    let Some(invocation) = interpreter.get_command(argv) else {
        debug!(token = first.as_ref(), "No command matched");
        let _ = writeln!(out, "Unknown command '{}'.", first.as_ref());
        let _ = writeln!(out);
        run_help(provider, out);
        return EXIT_FAILURE;
    };

    match invocation.execute(out) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            debug!(command = invocation.command().descriptor().name(), "Command failed: {e:#}");
            write_error(&e, out);
            EXIT_FAILURE
        }
    }
}

fn run_help(provider: &CommandProvider, out: &mut dyn Write) -> i32 {
    let help = provider.help();
    let arguments = bind_arguments::<&str>(help.descriptor(), &[]);
    match help.execute(&arguments, out) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            write_error(&e, out);
            EXIT_FAILURE
        }
    }
}

fn write_error(error: &anyhow::Error, out: &mut dyn Write) {
    let _ = writeln!(out, "Error: {error}");
    for cause in error.chain().skip(1) {
        let _ = writeln!(out, "  caused by: {cause}");
    }
}
