//! The prompt engine
//!
//! Walks the declared requirements in declaration order, decides per flag
//! whether the user still owes a value, and runs the scalar or list protocol
//! over the command's input and output streams. Unparseable input is handled
//! inside the loop; only exhausted retries and stream failures escape.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::command::Command;
use crate::flag::{Flag, ListValue, ScalarValue, ValueError, ValueMut};
use crate::prompter::RequiredFlag;

/// Invalid attempts tolerated beyond the first before giving up on a flag.
const MAX_RETRIES: usize = 5;

const LIST_INSTRUCTIONS: &str =
    "This flag is a list. Each line you type will be one element in the list. To terminate the list, press Enter.";

const LIST_NEEDS_ONE: &str =
    "You must enter at least one value in this list because this flag is required.";

/// Fatal prompting failure, carrying the name of the flag that was being
/// prompted for.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Flag --{flag}: too many invalid values, giving up")]
    RetriesExceeded { flag: String },

    #[error("Flag --{flag}: input stream closed before a value was entered")]
    InputClosed { flag: String },

    #[error("Flag --{flag}: could not reset list to take user input: {source}")]
    ResetFailed { flag: String, source: ValueError },

    #[error("Flag --{flag}: {source}")]
    Io { flag: String, source: io::Error },
}

/// Prompts, in registration order, for every entry whose flag exists on the
/// executing command and still lacks a user-provided value.
pub(crate) fn run_prompts(
    entries: &[RequiredFlag],
    cmd: &mut dyn Command,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), PromptError> {
    for entry in entries {
        // An inherited requirement may name a flag the executing command
        // does not carry. Such entries are skipped.
        let Some(flag) = cmd.flag_mut(&entry.name) else {
            continue;
        };

        if needs_prompt(&*flag) {
            prompt_for_flag(flag, input, output)?;
        }
    }
    Ok(())
}

/// A flag needs prompting when the caller never set it, or when its current
/// value is only the no-argument default: a suggestion the user has not
/// confirmed. The two states are indistinguishable once the strings match,
/// so a user who genuinely typed the sentinel value is asked again.
fn needs_prompt(flag: &dyn Flag) -> bool {
    if !flag.changed() {
        return true;
    }
    match flag.no_arg_default() {
        Some(sentinel) => flag.value_string() == sentinel,
        None => false,
    }
}

fn prompt_for_flag(
    flag: &mut dyn Flag,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), PromptError> {
    let name = flag.name().to_string();
    let usage = flag.usage().to_string();

    write_banner(output, &name, &usage).map_err(|e| io_failure(&name, e))?;

    match flag.value_mut() {
        ValueMut::Scalar(cell) => prompt_scalar(&name, &usage, cell, input, output),
        ValueMut::List(cell) => prompt_list(&name, &usage, cell, input, output),
    }
}

/// Reads one value for a scalar flag.
///
/// Empty lines reprint the banner and read again without consuming a retry;
/// only lines the cell rejects count against the bound.
fn prompt_scalar(
    name: &str,
    usage: &str,
    cell: &mut dyn ScalarValue,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), PromptError> {
    let mut failures = 0;
    loop {
        if failures > MAX_RETRIES {
            return Err(PromptError::RetriesExceeded {
                flag: name.to_string(),
            });
        }

        let line = match read_input_line(input).map_err(|e| io_failure(name, e))? {
            Some(line) => line,
            None => {
                return Err(PromptError::InputClosed {
                    flag: name.to_string(),
                })
            }
        };

        if line.is_empty() {
            write_banner(output, name, usage).map_err(|e| io_failure(name, e))?;
            continue;
        }

        match cell.set(&line) {
            Ok(()) => return Ok(()),
            Err(err) => {
                writeln!(output, "Invalid value: {}", err).map_err(|e| io_failure(name, e))?;
                failures += 1;
            }
        }
    }
}

/// Reads one element per line for a list flag until an empty line, after
/// discarding any default elements.
///
/// An empty line on an empty list is rejected: the requirement cannot be
/// satisfied by zero elements, so the instructions are reprinted and reading
/// continues. End of input terminates the list like an empty line once at
/// least one element was accepted.
fn prompt_list(
    name: &str,
    usage: &str,
    cell: &mut dyn ListValue,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), PromptError> {
    writeln!(output, "{}", LIST_INSTRUCTIONS).map_err(|e| io_failure(name, e))?;

    // A required list prompts precisely because its current value is unset
    // or a placeholder; merging user input with leftover defaults would keep
    // values the user never chose.
    cell.reset().map_err(|source| PromptError::ResetFailed {
        flag: name.to_string(),
        source,
    })?;

    let mut accepted = 0;
    let mut failures = 0;
    loop {
        if failures > MAX_RETRIES {
            return Err(PromptError::RetriesExceeded {
                flag: name.to_string(),
            });
        }

        let line = match read_input_line(input).map_err(|e| io_failure(name, e))? {
            Some(line) => line,
            None if accepted > 0 => return Ok(()),
            None => {
                return Err(PromptError::InputClosed {
                    flag: name.to_string(),
                })
            }
        };

        if line.is_empty() {
            if accepted > 0 {
                return Ok(());
            }
            writeln!(output, "{}", LIST_NEEDS_ONE).map_err(|e| io_failure(name, e))?;
            write_banner(output, name, usage).map_err(|e| io_failure(name, e))?;
            writeln!(output, "{}", LIST_INSTRUCTIONS).map_err(|e| io_failure(name, e))?;
            continue;
        }

        match cell.append(&line) {
            Ok(()) => accepted += 1,
            Err(err) => {
                writeln!(output, "Invalid value: {}", err).map_err(|e| io_failure(name, e))?;
                failures += 1;
            }
        }
    }
}

fn write_banner(output: &mut dyn Write, name: &str, usage: &str) -> io::Result<()> {
    writeln!(
        output,
        "Flag --{} is required. Please enter a value for this flag.",
        name
    )?;
    writeln!(output, "Usage: {}", usage)
}

/// Reads one line without its trailing newline. Returns `None` once the
/// stream is exhausted.
fn read_input_line(input: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

fn io_failure(name: &str, source: io::Error) -> PromptError {
    PromptError::Io {
        flag: name.to_string(),
        source,
    }
}
