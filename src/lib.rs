//! flag-prompt - Interactive prompting for missing required CLI flags
//!
//! A command can declare some of its flags required. Normally an omitted
//! required flag aborts the run with an error; with a [`Prompter`] the
//! command instead asks the user for each missing value on its input and
//! output streams, showing the flag's usage text as a hint, before the
//! command's own logic executes. The crate plugs into the host's argument
//! parser through the [`Command`] and [`Flag`] traits and never parses a
//! command line itself.

pub mod command;
pub mod flag;
pub mod prompt;
pub mod prompter;

#[cfg(test)]
mod testing;

pub use command::{run_pre_run, Command, CommandId, PreRunStage};
pub use flag::{Flag, ListValue, ScalarValue, ValueError, ValueMut};
pub use prompt::PromptError;
pub use prompter::{DeclareError, Prompter, RequiredFlag};
