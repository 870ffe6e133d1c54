//! Flag boundary between the prompt engine and the host framework
//!
//! Flag storage belongs to the host. The engine only reads a flag's metadata
//! and writes a parsed value back, so the surface here is small: scalar cells
//! parse-and-set one value, list cells reset and append one element at a time.

use thiserror::Error;

/// Error produced by a value cell that rejected an input string.
///
/// The prompt loop treats this as recoverable: it echoes the message to the
/// user and asks again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValueError(String);

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A value cell holding a single value.
pub trait ScalarValue {
    /// Parses `input` and stores it, replacing the current value.
    fn set(&mut self, input: &str) -> Result<(), ValueError>;
}

/// A value cell holding a list of elements.
pub trait ListValue {
    /// Discards every element, defaults included.
    fn reset(&mut self) -> Result<(), ValueError>;

    /// Parses `input` and appends it as one element.
    fn append(&mut self, input: &str) -> Result<(), ValueError>;
}

/// Mutable access to a flag's value cell.
///
/// The variant selects the prompting protocol: scalars take one line, lists
/// take one line per element until an empty line terminates them.
pub enum ValueMut<'a> {
    Scalar(&'a mut dyn ScalarValue),
    List(&'a mut dyn ListValue),
}

/// Interface the prompt engine needs from a host flag.
pub trait Flag {
    /// Flag name, without the leading dashes.
    fn name(&self) -> &str;

    /// Usage text shown to the user as a hint while prompting.
    fn usage(&self) -> &str;

    /// True when the caller explicitly provided a value on the command line.
    fn changed(&self) -> bool;

    /// Current value rendered as a string.
    fn value_string(&self) -> String;

    /// The value this flag assumes when passed without an argument, if the
    /// host supports that concept. A flag whose current value equals this
    /// sentinel only carries a suggestion, not a user decision, and is
    /// prompted for like an unset flag.
    fn no_arg_default(&self) -> Option<&str>;

    /// The flag's value cell.
    fn value_mut(&mut self) -> ValueMut<'_>;
}
