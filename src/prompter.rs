//! Resolver context: requirement registry, call-once guard, installation
//!
//! A [`Prompter`] is owned by the root of a command tree and shared (it is a
//! cheap clone) with every stage that needs it. Independent command trees,
//! such as the ones tests build, each use their own `Prompter` and never see
//! each other's requirements.

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::command::{Command, CommandId};
use crate::prompt::{self, PromptError};

#[derive(Debug, Error)]
pub enum DeclareError {
    #[error("No such flag: --{0}")]
    NoSuchFlag(String),
}

/// A flag that must hold a user-provided value before a command body runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFlag {
    /// Flag name as declared on the command.
    pub name: String,

    /// Command the requirement is attached to. `None` marks an inherited
    /// requirement, resolved by name on whichever command is executing.
    pub owner: Option<CommandId>,
}

#[derive(Debug, Default)]
struct PrompterState {
    /// Declaration-ordered across both requirement kinds; this order is the
    /// prompting order.
    registry: Vec<RequiredFlag>,

    /// Commands already carrying the resolver stage.
    installed: HashSet<CommandId>,

    /// Commands whose resolver body ran to completion.
    resolved: HashSet<CommandId>,
}

/// Tracks required flags for one command tree and prompts for the missing
/// ones before a command runs.
///
/// Declaring a requirement appends a resolver stage to the command's pre-run
/// pipeline (once per command, no matter how many flags are declared), so
/// hosts that drive their pipeline through
/// [`run_pre_run`](crate::command::run_pre_run) get prompting for free.
/// Hosts with their own pre-run convention call [`Prompter::resolve`]
/// directly; it is idempotent per command either way.
#[derive(Debug, Clone, Default)]
pub struct Prompter {
    state: Arc<Mutex<PrompterState>>,
}

impl Prompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` required on `cmd`: if the flag still lacks a
    /// user-provided value when the command's pre-run pipeline fires, the
    /// user is prompted for one.
    ///
    /// Fails with [`DeclareError::NoSuchFlag`] when `cmd` has no flag of
    /// that name.
    pub fn mark_required(&self, cmd: &mut dyn Command, name: &str) -> Result<(), DeclareError> {
        self.declare(cmd, name, false)
    }

    /// Like [`Prompter::mark_required`], but the requirement is not pinned
    /// to `cmd`: at resolution time the flag is looked up by name on
    /// whichever command is executing, so a requirement declared on a parent
    /// follows the inherited flag into its descendants.
    pub fn mark_inherited_required(
        &self,
        cmd: &mut dyn Command,
        name: &str,
    ) -> Result<(), DeclareError> {
        self.declare(cmd, name, true)
    }

    /// Snapshot of every declared requirement, in declaration order.
    pub fn requirements(&self) -> Vec<RequiredFlag> {
        self.lock().registry.clone()
    }

    /// Prompts for every required flag of `cmd` that still lacks a
    /// user-provided value, reading from `input` and writing to `output`.
    ///
    /// Runs at most once per command instance: a second call for the same
    /// command returns `Ok` without touching the streams. A failed
    /// resolution does not count as run, so the next invocation prompts
    /// again. Most hosts never call this themselves; the installed pre-run
    /// stage does, against the process's standard streams.
    pub fn resolve(
        &self,
        cmd: &mut dyn Command,
        _args: &[String],
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<(), PromptError> {
        // The lock is held across the prompt body, making the guard's
        // check-and-set atomic even when several pipeline layers or threads
        // reach this point for the same command.
        let mut state = self.lock();
        if state.resolved.contains(&cmd.id()) {
            return Ok(());
        }

        let entries = state.registry.clone();
        prompt::run_prompts(&entries, cmd, input, output)?;

        state.resolved.insert(cmd.id());
        Ok(())
    }

    fn declare(
        &self,
        cmd: &mut dyn Command,
        name: &str,
        inherited: bool,
    ) -> Result<(), DeclareError> {
        if cmd.flag_mut(name).is_none() {
            return Err(DeclareError::NoSuchFlag(name.to_string()));
        }

        let owner = if inherited { None } else { Some(cmd.id()) };
        let newly_installed = {
            let mut state = self.lock();
            state.registry.push(RequiredFlag {
                name: name.to_string(),
                owner,
            });
            state.installed.insert(cmd.id())
        };

        if newly_installed {
            let prompter = self.clone();
            cmd.pre_run_mut().push(Box::new(move |cmd, args| {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                prompter.resolve(cmd, args, &mut stdin.lock(), &mut stdout.lock())?;
                Ok(())
            }));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, PrompterState> {
        // A panic while prompting must not wedge every later command.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
