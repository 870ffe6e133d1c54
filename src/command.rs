//! Command boundary and the pre-run stage pipeline
//!
//! The crate never parses a command line itself. It plugs into whatever
//! framework the host uses through this trait: flag lookup by name, a stable
//! per-command identity, and an ordered list of pre-run stages the resolver
//! appends itself to.

use crate::flag::Flag;

/// Identity of one command instance.
///
/// The resolver runs at most once per command, keyed by this id, so hosts
/// must hand out a distinct id for each command object they create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

impl CommandId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// One stage of a command's pre-run pipeline.
///
/// Stages run in order after argument parsing and before the command body;
/// the first failing stage aborts the pipeline. A hook that cannot fail is
/// just a stage that always returns `Ok(())`.
pub type PreRunStage = Box<dyn FnMut(&mut dyn Command, &[String]) -> anyhow::Result<()> + Send>;

/// Interface the resolver needs from a host command.
pub trait Command {
    /// Stable identity of this command instance.
    fn id(&self) -> CommandId;

    /// Looks up a declared flag by name, including any flags the command
    /// inherits from its ancestors if the host has that concept.
    fn flag_mut(&mut self, name: &str) -> Option<&mut dyn Flag>;

    /// The command's pre-run pipeline. Hosts and callers push their own
    /// stages here; [`Prompter`](crate::prompter::Prompter) appends its
    /// resolver stage exactly once per command.
    fn pre_run_mut(&mut self) -> &mut Vec<PreRunStage>;
}

/// Runs every pre-run stage of `cmd` in order, stopping at the first error.
///
/// The stage list is detached from the command while it runs so each stage
/// can borrow the command mutably. Stages pushed during the run are kept for
/// the next invocation, not executed in this one.
pub fn run_pre_run(cmd: &mut dyn Command, args: &[String]) -> anyhow::Result<()> {
    let mut stages = std::mem::take(cmd.pre_run_mut());
    let mut result = Ok(());
    for stage in stages.iter_mut() {
        result = stage(cmd, args);
        if result.is_err() {
            break;
        }
    }

    let added = std::mem::replace(cmd.pre_run_mut(), stages);
    cmd.pre_run_mut().extend(added);
    result
}
