use std::fmt;

use super::request::RequestLists;
use crate::pool::{ResPool, SolvableId};

/// Solve directives understood by a satisfiability engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobOp {
    InstallSolvable,
    EraseSolvable,
    InstallSolvableName,
    EraseSolvableName,
    InstallSolvableProvides,
    EraseSolvableProvides,
    InstallSolvableUpdate,
}

impl JobOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOp::InstallSolvable => "INSTALL_SOLVABLE",
            JobOp::EraseSolvable => "ERASE_SOLVABLE",
            JobOp::InstallSolvableName => "INSTALL_SOLVABLE_NAME",
            JobOp::EraseSolvableName => "ERASE_SOLVABLE_NAME",
            JobOp::InstallSolvableProvides => "INSTALL_SOLVABLE_PROVIDES",
            JobOp::EraseSolvableProvides => "ERASE_SOLVABLE_PROVIDES",
            JobOp::InstallSolvableUpdate => "INSTALL_SOLVABLE_UPDATE",
        }
    }

    pub fn is_install(&self) -> bool {
        matches!(
            self,
            JobOp::InstallSolvable
                | JobOp::InstallSolvableName
                | JobOp::InstallSolvableProvides
                | JobOp::InstallSolvableUpdate
        )
    }
}

impl fmt::Display for JobOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(opcode, target)` pair of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobEntry {
    pub op: JobOp,
    pub target: SolvableId,
}

/// Ordered job queue for one solve invocation.
///
/// Problems reference entries by position, so entries are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    entries: Vec<JobEntry>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: JobOp, target: SolvableId) -> &mut Self {
        self.entries.push(JobEntry { op, target });
        self
    }

    pub fn get(&self, index: usize) -> Option<&JobEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[JobEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turn request lists into a job: installs first, then removals, each in
/// list order. Lock and keep lists do not produce entries.
pub fn build_job(pool: &ResPool, lists: &RequestLists) -> Job {
    let mut job = Job::new();

    let requests = lists
        .to_install()
        .iter()
        .map(|&id| (JobOp::InstallSolvable, id))
        .chain(lists.to_remove().iter().map(|&id| (JobOp::EraseSolvableName, id)));

    for (op, id) in requests {
        let Some(item) = pool.item(id) else {
            log::error!("Pool item #{} does not exist, skipping {}", id, op);
            continue;
        };
        match item.solvable() {
            Some(solvable) => {
                log::debug!("{} {}", op, item);
                job.push(op, solvable);
            }
            None => log::error!("{} has no solvable, skipping {}", item, op),
        }
    }

    job
}
