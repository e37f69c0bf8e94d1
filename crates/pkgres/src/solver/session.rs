use super::engine::{DecisionSet, EngineProblem, SatEngine, SolverFlags, SolverHandle};
use super::job::Job;
use crate::config::ResolverConfig;
use crate::pool::Universe;

/// Exclusive owner of one solve invocation: the submitted job and the
/// engine's handle. Both are released when the session is dropped, whichever
/// way the pass ends.
pub struct SolverSession<H: SolverHandle> {
    job: Job,
    handle: H,
}

impl<H: SolverHandle> SolverSession<H> {
    /// Run `engine` on `job` under the fixed resolver policy.
    pub fn solve<E>(engine: &E, universe: &Universe, job: Job, config: &ResolverConfig) -> Self
    where
        E: SatEngine<Handle = H>,
    {
        let flags = Self::policy(config);
        log::info!("Solving {} job entries against {} installed", job.len(), universe.installed().count());
        let handle = engine.solve(universe, &job, &flags);
        Self { job, handle }
    }

    /// No system fixing, no implicit updates, no policy relaxation.
    pub fn policy(config: &ResolverConfig) -> SolverFlags {
        SolverFlags {
            fix_system: false,
            update_system: false,
            allow_downgrade: false,
            allow_uninstall: false,
            allow_arch_change: false,
            allow_vendor_change: false,
            no_update_provide: false,
            timeout: config.timeout(),
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn is_success(&self) -> bool {
        self.handle.problem_count() == 0
    }

    pub fn problem_count(&self) -> usize {
        self.handle.problem_count()
    }

    pub fn problems(&self) -> &[EngineProblem] {
        self.handle.problems()
    }

    pub fn decisions(&self) -> &DecisionSet {
        self.handle.decisions()
    }
}

impl<H: SolverHandle> Drop for SolverSession<H> {
    fn drop(&mut self) {
        log::debug!("Releasing solver session ({} job entries)", self.job.len());
    }
}
