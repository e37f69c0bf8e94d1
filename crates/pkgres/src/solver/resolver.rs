use super::basic::BasicEngine;
use super::decisions::{apply_decisions, AppliedSet};
use super::engine::SatEngine;
use super::job::build_job;
use super::problem::{analyze_problems, ProblemSolution, ResolverProblem};
use super::request::{collect_transactions, RequestLists};
use super::session::SolverSession;
use super::solution::apply_solution;
use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::pool::{PoolItemId, ResPool};

/// Resolver front-end owning the pool for its whole lifetime.
///
/// Requests added here persist across passes; each [`resolve`](Self::resolve)
/// merges them with the transactions pending in the pool. Exclusive access
/// to the pool during a pass follows from `&mut self`.
pub struct SatResolver<E: SatEngine = BasicEngine> {
    pool: ResPool,
    engine: E,
    config: ResolverConfig,
    requests: RequestLists,
    problems: Vec<ResolverProblem>,
}

impl SatResolver<BasicEngine> {
    pub fn new(pool: ResPool) -> Self {
        Self::with_engine(pool, BasicEngine)
    }
}

impl<E: SatEngine> SatResolver<E> {
    pub fn with_engine(pool: ResPool, engine: E) -> Self {
        Self {
            pool,
            engine,
            config: ResolverConfig::default(),
            requests: RequestLists::new(),
            problems: Vec::new(),
        }
    }

    /// Use `config` for solver flags (`solver-timeout`) and
    /// `max-solver-passes`.
    ///
    /// `architecture` and `vendor-classes` belong to the pool; build it with
    /// [`ResPool::with_config`] for them to take effect. A config whose
    /// architecture differs from the pool's is logged and otherwise ignored.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        let arch = config.arch();
        if arch != *self.pool.universe().system_arch() {
            log::warn!(
                "Config architecture {} ignored, pool was built for {}",
                arch,
                self.pool.universe().system_arch()
            );
        }
        self.config = config;
        self
    }

    /// Pool the resolver works on
    pub fn pool(&self) -> &ResPool {
        &self.pool
    }

    /// Mutable pool access between passes
    pub fn pool_mut(&mut self) -> &mut ResPool {
        &mut self.pool
    }

    /// Give the pool back
    pub fn into_pool(self) -> ResPool {
        self.pool
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Requests carried into every pass
    pub fn requests(&self) -> &RequestLists {
        &self.requests
    }

    /// Request an install
    pub fn add_to_install(&mut self, item: PoolItemId) -> &mut Self {
        self.requests.add_to_install(item);
        self
    }

    /// Request a removal
    pub fn add_to_remove(&mut self, item: PoolItemId) -> &mut Self {
        self.requests.add_to_remove(item);
        self
    }

    /// Keep an uninstalled item out of the solution
    pub fn add_to_lock_uninstalled(&mut self, item: PoolItemId) -> &mut Self {
        self.requests.add_to_lock_uninstalled(item);
        self
    }

    /// Keep an installed item
    pub fn add_to_keep(&mut self, item: PoolItemId) -> &mut Self {
        self.requests.add_to_keep(item);
        self
    }

    /// Run one resolve pass.
    ///
    /// On success the decisions are written back into the pool. On failure
    /// the pool is left as it was and [`problems`](Self::problems) lists what
    /// went wrong.
    pub fn resolve(&mut self) -> Result<()> {
        self.problems.clear();

        let mut lists = self.requests.clone();
        let stale = collect_transactions(&self.pool, &mut lists);
        log::debug!(
            "Requests: {} install, {} remove, {} lock, {} keep",
            lists.to_install().len(),
            lists.to_remove().len(),
            lists.to_lock_uninstalled().len(),
            lists.to_keep().len()
        );

        let job = build_job(&self.pool, &lists);
        let session = SolverSession::solve(&self.engine, self.pool.universe(), job, &self.config);

        if !session.is_success() {
            self.problems = analyze_problems(&self.pool, &session);
            log::error!("Solver run failed: {} problem(s)", self.problems.len());
            return Err(ResolverError::Unsatisfiable {
                problems: self.problems.len(),
            });
        }

        stale.reset(&mut self.pool);
        let mut applied = AppliedSet::new();
        let written = apply_decisions(&mut self.pool, &session, &mut applied);
        log::info!("Solver run succeeded: {} item(s) changed", written);
        Ok(())
    }

    /// Problems of the last failed pass; empty otherwise.
    pub fn problems(&self) -> &[ResolverProblem] {
        &self.problems
    }

    /// Apply chosen solutions for the next pass. Stops at the first rejected
    /// action; nothing is rolled back.
    pub fn apply_solutions(&mut self, solutions: &[ProblemSolution]) -> Result<()> {
        for solution in solutions {
            apply_solution(&mut self.pool, &mut self.requests, solution)?;
        }
        Ok(())
    }

    /// Resolve, letting `pick` choose a solution index per problem after
    /// each failed pass, for at most `max-solver-passes` passes.
    pub fn resolve_with_policy<F>(&mut self, mut pick: F) -> Result<()>
    where
        F: FnMut(&ResolverProblem) -> Option<usize>,
    {
        let max_passes = self.config.max_solver_passes.max(1);
        let mut pass = 1;
        loop {
            let err = match self.resolve() {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };
            if pass >= max_passes {
                log::warn!("Giving up after {} pass(es)", pass);
                return Err(err);
            }

            let chosen: Vec<ProblemSolution> = self
                .problems
                .iter()
                .filter_map(|problem| pick(problem).and_then(|i| problem.solutions().get(i)).cloned())
                .collect();
            if chosen.is_empty() {
                log::warn!("No solution chosen, giving up");
                return Err(err);
            }

            self.apply_solutions(&chosen)?;
            pass += 1;
        }
    }
}
