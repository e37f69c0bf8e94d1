use super::problem::{Action, ProblemSolution};
use super::request::RequestLists;
use crate::error::{ResolverError, Result};
use crate::pool::ResPool;
use crate::status::Causer;

/// Apply the actions of a chosen solution in order.
///
/// Each action goes through the normal status contract under the `USER`
/// causer and is mirrored into `requests` for the next pass. Processing stops
/// at the first rejected action; earlier actions stay applied.
pub fn apply_solution(pool: &mut ResPool, requests: &mut RequestLists, solution: &ProblemSolution) -> Result<()> {
    for single in solution.actions() {
        let item = pool
            .item_mut(single.item)
            .ok_or(ResolverError::ItemNotFound(single.item))?;

        let status = item.status_mut();
        let accepted = match single.action {
            Action::Install => status.set_to_be_installed(Causer::User),
            Action::Remove => status.set_to_be_uninstalled(Causer::User),
            Action::Keep => status.reset_transact(Causer::User),
        };
        if !accepted {
            log::error!("Cannot {} {} ({})", single.action, item, item.status());
            return Err(ResolverError::SolutionRejected {
                item: item.to_string(),
                action: single.action,
            });
        }

        log::info!("Solution: {} {}", single.action, item);
        match single.action {
            Action::Install => {
                requests.add_to_install(single.item);
            }
            Action::Remove => {
                requests.add_to_remove(single.item);
            }
            Action::Keep => requests.forget(single.item),
        }
    }
    Ok(())
}
