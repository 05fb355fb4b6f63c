//! Best-fit decreasing with a one-move repair pass.

use vantage_core::models::Workload;

use super::{fits, penalty, skilled};

pub(super) fn solve(workload: &Workload) -> Vec<Option<usize>> {
    let tasks = &workload.tasks;
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by(|&a, &b| {
        penalty(&tasks[b])
            .total_cmp(&penalty(&tasks[a]))
            .then_with(|| tasks[b].hours.total_cmp(&tasks[a].hours))
            .then_with(|| tasks[a].task_id.cmp(&tasks[b].task_id))
    });

    let mut remaining: Vec<f64> = workload.resources.iter().map(|r| r.available_hours).collect();
    let mut placement = vec![None; tasks.len()];

    for &t in &order {
        let hours = tasks[t].hours;
        let best = skilled(workload, &tasks[t].skill)
            .into_iter()
            .filter(|&r| fits(remaining[r], hours))
            .min_by(|&a, &b| (remaining[a] - hours).total_cmp(&(remaining[b] - hours)));
        if let Some(r) = best {
            remaining[r] -= hours;
            placement[t] = Some(r);
        }
    }

    repair(workload, &order, &mut placement, &mut remaining);
    placement
}

/// For each unplaced task, try to free room on a skilled resource by moving one
/// placed task to another resource that can take it.
fn repair(
    workload: &Workload,
    order: &[usize],
    placement: &mut [Option<usize>],
    remaining: &mut [f64],
) {
    let tasks = &workload.tasks;
    for &u in order {
        if placement[u].is_some() {
            continue;
        }
        let hours = tasks[u].hours;
        'resources: for r in skilled(workload, &tasks[u].skill) {
            let shortfall = hours - remaining[r];
            for t in 0..tasks.len() {
                if placement[t] != Some(r) || tasks[t].hours < shortfall {
                    continue;
                }
                let target = skilled(workload, &tasks[t].skill)
                    .into_iter()
                    .find(|&r2| r2 != r && fits(remaining[r2], tasks[t].hours));
                if let Some(r2) = target {
                    remaining[r2] -= tasks[t].hours;
                    remaining[r] += tasks[t].hours;
                    placement[t] = Some(r2);
                    remaining[r] -= hours;
                    placement[u] = Some(r);
                    break 'resources;
                }
            }
        }
    }
}
