//! Branch and bound over task → resource placements.

use vantage_core::models::Workload;

use super::{fits, greedy, penalty, skilled};

/// Search nodes explored before settling for the best placement found so far.
const NODE_BUDGET: u64 = 2_000_000;
const IMPROVEMENT_EPSILON: f64 = 1e-9;

struct Search<'a> {
    workload: &'a Workload,
    order: Vec<usize>,
    options: Vec<Vec<usize>>,
    remaining: Vec<f64>,
    current: Vec<Option<usize>>,
    best: Vec<Option<usize>>,
    best_penalty: f64,
    nodes: u64,
}

/// Optimal placement, seeded with the greedy answer as the incumbent.
pub(super) fn solve(workload: &Workload) -> Vec<Option<usize>> {
    let tasks = &workload.tasks;
    let incumbent = greedy::solve(workload);
    let incumbent_penalty: f64 = tasks
        .iter()
        .zip(&incumbent)
        .filter(|(_, slot)| slot.is_none())
        .map(|(task, _)| penalty(task))
        .sum();
    if incumbent_penalty <= IMPROVEMENT_EPSILON {
        return incumbent;
    }

    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by(|&a, &b| {
        penalty(&tasks[b])
            .total_cmp(&penalty(&tasks[a]))
            .then_with(|| tasks[a].task_id.cmp(&tasks[b].task_id))
    });

    let mut search = Search {
        workload,
        order,
        options: tasks.iter().map(|t| skilled(workload, &t.skill)).collect(),
        remaining: workload.resources.iter().map(|r| r.available_hours).collect(),
        current: vec![None; tasks.len()],
        best: incumbent,
        best_penalty: incumbent_penalty,
        nodes: 0,
    };
    search.descend(0, 0.0);
    search.best
}

impl Search<'_> {
    fn descend(&mut self, depth: usize, cost: f64) {
        self.nodes += 1;
        if self.nodes > NODE_BUDGET
            || cost + self.forced_penalty(depth) >= self.best_penalty - IMPROVEMENT_EPSILON
        {
            return;
        }
        if depth == self.order.len() {
            self.best_penalty = cost;
            self.best.clone_from(&self.current);
            return;
        }

        let t = self.order[depth];
        let hours = self.workload.tasks[t].hours;
        for i in 0..self.options[t].len() {
            let r = self.options[t][i];
            if !fits(self.remaining[r], hours) || self.equivalent_tried(t, r) {
                continue;
            }
            self.remaining[r] -= hours;
            self.current[t] = Some(r);
            self.descend(depth + 1, cost);
            self.current[t] = None;
            self.remaining[r] += hours;
        }
        self.descend(depth + 1, cost + penalty(&self.workload.tasks[t]));
    }

    /// Penalty of undecided tasks that no resource can take any more.
    fn forced_penalty(&self, depth: usize) -> f64 {
        self.order[depth..]
            .iter()
            .filter(|&&t| {
                let hours = self.workload.tasks[t].hours;
                !self.options[t].iter().any(|&r| fits(self.remaining[r], hours))
            })
            .map(|&t| penalty(&self.workload.tasks[t]))
            .sum()
    }

    /// An earlier option with the same skills and remaining hours roots an
    /// identical subtree.
    fn equivalent_tried(&self, t: usize, r: usize) -> bool {
        let skills = &self.workload.resources[r].skills;
        self.options[t]
            .iter()
            .take_while(|&&earlier| earlier != r)
            .any(|&earlier| {
                self.workload.resources[earlier].skills == *skills
                    && self.remaining[earlier] == self.remaining[r]
            })
    }
}
