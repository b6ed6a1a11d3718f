use std::collections::{HashMap, HashSet};
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, warn};
use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::QLearnParams;
use crate::graph::NodeGraph;
use crate::search::{MazeSearch, Placement, SearchSpace, SearchStats};

/// The actions of one state and their learned values, in neighbor order.
#[derive(Clone, Debug)]
struct QState {
    actions: Vec<NodeIndex>,
    values: Vec<f64>,
}

/// Tries to find the optimal maze by learning the longest path from the spawn with tabular Q-learning, then walling
/// off every buildable cell beside that path.
///
/// Optimality is not guaranteed. The search is meant for maps with a single spawn and no blocker limit; on other
/// maps it trains from the first spawn and ignores the limit.
///
/// # Episodes
/// An agent starts on the spawn and moves one cell at a time. Moving from `S` to `A` blocks `S` and every other
/// action of `S` for the rest of the episode, so the agent can neither turn back nor branch. The episode ends when
/// the agent lands next to an exit (a goal) or has nowhere left to go (a dead end).
#[derive(Debug)]
pub struct QLearnSearch {
    params: QLearnParams,
    rng: StdRng,
    table: HashMap<NodeIndex, QState>,
    goals: HashSet<NodeIndex>,
    blocked: HashSet<NodeIndex>,
    episodes: usize,
    stats: SearchStats,
}

impl QLearnSearch {
    /// A search using `params`; a fixed `params.seed` makes runs reproducible.
    pub fn new(params: QLearnParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            params,
            rng,
            table: HashMap::new(),
            goals: HashSet::new(),
            blocked: HashSet::new(),
            episodes: 0,
            stats: SearchStats::default(),
        }
    }

    /// Number of episodes trained in the last run.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Counters of the last run; `combinations_checked` counts episodes.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Traversable neighbors of exits end an episode; so does stepping onto an exit directly.
    fn is_goal(&self, graph: &NodeGraph, ix: NodeIndex) -> bool {
        self.goals.contains(&ix) || graph.cell_type(ix).is_exit()
    }

    fn build_q_table(&mut self, graph: &NodeGraph) {
        self.goals = graph.exit_nodes().iter()
            .flat_map(|exit| graph.neighbors(*exit))
            .filter(|ix| graph.cell_type(*ix).is_traversable())
            .collect();

        self.table = graph.graph.node_indices()
            .filter(|ix| !graph.cell_type(*ix).is_exit())
            .map(|ix| {
                let actions = graph.neighbors(ix)
                    .filter(|neighbor| graph.cell_type(*neighbor).is_traversable())
                    .collect_vec();
                let values = actions.iter()
                    .map(|action| if self.goals.contains(action) { self.params.reward_goal } else { self.params.reward_normal })
                    .collect_vec();
                (ix, QState { actions, values })
            })
            .collect();
    }

    /// Slots of the actions of `state` not blocked in this episode.
    fn available_actions(&self, state: NodeIndex) -> Vec<usize> {
        self.table.get(&state)
            .map(|q_state| (0..q_state.actions.len())
                .filter(|slot| !self.blocked.contains(&q_state.actions[*slot]))
                .collect_vec())
            .unwrap_or_default()
    }

    /// The available action of `state` with the highest value; the first one wins a tie.
    fn best_available(&self, state: NodeIndex) -> Option<(usize, f64)> {
        let q_state = self.table.get(&state)?;
        self.available_actions(state)
            .into_iter()
            .map(|slot| (slot, q_state.values[slot]))
            .fold(None, |best: Option<(usize, f64)>, (slot, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((slot, value)),
            })
    }

    fn choose_action(&mut self, state: NodeIndex, allow_random: bool) -> Option<usize> {
        if allow_random && self.rng.gen::<f64>() < self.params.epsilon {
            self.available_actions(state).choose(&mut self.rng).copied()
        } else {
            self.best_available(state).map(|(slot, _)| slot)
        }
    }

    fn update(&mut self, state: NodeIndex, slot: usize, reward: f64) {
        let action = self.table[&state].actions[slot];
        let best_future = self.best_available(action)
            .map_or(self.params.reward_fail, |(_, value)| value);

        let alpha = self.params.alpha;
        if let Some(q_state) = self.table.get_mut(&state) {
            let old = q_state.values[slot];
            q_state.values[slot] = old + alpha * (reward + best_future - old);
        }
    }

    /// Commit to `slot`: the agent can no longer return to `state` or take any of its other actions.
    fn step(&mut self, state: NodeIndex, slot: usize) -> NodeIndex {
        let q_state = &self.table[&state];
        let action = q_state.actions[slot];
        self.blocked.extend(q_state.actions.iter().copied().filter(|other| *other != action));
        if state != action {
            self.blocked.insert(state);
        }

        action
    }

    fn train_agent(&mut self, graph: &NodeGraph, spawn: NodeIndex, episodes: usize) {
        for episode in 0..episodes {
            self.blocked.clear();
            let mut state = spawn;

            loop {
                let Some(slot) = self.choose_action(state, true) else {
                    break;
                };
                let action = self.step(state, slot);

                if self.is_goal(graph, action) {
                    self.update(state, slot, self.params.reward_goal);
                    break;
                }
                if self.available_actions(action).is_empty() {
                    self.update(state, slot, self.params.reward_fail);
                    break;
                }

                self.update(state, slot, self.params.reward_normal);
                state = action;
            }

            if (episode + 1) % 10_000 == 0 {
                debug!("trained {}/{} episodes", episode + 1, episodes);
            }
        }

        self.episodes = episodes;
    }

    /// The cells a fully trained agent walks through, or [`None`] if it runs into a dead end.
    fn get_path(&mut self, graph: &NodeGraph, spawn: NodeIndex) -> Option<HashSet<NodeIndex>> {
        self.blocked.clear();
        let mut path = HashSet::new();
        let mut state = spawn;

        loop {
            let slot = self.choose_action(state, false)?;
            let action = self.step(state, slot);
            path.insert(action);

            if self.is_goal(graph, action) {
                return Some(path);
            }
            if self.available_actions(action).is_empty() {
                return None;
            }

            state = action;
        }
    }
}

impl MazeSearch for QLearnSearch {
    fn generate_optimal_mazes(&mut self, graph: &mut NodeGraph, blocker_limit: Option<usize>) -> Vec<Placement> {
        let start = Instant::now();
        let space = SearchSpace::new(graph, None);
        self.stats = SearchStats::default();

        let Some(&spawn) = graph.spawn_nodes().first() else {
            return Vec::new();
        };
        if graph.spawn_nodes().len() > 1 {
            warn!("q-learning expects a single spawn, training from {} only", graph.coords(spawn));
        }
        if let Some(limit) = blocker_limit {
            warn!("q-learning ignores the blocker limit of {}", limit);
        }

        self.build_q_table(graph);
        let episodes = graph.node_count() * self.params.training_multiplier;
        self.train_agent(graph, spawn, episodes);
        self.stats.combinations_checked = episodes as u64;

        let path = self.get_path(graph, spawn);
        self.stats.elapsed = start.elapsed();

        let Some(path) = path else {
            info!("q-learning agent hit a dead end after {} episodes, no maze produced", episodes);
            return Vec::new();
        };

        let placement = space.build_nodes.iter()
            .copied()
            .filter(|ix| !path.contains(ix))
            .map(|ix| graph.coords(ix))
            .sorted()
            .collect_vec();
        info!(
            "q-learning trained {} episodes in {:.2?}, path of {} cells, {} blockers",
            episodes, self.stats.elapsed, path.len(), placement.len()
        );

        vec![placement]
    }
}
