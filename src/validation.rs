use std::collections::HashSet;

use log::debug;
use petgraph::graph::NodeIndex;

use crate::cell::CellType;
use crate::error::ValidationError;
use crate::graph::NodeGraph;

impl NodeGraph {
    /// Check that this map is playable, i.e. every spawn can walk to some exit and every exit can be reached from some spawn.
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. at least one spawn exists, else [`ValidationError::NotEnoughSpawns`];
    /// 2. at least one exit exists, else [`ValidationError::NotEnoughExits`];
    /// 3. every cluster of adjacent spawns reaches an exit, else [`ValidationError::SpawnBlocked`];
    /// 4. every cluster of adjacent exits not already reached in 3. reaches a spawn, else [`ValidationError::ExitBlocked`].
    ///
    /// Members of a cluster share reachability, so one representative per cluster is checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.spawn_nodes.is_empty() {
            return Err(ValidationError::NotEnoughSpawns);
        }
        if self.exit_nodes.is_empty() {
            return Err(ValidationError::NotEnoughExits);
        }

        let mut found_exits = HashSet::new();
        for spawn in self.cluster_representatives(&self.spawn_nodes, &HashSet::new()) {
            let exit = self.find_any(spawn, CellType::Exit).ok_or(ValidationError::SpawnBlocked)?;
            found_exits.insert(exit);
        }

        // an exit sharing a cluster with a found exit is reachable too
        let remaining = self.exit_nodes.iter()
            .copied()
            .filter(|exit| !found_exits.contains(exit))
            .collect::<Vec<_>>();
        for exit in self.cluster_representatives(&remaining, &found_exits) {
            self.find_any(exit, CellType::Spawn).ok_or(ValidationError::ExitBlocked)?;
        }

        debug!("validated {} spawns and {} exits", self.spawn_nodes.len(), self.exit_nodes.len());
        Ok(())
    }

    /// One node per same-type cluster among `nodes`, skipping clusters containing any of `settled`.
    fn cluster_representatives(&self, nodes: &[NodeIndex], settled: &HashSet<NodeIndex>) -> Vec<NodeIndex> {
        let mut covered = HashSet::new();
        let mut representatives = Vec::new();

        for &ix in nodes {
            if covered.contains(&ix) {
                continue;
            }

            let cluster = self.cluster_of(ix);
            let is_settled = cluster.iter().any(|member| settled.contains(member));
            covered.extend(cluster);
            if !is_settled {
                representatives.push(ix);
            }
        }

        representatives
    }
}
