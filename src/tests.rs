#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;
    use rstest::rstest;

    use crate::builder::GridBuilder;
    use crate::cell::CellType;
    use crate::config::{Adjacency, OptimizerConfig, QLearnParams, Strategy};
    use crate::distances::Distances;
    use crate::error::{BuilderInvalidReason, GridParseError, ValidationError};
    use crate::graph::NodeGraph;
    use crate::grid::Grid;
    use crate::location::Coordinate;
    use crate::search::{max_blocker_count, CutoffSearch, ExhaustiveSearch, MazeSearch, QLearnSearch, SearchSpace};

    fn grid(snapshot: &str) -> Grid {
        snapshot.parse().unwrap()
    }

    fn coords(graph: &NodeGraph, nodes: &[petgraph::graph::NodeIndex]) -> Vec<Coordinate> {
        nodes.iter().map(|ix| graph.coords(*ix)).collect()
    }

    /// Best value over every allowed combination, measuring every spawn on a freshly built graph.
    fn brute_force(snapshot: &Grid, adjacency: Adjacency) -> Option<Distances> {
        let graph = NodeGraph::build(snapshot, adjacency);
        let space = SearchSpace::new(&graph, None);

        (0..=space.max_blockers)
            .flat_map(|count| space.build_nodes.iter().copied().combinations(count))
            .filter_map(|combination| {
                let blocked = NodeGraph::build(&snapshot.with_blockers(&coords(&graph, &combination)), adjacency);
                blocked.multi_source_distances(blocked.spawn_nodes(), CellType::Exit)
            })
            .max()
    }

    fn seeded(seed: u64) -> QLearnParams {
        QLearnParams {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn snapshot_round_trip() {
        let snapshot = "S._~\n#+.E\n";
        assert_eq!(format!("{}", grid(snapshot)), snapshot);
        // trailing whitespace and blank lines are dropped
        assert_eq!(format!("{}", grid("S.E  \n...\n\n")), "S.E\n...\n");
    }

    #[test]
    fn snapshot_errors() {
        assert_eq!("".parse::<Grid>(), Err(GridParseError::Empty));
        assert_eq!("\n\n".parse::<Grid>(), Err(GridParseError::Empty));
        assert_eq!("S.\nE".parse::<Grid>(), Err(GridParseError::RaggedRow { row: 1, expected: 2, found: 1 }));
        assert_eq!(
            "S?E".parse::<Grid>(),
            Err(GridParseError::UnknownSymbol { symbol: '?', location: Coordinate(1, 0) })
        );
    }

    #[test]
    fn build_grid() {
        let grid = GridBuilder::with_dims((NonZero::new(4).unwrap(), NonZero::new(3).unwrap()))
            .add_spawn(Coordinate(0, 0))
            .add_exit(Coordinate(3, 2))
            .drop_location(Coordinate(1, 1))
            .set(Coordinate(2, 1), CellType::Unbuildable)
            .fill_row(2, CellType::Route)
            .build()
            .unwrap();

        assert_eq!(format!("{}", grid), "S...
.~_.
++++
");
        assert_eq!(grid.get(Coordinate(2, 1)), Some(CellType::Unbuildable));
        assert_eq!(grid.get(Coordinate(4, 0)), None);
    }

    #[test]
    fn builder_out_of_bounds() {
        let mut builder = GridBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(1).unwrap()));
        builder.add_spawn(Coordinate(0, 0))
            .add_exit(Coordinate(3, 0));

        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
        assert_eq!(builder.build(), Err(&vec![BuilderInvalidReason::FeatureOutOfBounds]));

        // later writes are ignored once invalid
        builder.add_exit(Coordinate(2, 0));
        assert_eq!(builder.is_valid().map(Vec::len), Some(1));
    }

    #[test]
    fn blockers_render_as_occupied() {
        let blocked = grid("...\nS.E\n...\n").with_blockers(&[Coordinate(1, 1), Coordinate(9, 9)]);
        assert_eq!(format!("{}", blocked), "...\nS#E\n...\n");
    }

    #[test]
    fn cell_rotation_cycles() {
        let mut cell_type = CellType::Basic;
        for _ in 0..6 {
            assert_eq!(cell_type.next_in_rotation().previous_in_rotation(), cell_type);
            cell_type = cell_type.next_in_rotation();
        }
        assert_eq!(cell_type, CellType::Basic);
        assert_eq!(CellType::Route.next_in_rotation(), CellType::Basic);
    }

    #[test]
    fn cell_capabilities() {
        assert!(CellType::Route.allow_building());
        assert!(!CellType::Unbuildable.allow_building());
        assert!(CellType::Unbuildable.is_traversable());
        assert!(CellType::Spawn.is_traversable() && !CellType::Spawn.allow_building());
        assert!(!CellType::Occupied.is_traversable());
        assert!(!CellType::Void.is_traversable());
    }

    #[test]
    fn parse_options() {
        assert_eq!("4".parse::<Adjacency>(), Ok(Adjacency::Cardinal));
        assert_eq!("king".parse::<Adjacency>(), Ok(Adjacency::King));
        assert_eq!(Adjacency::King.to_string(), "8");
        assert_eq!("qlearn".parse::<Strategy>(), Ok(Strategy::QLearn));
        assert_eq!("exhaustive".parse::<Strategy>(), Ok(Strategy::Exhaustive));
        assert_eq!(Strategy::default(), Strategy::Cutoff);
    }

    #[test]
    fn graph_skips_walls() {
        let graph = NodeGraph::build(&grid("S#.\n.~E\n"), Adjacency::Cardinal);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node_at(Coordinate(1, 0)), None);
        assert_eq!(coords(&graph, graph.build_nodes()), vec![Coordinate(2, 0), Coordinate(0, 1)]);

        let spawn = graph.spawn_nodes()[0];
        assert_eq!(coords(&graph, &graph.neighbors(spawn).collect::<Vec<_>>()), vec![Coordinate(0, 1)]);
    }

    #[test]
    fn king_adjacency_connects_diagonals() {
        let snapshot = grid("S~\n~E\n");
        assert_eq!(NodeGraph::build(&snapshot, Adjacency::Cardinal).validate(), Err(ValidationError::SpawnBlocked));
        assert_eq!(NodeGraph::build(&snapshot, Adjacency::King).validate(), Ok(()));
    }

    #[rstest]
    #[case("...\n..E\n", ValidationError::NotEnoughSpawns)]
    #[case("...\n..S\n", ValidationError::NotEnoughExits)]
    #[case("S~E\n", ValidationError::SpawnBlocked)]
    #[case("S#E\n", ValidationError::SpawnBlocked)]
    #[case("S.E~E\n", ValidationError::ExitBlocked)]
    fn validation_errors(#[case] snapshot: &str, #[case] expected: ValidationError) {
        let graph = NodeGraph::build(&grid(snapshot), Adjacency::Cardinal);
        assert_eq!(graph.validate(), Err(expected));
        assert_eq!(grid(snapshot).optimize(&OptimizerConfig::default()), Err(expected));
    }

    #[test]
    fn validation_accepts_exit_clusters() {
        // the second exit is only reachable through the first
        let graph = NodeGraph::build(&grid("S.EE\n"), Adjacency::Cardinal);
        assert_eq!(graph.validate(), Ok(()));
    }

    #[test]
    fn shortest_paths_include_ties() {
        let graph = NodeGraph::build(&grid("...\nS.E\n...\n"), Adjacency::Cardinal);
        let spawn = graph.spawn_nodes()[0];

        assert_eq!(graph.shortest_distance(spawn, CellType::Exit), Some(2));
        let (distance, on_path) = graph.nodes_on_shortest_paths(spawn, CellType::Exit).unwrap();
        assert_eq!(distance, 2);
        let mut on_path = on_path.into_iter().map(|ix| graph.coords(ix)).collect::<Vec<_>>();
        on_path.sort();
        assert_eq!(on_path, vec![Coordinate(0, 1), Coordinate(1, 1), Coordinate(2, 1)]);

        let graph = NodeGraph::build(&grid("S.\n.E\n"), Adjacency::Cardinal);
        let (_, on_path) = graph.nodes_on_shortest_paths(graph.spawn_nodes()[0], CellType::Exit).unwrap();
        assert_eq!(on_path.len(), 4);
    }

    #[test]
    fn unreachable_source_reports_none() {
        let graph = NodeGraph::build(&grid("S.E~S\n"), Adjacency::Cardinal);
        assert_eq!(graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit), None);

        let (distances, partial) = graph.multi_source_shortest_path_nodes(graph.spawn_nodes(), CellType::Exit);
        assert_eq!(distances, None);
        assert_eq!(partial.len(), 3);
    }

    #[test]
    fn clear_straight_corridor() {
        let graph = NodeGraph::build(&grid("S...E\n"), Adjacency::Cardinal);
        let mut build_nodes = graph.build_nodes().to_vec();
        let removed = graph.clear_single_paths(&mut build_nodes);

        assert_eq!(coords(&graph, &removed), vec![Coordinate(1, 0), Coordinate(2, 0), Coordinate(3, 0)]);
        assert!(build_nodes.is_empty());
    }

    #[test]
    fn clear_corridor_stops_at_branch() {
        let graph = NodeGraph::build(&grid("~~...\nS...E\n~~...\n"), Adjacency::Cardinal);
        let mut build_nodes = graph.build_nodes().to_vec();
        let removed = graph.clear_single_paths(&mut build_nodes);

        // the junction is the last cell dropped
        assert_eq!(coords(&graph, &removed), vec![Coordinate(1, 1), Coordinate(2, 1)]);
        assert_eq!(build_nodes.len(), 7);
        assert!(build_nodes.iter().all(|ix| !removed.contains(ix)));
    }

    #[test]
    fn clear_corridor_from_both_ends() {
        let graph = NodeGraph::build(&grid("~.~~\nS..E\n~.~~\n"), Adjacency::Cardinal);
        let mut build_nodes = graph.build_nodes().to_vec();
        let removed = graph.clear_single_paths(&mut build_nodes);

        assert_eq!(coords(&graph, &removed), vec![Coordinate(1, 1), Coordinate(2, 1)]);
        assert_eq!(coords(&graph, &build_nodes), vec![Coordinate(1, 0), Coordinate(1, 2)]);
    }

    #[test]
    fn clear_corridor_walks_past_unbuildable() {
        let graph = NodeGraph::build(&grid("S._.E\n"), Adjacency::Cardinal);
        let mut build_nodes = graph.build_nodes().to_vec();
        let removed = graph.clear_single_paths(&mut build_nodes);

        assert_eq!(coords(&graph, &removed), vec![Coordinate(1, 0), Coordinate(3, 0)]);
        assert!(build_nodes.is_empty());
    }

    #[test]
    fn spawns_beside_open_ground_are_measured() {
        let graph = NodeGraph::build(&grid("SSS\n...\n.E.\n"), Adjacency::Cardinal);
        let spawns = graph.spawn_set();
        assert_eq!(coords(&graph, spawns.measured()), vec![Coordinate(0, 0), Coordinate(1, 0), Coordinate(2, 0)]);
        assert!(spawns.enclosed().is_empty());
    }

    #[test]
    fn flanked_spawn_is_measured() {
        // the middle spawn is the only way out of its cluster
        let graph = NodeGraph::build(&grid("SSS\n~.~\n~E~\n"), Adjacency::Cardinal);
        let spawns = graph.spawn_set();
        assert_eq!(coords(&graph, spawns.measured()), vec![Coordinate(1, 0)]);
        assert_eq!(coords(&graph, spawns.enclosed()), vec![Coordinate(0, 0), Coordinate(2, 0)]);
        assert_eq!(spawns.distances(&graph), Some(Distances::new(vec![2, 3, 3])));
    }

    #[test]
    fn enclosed_spawns_take_cluster_detours() {
        let graph = NodeGraph::build(&grid("SS~\nSS~\n~.E\n"), Adjacency::Cardinal);
        let spawns = graph.spawn_set();
        assert_eq!(coords(&graph, spawns.measured()), vec![Coordinate(1, 1)]);
        assert_eq!(spawns.len(), 4);

        let expected = graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit);
        assert_eq!(expected, Some(Distances::new(vec![2, 3, 3, 4])));
        assert_eq!(spawns.distances(&graph), expected);
        assert_eq!(spawns.shortest_path_nodes(&graph).0, expected);
    }

    #[test]
    fn blocker_budget() {
        assert_eq!(max_blocker_count(7, 2, 0, 2), 6);
        assert_eq!(max_blocker_count(10, 9, 1, 2), 3);
        assert_eq!(max_blocker_count(0, 2, 1, 2), 0);
        assert_eq!(max_blocker_count(2, 10, 0, 0), 0);
    }

    #[test]
    fn distances_compare_sorted() {
        assert_eq!(Distances::new(vec![5, 2]), Distances::new(vec![2, 5]));
        assert_eq!(Distances::new(vec![5, 2]).values(), &[2, 5]);
        assert!(Distances::new(vec![2, 5]) < Distances::new(vec![3, 3]));
        assert!(Distances::new(vec![2, 9]) < Distances::new(vec![3, 3]));
        assert!(Distances::new(vec![4]) > Distances::new(vec![2]));
        assert_eq!(Distances::new(vec![3, 1]).to_string(), "[1, 3]");
        assert_eq!(Distances::new(vec![3, 1]).longest(), Some(3));
        assert_eq!(Distances::new(vec![3, 1]).shortest(), Some(1));
    }

    #[test]
    fn nothing_to_block() {
        let snapshot = grid("S.E\n");
        for strategy in [Strategy::Exhaustive, Strategy::Cutoff] {
            assert_eq!(snapshot.optimize(&OptimizerConfig::with_strategy(strategy)), Ok(vec![vec![]]));
        }

        let mut graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        let mut search = CutoffSearch::new();
        assert_eq!(search.generate_optimal_mazes(&mut graph, None), vec![vec![]]);
        assert_eq!(search.best_distances(), Some(&Distances::new(vec![2])));
    }

    #[test]
    fn force_detour() {
        let snapshot = grid("...\nS.E\n...\n");

        let mut graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        let mut cutoff = CutoffSearch::new();
        assert_eq!(cutoff.generate_optimal_mazes(&mut graph, Some(1)), vec![vec![Coordinate(1, 1)]]);
        assert_eq!(cutoff.best_distances(), Some(&Distances::new(vec![4])));

        let mut exhaustive = ExhaustiveSearch::new();
        assert_eq!(exhaustive.generate_optimal_mazes(&mut graph, Some(1)), vec![vec![Coordinate(1, 1)]]);
        assert_eq!(exhaustive.best_distances(), Some(&Distances::new(vec![4])));
        assert_eq!(exhaustive.stats().combinations_checked, 8);

        let placements = snapshot.optimize(&OptimizerConfig::default().with_limit(1)).unwrap();
        assert_eq!(format!("{}", snapshot.with_blockers(&placements[0])), "...
S#E
...
");
    }

    #[test]
    fn zero_blocker_limit() {
        let mut graph = NodeGraph::build(&grid("...\nS.E\n...\n"), Adjacency::Cardinal);
        let mut search = CutoffSearch::new();

        assert_eq!(search.generate_optimal_mazes(&mut graph, Some(0)), vec![vec![]]);
        assert_eq!(search.best_distances(), Some(&Distances::new(vec![2])));
        assert_eq!(search.stats().combinations_checked, 1);
        assert_eq!(SearchSpace::new(&graph, Some(0)).maxmin_distance, 2);
    }

    #[test]
    fn search_restores_graph() {
        let snapshot = grid("S...\n._..\n...E\n");
        let mut graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        let before = graph.graph.node_weights().copied().collect::<Vec<_>>();

        let first = CutoffSearch::new().generate_optimal_mazes(&mut graph, None);
        assert_eq!(graph.graph.node_weights().copied().collect::<Vec<_>>(), before);

        let second = CutoffSearch::new().generate_optimal_mazes(&mut graph, None);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("...\nS.E\n...\n", Adjacency::Cardinal)]
    #[case("S..\n.~.\n..E\n", Adjacency::Cardinal)]
    #[case("S...\n._..\n...E\n", Adjacency::Cardinal)]
    #[case("SS..\n....\n...E\n", Adjacency::Cardinal)]
    #[case("S.~\n...\n~.E\n", Adjacency::King)]
    #[case("S..E\n....\nE..S\n", Adjacency::Cardinal)]
    fn cutoff_matches_exhaustive(#[case] snapshot: &str, #[case] adjacency: Adjacency) {
        let snapshot = grid(snapshot);
        let mut graph = NodeGraph::build(&snapshot, adjacency);
        graph.validate().unwrap();

        let mut exhaustive = ExhaustiveSearch::new();
        let exhaustive_placements = exhaustive.generate_optimal_mazes(&mut graph, None);
        let mut cutoff = CutoffSearch::new();
        let cutoff_placements = cutoff.generate_optimal_mazes(&mut graph, None);

        assert_eq!(cutoff.best_distances(), exhaustive.best_distances());
        assert!(!cutoff_placements.is_empty());

        // every placement really reaches the reported value
        for placement in cutoff_placements {
            assert!(exhaustive_placements.contains(&placement));

            let blocked = NodeGraph::build(&snapshot.with_blockers(&placement), adjacency);
            let measured = blocked.multi_source_distances(blocked.spawn_nodes(), CellType::Exit);
            assert_eq!(measured.as_ref(), cutoff.best_distances());
        }
    }

    #[rstest]
    #[case("SSS~\n..~.\n....\n.~.E\n")]
    #[case("SSS\n~.~\n~.~\n~E~\n")]
    #[case("SS~\nSS.\n~..\n~.E\n")]
    #[case("S.S\n...\n.E.\n")]
    #[case("SS..\n....\n...E\n")]
    fn searches_match_brute_force(#[case] snapshot: &str) {
        let snapshot = grid(snapshot);
        let expected = brute_force(&snapshot, Adjacency::Cardinal);
        assert!(expected.is_some());

        let mut graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        let mut exhaustive = ExhaustiveSearch::new();
        exhaustive.generate_optimal_mazes(&mut graph, None);
        let mut cutoff = CutoffSearch::new();
        cutoff.generate_optimal_mazes(&mut graph, None);

        assert_eq!(exhaustive.best_distances(), expected.as_ref());
        assert_eq!(cutoff.best_distances(), expected.as_ref());
    }

    #[test]
    fn closest_spawn_decides() {
        // blocking (1, 1) sends the middle spawn around through its neighbor
        let snapshot = grid("SSS~\n..~.\n....\n.~.E\n");
        let mut graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        assert_eq!(
            graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit),
            Some(Distances::new(vec![5, 6, 6]))
        );

        let mut search = CutoffSearch::new();
        let placements = search.generate_optimal_mazes(&mut graph, None);
        assert_eq!(search.best_distances(), Some(&Distances::new(vec![6, 7, 8])));
        assert!(placements.iter().all(|placement| placement.contains(&Coordinate(1, 1))));
    }

    #[test]
    fn repeated_measurements_agree() {
        let graph = NodeGraph::build(&grid("SS..\n.~..\n...E\n"), Adjacency::Cardinal);
        let first = graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit);

        assert!(first.is_some());
        assert_eq!(graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit), first);
        assert_eq!(graph.spawn_set().distances(&graph), first);
    }

    #[test]
    fn single_blockers_stay_within_the_map() {
        let snapshot = grid("S...\n.~..\n...E\n");
        let graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        let unblocked = graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit).unwrap();

        for location in coords(&graph, graph.build_nodes()) {
            let blocked = NodeGraph::build(&snapshot.with_blockers(&[location]), Adjacency::Cardinal);
            if let Some(distances) = blocked.multi_source_distances(blocked.spawn_nodes(), CellType::Exit) {
                assert!(distances >= unblocked);
                assert!(distances.longest().unwrap() < blocked.node_count());
            }
        }
    }

    #[test]
    fn qlearn_straight_corridor() {
        let snapshot = grid("S...E\n");
        let mut graph = NodeGraph::build(&snapshot, Adjacency::Cardinal);
        let mut search = QLearnSearch::new(seeded(7));

        assert_eq!(search.generate_optimal_mazes(&mut graph, None), vec![vec![]]);
        assert_eq!(search.episodes(), 5 * 3000);
    }

    #[test]
    fn qlearn_walls_in_longest_path() {
        let snapshot = grid("...\nS.E\n...\n");
        let config = OptimizerConfig {
            strategy: Strategy::QLearn,
            qlearn: seeded(11),
            ..Default::default()
        };

        let placements = snapshot.optimize(&config).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].len(), 4);

        let blocked = NodeGraph::build(&snapshot.with_blockers(&placements[0]), Adjacency::Cardinal);
        assert_eq!(blocked.validate(), Ok(()));
        assert_eq!(blocked.multi_source_distances(blocked.spawn_nodes(), CellType::Exit), Some(Distances::new(vec![4])));
    }

    #[test]
    fn qlearn_is_reproducible_with_seed() {
        let snapshot = grid("S...\n....\n...E\n");
        let config = OptimizerConfig {
            strategy: Strategy::QLearn,
            qlearn: QLearnParams {
                training_multiplier: 200,
                ..seeded(3)
            },
            ..Default::default()
        };

        assert_eq!(snapshot.optimize(&config), snapshot.optimize(&config));
    }
}
