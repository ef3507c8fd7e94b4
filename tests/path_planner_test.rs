//! A* planner behaviour, checked against petgraph's Dijkstra on random graphs

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use traffic_grid::simulation::{
    manhattan_heuristic, plan, town, zero_heuristic, IntersectionId, PathPlanner, SimError,
    SimRoadNetwork,
};

const EPSILON: f64 = 1e-9;

fn id(x: i32, y: i32) -> IntersectionId {
    IntersectionId::new(x, y)
}

/// Random directed network plus an equivalent petgraph graph
fn random_network(rng: &mut StdRng, size: i32) -> (SimRoadNetwork, DiGraph<IntersectionId, f64>) {
    let mut network = SimRoadNetwork::new();
    let mut baseline = DiGraph::new();
    let mut nodes = Vec::new();

    for i in 0..size {
        network.add_intersection(id(i, 0));
        nodes.push(baseline.add_node(id(i, 0)));
    }

    for from in 0..size {
        for to in 0..size {
            if from == to || !rng.random_bool(0.3) {
                continue;
            }
            // Whole numbers keep float sums exact; zero-cost roads included
            let weight = f64::from(rng.random_range(0..10u32));
            network.add_road(id(from, 0), id(to, 0), weight).unwrap();
            baseline.add_edge(nodes[from as usize], nodes[to as usize], weight);
        }
    }

    (network, baseline)
}

fn assert_valid_route(network: &SimRoadNetwork, start: IntersectionId, goal: IntersectionId, nodes: &[IntersectionId]) {
    assert_eq!(nodes.first(), Some(&start));
    assert_eq!(nodes.last(), Some(&goal));
    for pair in nodes.windows(2) {
        assert!(
            network.weight(pair[0], pair[1]).is_ok(),
            "route uses missing road {} -> {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_plan_matches_dijkstra_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..25 {
        let size = rng.random_range(2..9);
        let (network, baseline) = random_network(&mut rng, size);

        for start_index in baseline.node_indices() {
            let distances = dijkstra(&baseline, start_index, None, |edge| *edge.weight());
            let start = baseline[start_index];

            for goal_index in baseline.node_indices() {
                let goal = baseline[goal_index];
                let route = plan(&network, start, goal, zero_heuristic).unwrap();

                match distances.get(&goal_index) {
                    Some(&expected) => {
                        assert_valid_route(&network, start, goal, route.nodes());
                        assert!((route.planned_cost() - expected).abs() < EPSILON);
                        assert!((network.route_cost(&route).unwrap() - expected).abs() < EPSILON);
                    }
                    None => assert!(route.is_empty(), "{} should not reach {}", start, goal),
                }
            }
        }
    }
}

#[test]
fn test_manhattan_plan_matches_dijkstra_on_congested_grid() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut network = town::build_grid(6, 6, 1.0).unwrap();
    town::add_random_congestion(&mut network, &mut rng, 20, 1.0, 8.0).unwrap();

    let mut baseline: DiGraph<IntersectionId, f64> = DiGraph::new();
    let nodes: Vec<(IntersectionId, NodeIndex)> = network
        .intersections()
        .into_iter()
        .map(|intersection| (intersection, baseline.add_node(intersection)))
        .collect();
    let index_of = |intersection: IntersectionId| {
        nodes
            .iter()
            .find(|(candidate, _)| *candidate == intersection)
            .map(|(_, index)| *index)
            .unwrap()
    };
    for &(intersection, index) in &nodes {
        for (neighbor, weight) in network.neighbors(intersection).unwrap() {
            baseline.add_edge(index, index_of(neighbor), weight);
        }
    }

    let start = id(0, 0);
    let distances = dijkstra(&baseline, index_of(start), None, |edge| *edge.weight());
    for &(goal, index) in &nodes {
        let route = plan(&network, start, goal, manhattan_heuristic).unwrap();
        assert_valid_route(&network, start, goal, route.nodes());
        assert!((route.planned_cost() - distances[&index]).abs() < EPSILON);
    }
}

#[test]
fn test_plan_to_self_is_single_node() {
    let network = town::build_grid(3, 3, 1.0).unwrap();
    let route = PathPlanner::manhattan().plan(&network, id(1, 1), id(1, 1)).unwrap();

    assert_eq!(route.nodes(), &[id(1, 1)]);
    assert_eq!(route.planned_cost(), 0.0);
}

#[test]
fn test_plan_between_disconnected_nodes_is_empty() {
    let mut network = town::build_grid(2, 2, 1.0).unwrap();
    network.add_intersection(id(10, 10));

    let route = PathPlanner::manhattan().plan(&network, id(0, 0), id(10, 10)).unwrap();
    assert!(route.is_empty());
    assert_eq!(route.goal(), None);
}

#[test]
fn test_plan_respects_one_way_roads() {
    let mut network = SimRoadNetwork::new();
    network.add_intersection(id(0, 0));
    network.add_intersection(id(1, 0));
    network.add_road(id(0, 0), id(1, 0), 1.0).unwrap();

    let planner = PathPlanner::dijkstra();
    assert_eq!(
        planner.plan(&network, id(0, 0), id(1, 0)).unwrap().nodes(),
        &[id(0, 0), id(1, 0)]
    );
    assert!(planner.plan(&network, id(1, 0), id(0, 0)).unwrap().is_empty());
}

#[test]
fn test_plan_with_unknown_endpoint_fails() {
    let network = town::build_grid(2, 2, 1.0).unwrap();
    let planner = PathPlanner::manhattan();

    assert_eq!(
        planner.plan(&network, id(9, 9), id(0, 0)),
        Err(SimError::UnknownNode(id(9, 9)))
    );
    assert_eq!(
        planner.plan(&network, id(0, 0), id(9, 9)),
        Err(SimError::UnknownNode(id(9, 9)))
    );
}

#[test]
fn test_uniform_grid_route_is_manhattan_length() {
    let network = town::build_grid(5, 5, 1.0).unwrap();
    let route = PathPlanner::manhattan().plan(&network, id(0, 0), id(4, 4)).unwrap();

    assert_eq!(route.len(), 9);
    assert_eq!(route.planned_cost(), 8.0);
    assert_valid_route(&network, id(0, 0), id(4, 4), route.nodes());
}

#[test]
fn test_plan_avoids_congested_road() {
    let mut network = town::build_grid(3, 3, 1.0).unwrap();
    network.set_weight(id(0, 0), id(1, 0), 10.0).unwrap();

    let route = PathPlanner::manhattan().plan(&network, id(0, 0), id(2, 0)).unwrap();

    assert_eq!(route.planned_cost(), 4.0);
    assert_eq!(route.get(1), Some(id(0, 1)));
}

#[test]
fn test_replanning_sees_new_weights() {
    let mut network = town::build_grid(3, 1, 1.0).unwrap();
    let planner = PathPlanner::manhattan();

    let before = planner.plan(&network, id(0, 0), id(2, 0)).unwrap();
    network.set_weight(id(1, 0), id(2, 0), 4.0).unwrap();
    let after = planner.plan(&network, id(0, 0), id(2, 0)).unwrap();

    assert_eq!(before.nodes(), after.nodes());
    assert_eq!(before.planned_cost(), 2.0);
    assert_eq!(after.planned_cost(), 5.0);
}

#[test]
fn test_repeated_identical_weight_updates_give_identical_plans() {
    let mut network = town::build_grid(5, 5, 1.0).unwrap();
    let planner = PathPlanner::manhattan();

    network.set_weight(id(1, 1), id(2, 1), 3.0).unwrap();
    let once = planner.plan(&network, id(0, 0), id(4, 4)).unwrap();
    network.set_weight(id(1, 1), id(2, 1), 3.0).unwrap();
    let twice = planner.plan(&network, id(0, 0), id(4, 4)).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_plan_is_deterministic() {
    let network = town::build_grid(6, 6, 1.0).unwrap();
    let planner = PathPlanner::manhattan();

    let first = planner.plan(&network, id(0, 5), id(5, 0)).unwrap();
    for _ in 0..10 {
        assert_eq!(planner.plan(&network, id(0, 5), id(5, 0)).unwrap(), first);
    }
}

#[test]
fn test_custom_heuristic_planner() {
    let network = town::build_grid(4, 4, 2.0).unwrap();
    // Each grid step costs 2, so doubling grid distance is still admissible
    let planner = PathPlanner::new(|from, to| 2.0 * manhattan_heuristic(from, to));

    let route = planner.plan(&network, id(0, 0), id(3, 3)).unwrap();
    assert_eq!(route.len(), 7);
    assert_eq!(route.planned_cost(), 12.0);
}

#[test]
fn test_manhattan_planner_handles_extreme_coordinates() {
    let far_west = id(i32::MIN, 0);
    let far_east = id(i32::MAX, 1);
    assert_eq!(far_west.manhattan_distance(&far_east), u64::from(u32::MAX) + 1);

    let mut network = SimRoadNetwork::new();
    network.add_intersection(far_west);
    network.add_intersection(far_east);
    network.add_road(far_west, far_east, 1.0).unwrap();

    let route = PathPlanner::manhattan().plan(&network, far_west, far_east).unwrap();
    assert_eq!(route.nodes(), &[far_west, far_east]);
    assert_eq!(route.planned_cost(), 1.0);
}
