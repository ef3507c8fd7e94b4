//! A* shortest-path search over the road network
//!
//! The frontier is a binary heap ordered by `f = g + h`. Entries with equal
//! `f` pop in insertion order, so a given network and heuristic always yield
//! the same route.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use super::error::{SimError, SimResult};
use super::road_network::SimRoadNetwork;
use super::types::{IntersectionId, Route, Weight};

/// Grid distance between two intersections.
///
/// Admissible as long as every road costs at least the number of grid steps
/// it spans, which holds for a unit grid with non-decreasing congestion.
pub fn manhattan_heuristic(from: IntersectionId, to: IntersectionId) -> Weight {
    from.manhattan_distance(&to) as Weight
}

/// Always zero; turns A* into Dijkstra.
pub fn zero_heuristic(_from: IntersectionId, _to: IntersectionId) -> Weight {
    0.0
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f_score: OrderedFloat<Weight>,
    sequence: u64,
    intersection: IntersectionId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the lowest f and the
        // earliest insertion on top.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Finds the cheapest route from `start` to `goal`.
///
/// Returns an empty route when `goal` is unreachable. Fails only when either
/// endpoint is not part of the network.
pub fn plan<H>(
    network: &SimRoadNetwork,
    start: IntersectionId,
    goal: IntersectionId,
    heuristic: H,
) -> SimResult<Route>
where
    H: Fn(IntersectionId, IntersectionId) -> Weight,
{
    if !network.contains(start) {
        return Err(SimError::UnknownNode(start));
    }
    if !network.contains(goal) {
        return Err(SimError::UnknownNode(goal));
    }
    if start == goal {
        return Ok(Route::new(vec![start], 0.0));
    }

    let mut frontier = BinaryHeap::new();
    let mut closed: HashSet<IntersectionId> = HashSet::new();
    let mut came_from: HashMap<IntersectionId, IntersectionId> = HashMap::new();
    let mut g_score: HashMap<IntersectionId, Weight> = HashMap::new();
    let mut sequence = 0u64;

    g_score.insert(start, 0.0);
    frontier.push(FrontierEntry {
        f_score: OrderedFloat(heuristic(start, goal)),
        sequence,
        intersection: start,
    });

    while let Some(FrontierEntry { intersection, .. }) = frontier.pop() {
        if !closed.insert(intersection) {
            // Stale entry for a node finalized through a cheaper path
            continue;
        }

        let current_g = g_score.get(&intersection).copied().unwrap_or(0.0);

        if intersection == goal {
            return Ok(Route::new(
                reconstruct_path(&came_from, start, goal),
                current_g,
            ));
        }

        for (neighbor, weight) in network.neighbors(intersection)? {
            if closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + weight;
            let improves = g_score
                .get(&neighbor)
                .map_or(true, |&known| tentative_g < known);

            if improves {
                came_from.insert(neighbor, intersection);
                g_score.insert(neighbor, tentative_g);
                sequence += 1;
                frontier.push(FrontierEntry {
                    f_score: OrderedFloat(tentative_g + heuristic(neighbor, goal)),
                    sequence,
                    intersection: neighbor,
                });
            }
        }
    }

    Ok(Route::unreachable())
}

fn reconstruct_path(
    came_from: &HashMap<IntersectionId, IntersectionId>,
    start: IntersectionId,
    goal: IntersectionId,
) -> Vec<IntersectionId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

type HeuristicFn = dyn Fn(IntersectionId, IntersectionId) -> Weight + Send + Sync;

/// A* planner bound to a caller-chosen heuristic
///
/// Holds no search state between calls, so plans made after a
/// `set_weight` always see the new weights.
pub struct PathPlanner {
    heuristic: Box<HeuristicFn>,
}

impl PathPlanner {
    pub fn new<H>(heuristic: H) -> Self
    where
        H: Fn(IntersectionId, IntersectionId) -> Weight + Send + Sync + 'static,
    {
        Self {
            heuristic: Box::new(heuristic),
        }
    }

    /// Planner using grid distance as its estimate.
    /// Only exact while no road costs less than the grid steps it spans.
    pub fn manhattan() -> Self {
        Self::new(manhattan_heuristic)
    }

    /// Planner without an estimate (plain Dijkstra)
    pub fn dijkstra() -> Self {
        Self::new(zero_heuristic)
    }

    pub fn plan(
        &self,
        network: &SimRoadNetwork,
        start: IntersectionId,
        goal: IntersectionId,
    ) -> SimResult<Route> {
        plan(network, start, goal, |from, to| (self.heuristic)(from, to))
    }
}

/// Dijkstra: exact for any non-negative weights, including roads cheaper
/// than their grid length
impl Default for PathPlanner {
    fn default() -> Self {
        Self::dijkstra()
    }
}

impl fmt::Debug for PathPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPlanner").finish_non_exhaustive()
    }
}
