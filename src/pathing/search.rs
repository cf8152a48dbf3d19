//! A* hop search over the parcel graph
//!
//! Every edge costs one hop. The frontier is ordered on estimated total
//! cost; exhausting it without reaching the goal is reported as
//! `Unreachable` rather than looping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::core::error::{LayoutError, Result};
use crate::core::types::ParcelId;
use crate::pathing::graph::AdjacencyGraph;

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    parcel: ParcelId,
    f_cost: u32, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; lower ID wins ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.parcel.cmp(&self.parcel))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lower bound on hops between two parcels.
///
/// Corner links can join parcels two grid units apart, so half the
/// Manhattan distance (rounded up) never overestimates.
fn heuristic(graph: &AdjacencyGraph, from: ParcelId, to: ParcelId) -> u32 {
    match (graph.coords(from), graph.coords(to)) {
        (Some(a), Some(b)) => a.manhattan(&b).div_ceil(2),
        _ => 0,
    }
}

/// Find a shortest parcel route using A*
///
/// The route includes both endpoints; `start == goal` gives `[start]`.
pub fn find_path(graph: &AdjacencyGraph, start: ParcelId, goal: ParcelId) -> Result<Vec<ParcelId>> {
    let unreachable = LayoutError::Unreachable {
        from: start,
        to: goal,
    };
    if start.index() >= graph.len() || goal.index() >= graph.len() {
        return Err(unreachable);
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<ParcelId, ParcelId> = AHashMap::new();
    let mut g_scores: AHashMap<ParcelId, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        parcel: start,
        f_cost: heuristic(graph, start, goal),
    });

    while let Some(current) = open_set.pop() {
        if current.parcel == goal {
            return Ok(reconstruct_path(&came_from, current.parcel));
        }

        let current_g = g_scores.get(&current.parcel).copied().unwrap_or(u32::MAX);
        // Stale heap entry
        if current.f_cost > current_g.saturating_add(heuristic(graph, current.parcel, goal)) {
            continue;
        }

        for &neighbor in graph.neighbors(current.parcel) {
            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.parcel);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    parcel: neighbor,
                    f_cost: tentative_g + heuristic(graph, neighbor, goal),
                });
            }
        }
    }

    Err(unreachable)
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<ParcelId, ParcelId>, mut current: ParcelId) -> Vec<ParcelId> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Hop count of the shortest route between two parcels
pub fn find_hops(graph: &AdjacencyGraph, start: ParcelId, goal: ParcelId) -> Result<u32> {
    find_path(graph, start, goal).map(|path| (path.len() - 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Axis, GridCoord, StreetId};
    use crate::layout::parcel::{link_parcels, Parcel};

    /// Ring of parcels around a 3x3 block, linked in order
    fn ring() -> Vec<Parcel> {
        let coords = [
            (1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3), (1, 2),
        ];
        let mut parcels: Vec<Parcel> = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                Parcel::new(
                    ParcelId(i as u32),
                    StreetId(0),
                    100,
                    GridCoord::new(x, y),
                    Axis::EastWest,
                )
            })
            .collect();
        for i in 0..coords.len() {
            let next = (i + 1) % coords.len();
            link_parcels(&mut parcels, ParcelId(i as u32), ParcelId(next as u32));
        }
        parcels
    }

    #[test]
    fn test_path_to_self() {
        let graph = AdjacencyGraph::from_parcels(&ring());
        assert_eq!(find_path(&graph, ParcelId(3), ParcelId(3)).unwrap(), vec![ParcelId(3)]);
        assert_eq!(find_hops(&graph, ParcelId(3), ParcelId(3)).unwrap(), 0);
    }

    #[test]
    fn test_path_takes_shorter_way_round() {
        let graph = AdjacencyGraph::from_parcels(&ring());
        let path = find_path(&graph, ParcelId(0), ParcelId(6)).unwrap();
        assert_eq!(path, vec![ParcelId(0), ParcelId(7), ParcelId(6)]);
        assert_eq!(find_hops(&graph, ParcelId(0), ParcelId(4)).unwrap(), 4);
        assert_eq!(find_hops(&graph, ParcelId(4), ParcelId(0)).unwrap(), 4);
    }

    #[test]
    fn test_long_link_does_not_break_exactness() {
        // A corner link joining parcels two grid units apart
        let mut parcels = ring();
        link_parcels(&mut parcels, ParcelId(7), ParcelId(1));
        let graph = AdjacencyGraph::from_parcels(&parcels);
        assert_eq!(find_hops(&graph, ParcelId(7), ParcelId(1)).unwrap(), 1);
        assert_eq!(find_hops(&graph, ParcelId(6), ParcelId(2)).unwrap(), 3);
        assert_eq!(find_hops(&graph, ParcelId(2), ParcelId(6)).unwrap(), 3);
    }

    #[test]
    fn test_unreachable_goal() {
        let mut parcels = ring();
        parcels.push(Parcel::new(
            ParcelId(8),
            StreetId(1),
            500,
            GridCoord::new(5, 5),
            Axis::NorthSouth,
        ));
        let graph = AdjacencyGraph::from_parcels(&parcels);
        assert!(matches!(
            find_path(&graph, ParcelId(0), ParcelId(8)),
            Err(LayoutError::Unreachable { .. })
        ));
        assert!(find_hops(&graph, ParcelId(0), ParcelId(42)).is_err());
    }
}
