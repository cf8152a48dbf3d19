//! All-pairs hop distances between parcels
//!
//! Each unordered pair gets its own A* search. The searches only read
//! the graph, so large towns fan them out across the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::ParcelId;
use crate::pathing::graph::AdjacencyGraph;
use crate::pathing::search::find_hops;

/// Symmetric hop-count table, written once and read many times
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DistanceTable {
    size: usize,
    hops: Vec<u32>,
}

impl DistanceTable {
    /// Run one search per unordered pair of distinct parcels.
    ///
    /// Above `parallel_threshold` pairs the searches run in parallel.
    pub fn compute(graph: &AdjacencyGraph, parallel_threshold: usize) -> Result<Self> {
        let size = graph.len();
        let pairs: Vec<(ParcelId, ParcelId)> = (0..size as u32)
            .flat_map(|i| (i + 1..size as u32).map(move |j| (ParcelId(i), ParcelId(j))))
            .collect();

        let search = |&(a, b): &(ParcelId, ParcelId)| find_hops(graph, a, b);
        let results: Vec<u32> = if pairs.len() > parallel_threshold {
            pairs.par_iter().map(search).collect::<Result<_>>()?
        } else {
            pairs.iter().map(search).collect::<Result<_>>()?
        };

        let mut hops = vec![0; size * size];
        for (&(a, b), distance) in pairs.iter().zip(results) {
            hops[a.index() * size + b.index()] = distance;
            hops[b.index() * size + a.index()] = distance;
        }

        tracing::debug!(parcels = size, pairs = pairs.len(), "Computed distance table");
        Ok(Self { size, hops })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Hops between two parcels; `None` for parcels outside the table
    #[inline]
    pub fn get(&self, a: ParcelId, b: ParcelId) -> Option<u32> {
        if a.index() >= self.size || b.index() >= self.size {
            return None;
        }
        Some(self.hops[a.index() * self.size + b.index()])
    }

    /// Longest shortest route in the town
    pub fn diameter(&self) -> u32 {
        self.hops.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Axis, GridCoord, StreetId};
    use crate::layout::parcel::{link_parcels, Parcel};

    fn grid(side: i32) -> Vec<Parcel> {
        let mut parcels = Vec::new();
        for y in 0..side {
            for x in 0..side {
                let id = ParcelId(parcels.len() as u32);
                parcels.push(Parcel::new(
                    id,
                    StreetId(0),
                    100,
                    GridCoord::new(x + 1, y + 1),
                    Axis::EastWest,
                ));
            }
        }
        for y in 0..side {
            for x in 0..side {
                let id = (y * side + x) as u32;
                if x + 1 < side {
                    link_parcels(&mut parcels, ParcelId(id), ParcelId(id + 1));
                }
                if y + 1 < side {
                    link_parcels(&mut parcels, ParcelId(id), ParcelId(id + side as u32));
                }
            }
        }
        parcels
    }

    #[test]
    fn test_grid_distances_are_manhattan() {
        let parcels = grid(4);
        let graph = AdjacencyGraph::from_parcels(&parcels);
        let table = DistanceTable::compute(&graph, usize::MAX).unwrap();
        assert_eq!(table.len(), 16);
        for a in &parcels {
            for b in &parcels {
                assert_eq!(table.get(a.id, b.id), Some(a.manhattan_distance(b)));
            }
        }
        assert_eq!(table.diameter(), 6);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let graph = AdjacencyGraph::from_parcels(&grid(5));
        let sequential = DistanceTable::compute(&graph, usize::MAX).unwrap();
        let parallel = DistanceTable::compute(&graph, 0).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let graph = AdjacencyGraph::from_parcels(&grid(2));
        let table = DistanceTable::compute(&graph, usize::MAX).unwrap();
        assert_eq!(table.get(ParcelId(0), ParcelId(4)), None);
        assert_eq!(table.get(ParcelId(0), ParcelId(3)), Some(2));
    }
}
