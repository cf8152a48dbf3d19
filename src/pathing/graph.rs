//! Parcel adjacency graph
//!
//! A read-only copy of parcel neighbour lists, indexed by `ParcelId`.
//! Shared freely across search workers once built.

use crate::core::error::{LayoutError, Result};
use crate::core::types::{GridCoord, ParcelId};
use crate::layout::parcel::Parcel;

#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    adjacency: Vec<Vec<ParcelId>>,
    coords: Vec<GridCoord>,
}

impl AdjacencyGraph {
    pub fn from_parcels(parcels: &[Parcel]) -> Self {
        Self {
            adjacency: parcels.iter().map(|p| p.neighbors.clone()).collect(),
            coords: parcels.iter().map(|p| p.coords).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    #[inline]
    pub fn neighbors(&self, parcel: ParcelId) -> &[ParcelId] {
        self.adjacency
            .get(parcel.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn coords(&self, parcel: ParcelId) -> Option<GridCoord> {
        self.coords.get(parcel.index()).copied()
    }

    /// Every edge appears in both endpoint lists
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(i, neighbors)| {
            neighbors
                .iter()
                .all(|n| self.neighbors(*n).contains(&ParcelId(i as u32)))
        })
    }

    /// Number of connected components (flood fill)
    pub fn components(&self) -> usize {
        let mut seen = vec![false; self.len()];
        let mut count = 0;
        let mut stack = Vec::new();

        for root in 0..self.len() {
            if seen[root] {
                continue;
            }
            count += 1;
            seen[root] = true;
            stack.push(ParcelId(root as u32));
            while let Some(current) = stack.pop() {
                for &next in self.neighbors(current) {
                    if !seen[next.index()] {
                        seen[next.index()] = true;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }

    /// Fail unless every parcel can reach every other
    pub fn ensure_connected(&self) -> Result<()> {
        match self.components() {
            0 | 1 => Ok(()),
            components => Err(LayoutError::Disconnected { components }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Axis, StreetId};
    use crate::layout::parcel::link_parcels;

    fn line(n: u32) -> Vec<Parcel> {
        let mut parcels: Vec<Parcel> = (0..n)
            .map(|i| {
                Parcel::new(
                    ParcelId(i),
                    StreetId(0),
                    (i + 1) * 100,
                    GridCoord::new(1, i as i32 + 1),
                    Axis::NorthSouth,
                )
            })
            .collect();
        for i in 1..n {
            link_parcels(&mut parcels, ParcelId(i - 1), ParcelId(i));
        }
        parcels
    }

    #[test]
    fn test_line_is_connected_and_symmetric() {
        let graph = AdjacencyGraph::from_parcels(&line(5));
        assert_eq!(graph.len(), 5);
        assert!(graph.is_symmetric());
        assert_eq!(graph.components(), 1);
        assert!(graph.ensure_connected().is_ok());
        assert_eq!(graph.neighbors(ParcelId(2)), &[ParcelId(1), ParcelId(3)]);
        assert_eq!(graph.coords(ParcelId(4)), Some(GridCoord::new(1, 5)));
    }

    #[test]
    fn test_split_graph_is_reported() {
        let mut parcels = line(4);
        parcels[1].neighbors.retain(|n| *n != ParcelId(2));
        parcels[2].neighbors.retain(|n| *n != ParcelId(1));
        let graph = AdjacencyGraph::from_parcels(&parcels);
        assert_eq!(graph.components(), 2);
        assert!(matches!(
            graph.ensure_connected(),
            Err(LayoutError::Disconnected { components: 2 })
        ));
    }

    #[test]
    fn test_unknown_parcel_has_no_neighbors() {
        let graph = AdjacencyGraph::from_parcels(&line(2));
        assert!(graph.neighbors(ParcelId(9)).is_empty());
        assert_eq!(graph.coords(ParcelId(9)), None);
    }
}
