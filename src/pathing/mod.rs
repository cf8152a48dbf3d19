//! Parcel adjacency and hop distances

pub mod graph;
pub mod search;
pub mod table;

pub use graph::AdjacencyGraph;
pub use search::{find_hops, find_path};
pub use table::DistanceTable;
