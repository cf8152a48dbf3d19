//! Town Layout - procedural street grids, lots and hop distances
//!
//! Land is carved by a point quadtree, leaf edges become named streets,
//! and each leaf is cut into parcels, lots and tracts. All-pairs parcel
//! hop counts are precomputed so distance queries are lookups.

pub mod core;
pub mod layout;
pub mod pathing;
pub mod spatial;
pub mod town;
