//! Land subdivision: clustered sampling into a point quadtree

pub mod quadtree;
pub mod sampling;

pub use quadtree::{LandRegion, QuadTree, Rect};
pub use sampling::{gaussian, subdivide_land};
