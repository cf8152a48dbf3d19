//! Streets, parcels, lots and blocks laid over the subdivided land

pub mod block;
pub mod builder;
pub mod lot;
pub mod names;
pub mod parcel;
pub mod streets;

pub use block::{survey_blocks, Block};
pub use builder::{build_plots, PlotBuilder, Plots};
pub use lot::{Address, Frontage, Lot, PlotKind};
pub use parcel::{determine_house_numbering, link_parcels, Parcel, BUILDINGS_PER_BLOCK_FACE};
pub use streets::{generate_street_name, grid_index, Street, StreetNetwork};
