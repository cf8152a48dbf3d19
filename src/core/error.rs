use thiserror::Error;

use crate::core::types::{Axis, BuildingId, GridCoord, LotId, ParcelId};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Layout produced {found} tracts after {attempts} attempts, {required} required")]
    InsufficientTracts {
        required: usize,
        found: usize,
        attempts: u32,
    },

    #[error("No {axis:?} street fronts grid position {coord:?}")]
    MissingFrontage { axis: Axis, coord: GridCoord },

    #[error("Lot {0:?} has no street frontage")]
    NoFrontage(LotId),

    #[error("Layout holds no lots to place a downtown on")]
    EmptyLayout,

    #[error("Parcel graph is split into {components} components")]
    Disconnected { components: usize },

    #[error("No path from parcel {from:?} to parcel {to:?}")]
    Unreachable { from: ParcelId, to: ParcelId },

    #[error("Lot not found: {0:?}")]
    UnknownLot(LotId),

    #[error("Residence not found: {0:?}")]
    UnknownResidence(BuildingId),

    #[error("Building {building:?} does not stand on lot {lot:?}")]
    BuildingNotOnLot { building: BuildingId, lot: LotId },

    #[error("Lot {lot:?} is already occupied by {building:?}")]
    LotOccupied { lot: LotId, building: BuildingId },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
