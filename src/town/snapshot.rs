//! Serializable snapshot of a generated town

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{BuildingId, LotId};
use crate::layout::{Block, Lot, Parcel, Street};
use crate::pathing::DistanceTable;
use crate::town::{Residence, Town};

/// Everything needed to redraw or compare a town
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TownSnapshot {
    pub seed: u64,
    pub land_size: u32,
    pub streets: Vec<Street>,
    pub blocks: Vec<Block>,
    pub parcels: Vec<Parcel>,
    pub lots: Vec<Lot>,
    pub tracts: Vec<Lot>,
    pub residences: Vec<Residence>,
    pub downtown: LotId,
    pub distances: DistanceTable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TownStats {
    pub streets: usize,
    pub parcels: usize,
    pub lots: usize,
    pub tracts: usize,
    pub blocks: usize,
    pub buildings: usize,
    pub diameter: u32,
}

impl TownSnapshot {
    pub fn new(town: &Town) -> Self {
        Self {
            seed: town.config().seed,
            land_size: town.config().land_size,
            streets: town.streets().to_vec(),
            blocks: town.blocks().to_vec(),
            parcels: town.parcels().to_vec(),
            lots: town.lots().cloned().collect(),
            tracts: town.tracts().cloned().collect(),
            residences: town.residences().to_vec(),
            downtown: town.downtown(),
            distances: town.distances().clone(),
        }
    }

    pub fn stats(&self) -> TownStats {
        let buildings: Vec<BuildingId> = self
            .lots
            .iter()
            .chain(self.tracts.iter())
            .filter_map(|l| l.building)
            .collect();
        TownStats {
            streets: self.streets.len(),
            parcels: self.parcels.len(),
            lots: self.lots.len(),
            tracts: self.tracts.len(),
            blocks: self.blocks.len(),
            buildings: buildings.len(),
            diameter: self.distances.diameter(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn summary(&self) -> String {
        let stats = self.stats();
        let downtown = self
            .lots
            .iter()
            .find(|l| l.id == self.downtown)
            .and_then(|l| l.address.as_ref())
            .map(|a| a.text.as_str())
            .unwrap_or("nowhere");
        format!(
            "Town on {}x{} land (seed {})\n{} streets, {} blocks, {} parcels, {} lots, {} tracts\nDowntown at {}, widest trip {} hops",
            self.land_size,
            self.land_size,
            self.seed,
            stats.streets,
            stats.blocks,
            stats.parcels,
            stats.lots,
            stats.tracts,
            downtown,
            stats.diameter,
        )
    }
}
