//! Lots and tracts: the addressable plots buildings go on

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{BlockId, BuildingId, LotId, ParcelId, SideOfStreet, StreetId};
use crate::layout::streets::Street;

/// Whether a plot holds one building or spans several parcels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    Lot,
    /// Large plot for parks, cemeteries, farms; `size` parcels per side
    Tract { size: u32 },
}

/// One street a plot can be addressed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontage {
    pub parcel: ParcelId,
    pub street: StreetId,
    pub side: SideOfStreet,
    pub house_number: u32,
    /// 0 for the first plot on this face of the parcel, 1 for the second
    pub position_in_block: u8,
}

/// The address a plot settled on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub house_number: u32,
    pub street: StreetId,
    pub parcel: ParcelId,
    /// Index into the plot's frontages
    pub frontage: usize,
    pub text: String,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A lot (or tract) in the town
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub kind: PlotKind,
    pub frontages: Vec<Frontage>,
    pub address: Option<Address>,
    pub block: Option<BlockId>,
    pub building: Option<BuildingId>,
    /// Everything that has ever stood here, oldest first
    pub former_buildings: Vec<BuildingId>,
    pub neighboring_lots: Vec<LotId>,
    /// Render position, set once addresses are final
    pub coordinates: Option<(f64, f64)>,
}

impl Lot {
    pub fn new(id: LotId) -> Self {
        Self::with_kind(id, PlotKind::Lot)
    }

    pub fn tract(id: LotId, size: u32) -> Self {
        Self::with_kind(id, PlotKind::Tract { size })
    }

    fn with_kind(id: LotId, kind: PlotKind) -> Self {
        Self {
            id,
            kind,
            frontages: Vec::new(),
            address: None,
            block: None,
            building: None,
            former_buildings: Vec::new(),
            neighboring_lots: Vec::new(),
            coordinates: None,
        }
    }

    pub fn is_tract(&self) -> bool {
        matches!(self.kind, PlotKind::Tract { .. })
    }

    pub fn is_vacant(&self) -> bool {
        self.building.is_none()
    }

    pub fn add_frontage(&mut self, frontage: Frontage) {
        self.frontages.push(frontage);
    }

    /// Parcels this plot fronts, one per frontage
    pub fn parcels(&self) -> impl Iterator<Item = ParcelId> + '_ {
        self.frontages.iter().map(|f| f.parcel)
    }

    pub fn streets(&self) -> impl Iterator<Item = StreetId> + '_ {
        self.frontages.iter().map(|f| f.street)
    }

    /// The frontage the address was taken from
    pub fn address_frontage(&self) -> Option<&Frontage> {
        self.address
            .as_ref()
            .and_then(|a| self.frontages.get(a.frontage))
    }

    /// Pick one frontage at random as the permanent address.
    ///
    /// Does nothing once an address exists.
    pub fn generate_address(&mut self, streets: &[Street], rng: &mut ChaCha8Rng) {
        if self.address.is_some() || self.frontages.is_empty() {
            return;
        }
        let index = rng.gen_range(0..self.frontages.len());
        let frontage = &self.frontages[index];
        let street = &streets[frontage.street.index()];
        self.address = Some(Address {
            house_number: frontage.house_number,
            street: frontage.street,
            parcel: frontage.parcel,
            frontage: index,
            text: format!("{} {}", frontage.house_number, street.name),
        });
    }

    /// Mark neighbours, keeping first-seen order and skipping self
    pub fn set_neighbors(&mut self, neighbors: impl IntoIterator<Item = LotId>) {
        self.neighboring_lots.clear();
        for other in neighbors {
            if other != self.id && !self.neighboring_lots.contains(&other) {
                self.neighboring_lots.push(other);
            }
        }
    }
}

impl std::fmt::Display for Lot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let address = self
            .address
            .as_ref()
            .map(|a| a.text.as_str())
            .unwrap_or("an unsurveyed address");
        match (self.kind, self.building) {
            (PlotKind::Lot, Some(b)) => {
                write!(f, "A lot at {} on which building #{} has been erected", address, b.0)
            }
            (PlotKind::Lot, None) => write!(f, "A vacant lot at {}", address),
            (PlotKind::Tract { .. }, Some(b)) => {
                write!(f, "A tract of land at {} that is the site of building #{}", address, b.0)
            }
            (PlotKind::Tract { .. }, None) => write!(f, "A vacant tract of land at {}", address),
        }
    }
}
