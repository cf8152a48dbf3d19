//! City blocks in the conventional sense: "the 400 block of Main Street"

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{LayoutError, Result};
use crate::core::types::{Axis, BlockId, BuildingId, IdAllocator, LotId, StreetId};
use crate::layout::lot::Lot;
use crate::layout::parcel::Parcel;
use crate::layout::streets::Street;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub number: u32,
    pub street: StreetId,
    pub street_name: String,
    /// Plots on this block, sorted by house number
    pub lots: Vec<LotId>,
    pub starting_coordinates: (f64, f64),
    pub ending_coordinates: (f64, f64),
}

impl Block {
    pub fn new(id: BlockId, number: u32, street: &Street) -> Self {
        let along = number as f64 / 100.0;
        let across = street.number as f64;
        let (starting_coordinates, ending_coordinates) = match street.axis() {
            Axis::NorthSouth => ((across, along), (across, along + 1.0)),
            Axis::EastWest => ((along, across), (along + 1.0, across)),
        };
        Self {
            id,
            number,
            street: street.id,
            street_name: street.name.clone(),
            lots: Vec::new(),
            starting_coordinates,
            ending_coordinates,
        }
    }

    /// Buildings currently standing on this block
    pub fn buildings(&self, plots: &[Lot]) -> Vec<BuildingId> {
        self.lots
            .iter()
            .filter_map(|id| plots[id.index()].building)
            .collect()
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} block of {}", self.number, self.street_name)
    }
}

/// Group plots into blocks by (hundred-number, street) of their address,
/// then add empty filler blocks so numbering along each street has no gaps.
///
/// `order` fixes survey order, which decides block IDs and the order of
/// plots sharing a house number.
pub fn survey_blocks(
    order: &[LotId],
    plots: &mut [Lot],
    parcels: &[Parcel],
    streets: &mut [Street],
    ids: &mut IdAllocator,
) -> Result<Vec<Block>> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut by_key: AHashMap<(u32, StreetId), BlockId> = AHashMap::new();

    for &lot_id in order {
        let plot = &mut plots[lot_id.index()];
        let address = plot.address.as_ref().ok_or(LayoutError::NoFrontage(lot_id))?;
        let parcel = &parcels[address.parcel.index()];
        let key = (parcel.number, parcel.street);

        let block_id = match by_key.get(&key) {
            Some(&id) => id,
            None => {
                let id = ids.block();
                let street = &mut streets[parcel.street.index()];
                blocks.push(Block::new(id, parcel.number, street));
                street.blocks.push(id);
                by_key.insert(key, id);
                id
            }
        };
        blocks[block_id.index()].lots.push(lot_id);
        plot.block = Some(block_id);
    }

    for block in &mut blocks {
        block.lots.sort_by_key(|id| {
            plots[id.index()]
                .address
                .as_ref()
                .map(|a| a.house_number)
                .unwrap_or(0)
        });
    }

    let surveyed = blocks.len();
    for street in streets.iter_mut() {
        street.blocks.sort_by_key(|id| blocks[id.index()].number);
        let (Some(first), Some(last)) = (street.blocks.first(), street.blocks.last()) else {
            continue;
        };
        let lowest = blocks[first.index()].number;
        let highest = blocks[last.index()].number;

        for number in (lowest..=highest).step_by(100) {
            if !street.blocks.iter().any(|id| blocks[id.index()].number == number) {
                let id = ids.block();
                blocks.push(Block::new(id, number, street));
                street.blocks.push(id);
            }
        }
        street.blocks.sort_by_key(|id| blocks[id.index()].number);
    }

    tracing::debug!(
        blocks = blocks.len(),
        fillers = blocks.len() - surveyed,
        "Surveyed city blocks"
    );
    Ok(blocks)
}
