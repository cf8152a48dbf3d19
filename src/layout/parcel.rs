//! Parcels: units of street frontage and the nodes of the distance graph

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Axis, GridCoord, LotId, ParcelId, SideOfStreet, StreetId};

/// Buildings that fit on one face of a block
pub const BUILDINGS_PER_BLOCK_FACE: usize = 3;

/// One stretch of frontage along a street
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub street: StreetId,
    /// Hundred-number of the block this parcel belongs to
    pub number: u32,
    pub coords: GridCoord,
    pub axis: Axis,
    /// Lots fronting this parcel
    pub lots: Vec<LotId>,
    /// Tracts fronting this parcel
    pub tracts: Vec<LotId>,
    /// Adjacent parcels; symmetric
    pub neighbors: Vec<ParcelId>,
}

impl Parcel {
    pub fn new(id: ParcelId, street: StreetId, number: u32, coords: GridCoord, axis: Axis) -> Self {
        Self {
            id,
            street,
            number,
            coords,
            axis,
            lots: Vec::new(),
            tracts: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    pub fn add_neighbor(&mut self, other: ParcelId) {
        if other != self.id && !self.neighbors.contains(&other) {
            self.neighbors.push(other);
        }
    }

    pub fn manhattan_distance(&self, other: &Parcel) -> u32 {
        self.coords.manhattan(&other.coords)
    }
}

/// Link two parcels in both directions
pub fn link_parcels(parcels: &mut [Parcel], a: ParcelId, b: ParcelId) {
    parcels[a.index()].add_neighbor(b);
    parcels[b.index()].add_neighbor(a);
}

/// Devise house numbers for one face of a block.
///
/// The hundred is cut into three increments, one per building, and each
/// number is jittered inside its increment. North and east faces take
/// even numbers, south and west faces odd ones.
pub fn determine_house_numbering(
    block_number: u32,
    side: SideOfStreet,
    rng: &mut ChaCha8Rng,
) -> [u32; BUILDINGS_PER_BLOCK_FACE] {
    let increment = (100 / BUILDINGS_PER_BLOCK_FACE) as i32;
    let odd = if side.is_even() { 0 } else { 1 };
    // Bounds share the face's parity: [2, 98] even, [1, 99] odd
    let lowest = 2 - odd;
    let highest = 98 + odd;

    let mut numbers = [0u32; BUILDINGS_PER_BLOCK_FACE];
    for (i, slot) in numbers.iter_mut().enumerate() {
        let base = i as i32 * increment - 1;
        let mut n = base + (rng.gen::<f64>() * increment as f64) as i32;
        if n.rem_euclid(2) != odd {
            n += 1;
        }
        let n = n.clamp(lowest, highest);
        *slot = block_number + n as u32;
    }
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_house_number_parity_by_side() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            for n in determine_house_numbering(400, SideOfStreet::North, &mut rng) {
                assert_eq!(n % 2, 0);
            }
            for n in determine_house_numbering(400, SideOfStreet::East, &mut rng) {
                assert_eq!(n % 2, 0);
            }
            for n in determine_house_numbering(400, SideOfStreet::South, &mut rng) {
                assert_eq!(n % 2, 1);
            }
            for n in determine_house_numbering(400, SideOfStreet::West, &mut rng) {
                assert_eq!(n % 2, 1);
            }
        }
    }

    #[test]
    fn test_house_numbers_stay_in_block_and_ascend() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        for _ in 0..200 {
            let numbers = determine_house_numbering(700, SideOfStreet::West, &mut rng);
            for n in numbers {
                assert!((701..=799).contains(&n), "{}", n);
            }
            assert!(numbers[0] <= numbers[1] && numbers[1] <= numbers[2]);
        }
    }

    #[test]
    fn test_neighbors_are_deduplicated_and_symmetric() {
        let mut parcels = vec![
            Parcel::new(ParcelId(0), StreetId(0), 100, GridCoord::new(1, 1), Axis::NorthSouth),
            Parcel::new(ParcelId(1), StreetId(0), 200, GridCoord::new(1, 2), Axis::NorthSouth),
        ];
        link_parcels(&mut parcels, ParcelId(0), ParcelId(1));
        link_parcels(&mut parcels, ParcelId(1), ParcelId(0));
        assert_eq!(parcels[0].neighbors, vec![ParcelId(1)]);
        assert_eq!(parcels[1].neighbors, vec![ParcelId(0)]);
        assert_eq!(parcels[0].manhattan_distance(&parcels[1]), 1);
    }
}
