//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for parcels (street frontage segments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParcelId(pub u32);

/// Unique identifier for lots and tracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LotId(pub u32);

/// Unique identifier for streets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreetId(pub u32);

/// Unique identifier for city blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Identifier for a building erected by the business/residence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

macro_rules! arena_index {
    ($($id:ty),*) => {
        $(
            impl $id {
                /// Position of this entity in its owning arena
                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

arena_index!(ParcelId, LotId, StreetId, BlockId);

/// Hands out stable integer IDs for everything the town owns.
///
/// IDs double as arena indices: each kind counts up from zero, and the
/// owner pushes the entity into its `Vec` right after allocating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next_parcel: u32,
    next_lot: u32,
    next_street: u32,
    next_block: u32,
    next_building: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parcel(&mut self) -> ParcelId {
        let id = ParcelId(self.next_parcel);
        self.next_parcel += 1;
        id
    }

    pub fn lot(&mut self) -> LotId {
        let id = LotId(self.next_lot);
        self.next_lot += 1;
        id
    }

    pub fn street(&mut self) -> StreetId {
        let id = StreetId(self.next_street);
        self.next_street += 1;
        id
    }

    pub fn block(&mut self) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        id
    }

    pub fn building(&mut self) -> BuildingId {
        let id = BuildingId(self.next_building);
        self.next_building += 1;
        id
    }
}

/// Integer position on the street grid, in street-number units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Axis a street or parcel runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

/// Direction of a street relative to the town centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn axis(&self) -> Axis {
        match self {
            Self::North | Self::South => Axis::NorthSouth,
            Self::East | Self::West => Axis::EastWest,
        }
    }
}

/// Which side of its street a lot sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideOfStreet {
    North,
    South,
    East,
    West,
}

impl SideOfStreet {
    /// North and east sides carry even house numbers
    pub fn is_even(&self) -> bool {
        matches!(self, Self::North | Self::East)
    }

    /// Axis of the street this side belongs to
    pub fn street_axis(&self) -> Axis {
        match self {
            Self::East | Self::West => Axis::NorthSouth,
            Self::North | Self::South => Axis::EastWest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_counts_each_kind_separately() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.parcel(), ParcelId(0));
        assert_eq!(ids.parcel(), ParcelId(1));
        assert_eq!(ids.lot(), LotId(0));
        assert_eq!(ids.street(), StreetId(0));
        assert_eq!(ids.parcel(), ParcelId(2));
        assert_eq!(ids.building(), BuildingId(0));
    }

    #[test]
    fn test_manhattan() {
        let a = GridCoord::new(1, 1);
        let b = GridCoord::new(4, 3);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(b.manhattan(&a), 5);
        assert_eq!(a.manhattan(&a), 0);
    }

    #[test]
    fn test_side_parity_and_axis() {
        assert!(SideOfStreet::North.is_even());
        assert!(SideOfStreet::East.is_even());
        assert!(!SideOfStreet::South.is_even());
        assert!(!SideOfStreet::West.is_even());
        assert_eq!(SideOfStreet::East.street_axis(), Axis::NorthSouth);
        assert_eq!(SideOfStreet::South.street_axis(), Axis::EastWest);
    }

    #[test]
    fn test_direction_axis() {
        assert_eq!(Direction::North.axis(), Axis::NorthSouth);
        assert_eq!(Direction::West.axis(), Axis::EastWest);
    }
}
