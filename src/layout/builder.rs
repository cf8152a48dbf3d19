//! Turns leaf regions into parcels, lots and tracts
//!
//! Each leaf is a square block ringed by four streets. Its edges are cut
//! into unit parcels, every parcel face gets three house numbers, and two
//! lots sit on each face with corner lots fronting both streets. Leaves
//! wider than one parcel also get a tract spanning the whole block.

use ahash::AHashMap;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::{Axis, GridCoord, IdAllocator, LotId, ParcelId, SideOfStreet, StreetId};
use crate::layout::lot::{Frontage, Lot};
use crate::layout::parcel::{
    determine_house_numbering, link_parcels, Parcel, BUILDINGS_PER_BLOCK_FACE,
};
use crate::layout::streets::{grid_index, StreetNetwork};
use crate::spatial::LandRegion;

/// Everything the builder produced
#[derive(Debug, Clone, Default)]
pub struct Plots {
    pub parcels: Vec<Parcel>,
    /// Lots and tracts share one ID space; index by `LotId`
    pub plots: Vec<Lot>,
    pub lots: Vec<LotId>,
    pub tracts: Vec<LotId>,
}

type Numbering = [u32; BUILDINGS_PER_BLOCK_FACE];

pub struct PlotBuilder<'a> {
    network: &'a StreetNetwork,
    ids: &'a mut IdAllocator,
    rng: &'a mut ChaCha8Rng,
    parcel_index: AHashMap<(GridCoord, Axis), ParcelId>,
    numberings: AHashMap<(GridCoord, SideOfStreet), Numbering>,
    out: Plots,
}

impl<'a> PlotBuilder<'a> {
    pub fn new(network: &'a StreetNetwork, ids: &'a mut IdAllocator, rng: &'a mut ChaCha8Rng) -> Self {
        Self {
            network,
            ids,
            rng,
            parcel_index: AHashMap::new(),
            numberings: AHashMap::new(),
            out: Plots::default(),
        }
    }

    /// Parcel at a grid position, created on first sight
    fn parcel(&mut self, coord: GridCoord, axis: Axis, street: StreetId) -> ParcelId {
        if let Some(&id) = self.parcel_index.get(&(coord, axis)) {
            return id;
        }
        let id = self.ids.parcel();
        let number = match axis {
            Axis::NorthSouth => coord.y,
            Axis::EastWest => coord.x,
        } as u32
            * 100;
        self.out.parcels.push(Parcel::new(id, street, number, coord, axis));
        self.parcel_index.insert((coord, axis), id);
        id
    }

    fn number_face(&mut self, coord: GridCoord, side: SideOfStreet) {
        let Some(&parcel) = self.parcel_index.get(&(coord, side.street_axis())) else {
            return;
        };
        let block_number = self.out.parcels[parcel.index()].number;
        let rng = &mut *self.rng;
        self.numberings
            .entry((coord, side))
            .or_insert_with(|| determine_house_numbering(block_number, side, rng));
    }

    /// Frontage for a plot on one face of one parcel.
    ///
    /// Every face the builder asks for was numbered while its leaf's edges
    /// were laid out.
    fn frontage(&self, coord: GridCoord, side: SideOfStreet, position: usize) -> Option<Frontage> {
        let parcel = *self.parcel_index.get(&(coord, side.street_axis()))?;
        let numbers = self.numberings.get(&(coord, side))?;
        Some(Frontage {
            parcel,
            street: self.out.parcels[parcel.index()].street,
            side,
            house_number: numbers[position],
            position_in_block: position as u8,
        })
    }

    fn new_lot(&mut self, faces: &[(GridCoord, SideOfStreet, usize)]) -> LotId {
        let id = self.ids.lot();
        let mut lot = Lot::new(id);
        for &(coord, side, position) in faces {
            if let Some(frontage) = self.frontage(coord, side, position) {
                self.out.parcels[frontage.parcel.index()].lots.push(id);
                lot.add_frontage(frontage);
            }
        }
        self.out.plots.push(lot);
        self.out.lots.push(id);
        id
    }

    /// Lay out one leaf region
    pub fn add_region(&mut self, region: &LandRegion) -> Result<()> {
        let ew = grid_index(region.west);
        let ns = grid_index(region.north);
        let w = region.parcels_per_side();

        let west = self.network.street_at(Axis::NorthSouth, GridCoord::new(ew, ns))?;
        let east = self.network.street_at(Axis::NorthSouth, GridCoord::new(ew + w, ns))?;
        let north = self.network.street_at(Axis::EastWest, GridCoord::new(ew, ns))?;
        let south = self.network.street_at(Axis::EastWest, GridCoord::new(ew, ns + w))?;

        let tract = if w > 1 {
            let id = self.ids.lot();
            self.out.plots.push(Lot::tract(id, w as u32));
            self.out.tracts.push(id);
            Some(id)
        } else {
            None
        };

        for i in 0..=w {
            let faces = [
                (GridCoord::new(ew, ns + i), SideOfStreet::East, west),
                (GridCoord::new(ew + i, ns), SideOfStreet::North, north),
                (GridCoord::new(ew + w, ns + i), SideOfStreet::West, east),
                (GridCoord::new(ew + i, ns + w), SideOfStreet::South, south),
            ];
            for (coord, side, street) in faces {
                self.parcel(coord, side.street_axis(), street);
                self.number_face(coord, side);
            }
            if let Some(tract) = tract {
                for (coord, side, _) in faces {
                    if let Some(frontage) = self.frontage(coord, side, BUILDINGS_PER_BLOCK_FACE - 1) {
                        let frontage = Frontage {
                            position_in_block: 0,
                            ..frontage
                        };
                        self.out.parcels[frontage.parcel.index()].tracts.push(tract);
                        self.out.plots[tract.index()].add_frontage(frontage);
                    }
                }
            }
        }

        let at = GridCoord::new;
        use SideOfStreet::{East as E, North as N, South as S, West as W};

        // Corner lots front both streets meeting at the corner
        self.new_lot(&[(at(ew, ns), N, 0), (at(ew, ns), E, 0)]);
        self.new_lot(&[(at(ew + w - 1, ns), N, 1), (at(ew + w, ns), W, 0)]);
        self.new_lot(&[(at(ew, ns + w), S, 0), (at(ew, ns + w - 1), E, 1)]);
        self.new_lot(&[(at(ew + w - 1, ns + w), S, 1), (at(ew + w, ns + w - 1), W, 1)]);

        for ii in 1..(2 * w - 1) {
            let pn = ii / 2;
            let pos = (ii % 2) as usize;
            self.new_lot(&[(at(ew, ns + pn), E, pos)]);
            self.new_lot(&[(at(ew + pn, ns), N, pos)]);
            self.new_lot(&[(at(ew + w, ns + pn), W, pos)]);
            self.new_lot(&[(at(ew + pn, ns + w), S, pos)]);
        }

        // Corner links join the two streets around each block corner
        let corners = [
            (at(ew, ns), at(ew, ns)),
            (at(ew + w - 1, ns), at(ew + w, ns)),
            (at(ew, ns + w), at(ew, ns + w - 1)),
            (at(ew + w - 1, ns + w), at(ew + w, ns + w - 1)),
        ];
        for (ew_coord, ns_coord) in corners {
            let a = self.parcel_index.get(&(ew_coord, Axis::EastWest)).copied();
            let b = self.parcel_index.get(&(ns_coord, Axis::NorthSouth)).copied();
            if let (Some(a), Some(b)) = (a, b) {
                link_parcels(&mut self.out.parcels, a, b);
            }
        }

        Ok(())
    }

    /// Link consecutive parcels along every street and hand back the result
    pub fn finish(mut self) -> Plots {
        for axis in [Axis::NorthSouth, Axis::EastWest] {
            for &(a, b) in self.network.links(axis) {
                let a = self.parcel_index.get(&(a, axis)).copied();
                let b = self.parcel_index.get(&(b, axis)).copied();
                if let (Some(a), Some(b)) = (a, b) {
                    link_parcels(&mut self.out.parcels, a, b);
                }
            }
        }

        tracing::debug!(
            parcels = self.out.parcels.len(),
            lots = self.out.lots.len(),
            tracts = self.out.tracts.len(),
            "Built parcels and plots"
        );
        self.out
    }
}

/// Build parcels, lots and tracts for every leaf region in order
pub fn build_plots(
    regions: &[LandRegion],
    network: &StreetNetwork,
    ids: &mut IdAllocator,
    rng: &mut ChaCha8Rng,
) -> Result<Plots> {
    let mut builder = PlotBuilder::new(network, ids, rng);
    for region in regions {
        builder.add_region(region)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LayoutConfig;
    use crate::core::error::LayoutError;
    use rand::SeedableRng;

    fn build(regions: &[LandRegion]) -> Result<Plots> {
        let config = LayoutConfig::default();
        let mut ids = IdAllocator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let network = StreetNetwork::build(regions, &config, &mut ids, &mut rng);
        build_plots(regions, &network, &mut ids, &mut rng)
    }

    #[test]
    fn test_single_leaf_lot_and_tract_counts() {
        let plots = build(&[LandRegion::new(0, 0, 16)]).unwrap();
        // 4 corners + 4 faces * (2 * 8 - 2) interior lots
        assert_eq!(plots.lots.len(), 60);
        assert_eq!(plots.tracts.len(), 1);
        assert_eq!(plots.plots.len(), 61);

        let tract = &plots.plots[plots.tracts[0].index()];
        assert!(tract.is_tract());
        // (8 + 1) positions on each of 4 faces
        assert_eq!(tract.frontages.len(), 36);
    }

    #[test]
    fn test_unit_leaf_has_only_corner_lots() {
        let regions: Vec<LandRegion> = (0..8)
            .flat_map(|x| (0..8).map(move |y| LandRegion::new(x * 2, y * 2, 2)))
            .collect();
        let plots = build(&regions).unwrap();
        assert!(plots.tracts.is_empty());
        assert_eq!(plots.lots.len(), 4 * 64);
    }

    #[test]
    fn test_every_lot_fronts_a_parcel_that_lists_it() {
        let regions = [
            LandRegion::new(0, 0, 8),
            LandRegion::new(8, 0, 8),
            LandRegion::new(0, 8, 8),
            LandRegion::new(8, 8, 4),
            LandRegion::new(12, 8, 4),
            LandRegion::new(8, 12, 4),
            LandRegion::new(12, 12, 4),
        ];
        let plots = build(&regions).unwrap();
        for &id in &plots.lots {
            let lot = &plots.plots[id.index()];
            assert!(!lot.frontages.is_empty());
            for frontage in &lot.frontages {
                assert!(plots.parcels[frontage.parcel.index()].lots.contains(&id));
            }
        }
        for &id in &plots.tracts {
            for parcel in plots.plots[id.index()].parcels() {
                assert!(plots.parcels[parcel.index()].tracts.contains(&id));
                assert!(!plots.parcels[parcel.index()].lots.contains(&id));
            }
        }
    }

    #[test]
    fn test_corner_lots_front_two_streets() {
        let plots = build(&[LandRegion::new(0, 0, 16)]).unwrap();
        for &id in &plots.lots[..4] {
            let lot = &plots.plots[id.index()];
            assert_eq!(lot.frontages.len(), 2);
            let axes: Vec<Axis> = lot
                .parcels()
                .map(|p| plots.parcels[p.index()].axis)
                .collect();
            assert!(axes.contains(&Axis::NorthSouth) && axes.contains(&Axis::EastWest));
        }
    }

    #[test]
    fn test_parcel_links_are_symmetric() {
        let regions = [
            LandRegion::new(0, 0, 8),
            LandRegion::new(8, 0, 8),
            LandRegion::new(0, 8, 8),
            LandRegion::new(8, 8, 8),
        ];
        let plots = build(&regions).unwrap();
        for parcel in &plots.parcels {
            assert!(!parcel.neighbors.is_empty());
            for n in &parcel.neighbors {
                assert!(plots.parcels[n.index()].neighbors.contains(&parcel.id));
            }
        }
    }

    #[test]
    fn test_missing_street_is_reported() {
        let config = LayoutConfig::default();
        let mut ids = IdAllocator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let network =
            StreetNetwork::build(&[LandRegion::new(0, 0, 8)], &config, &mut ids, &mut rng);
        let result = build_plots(&[LandRegion::new(8, 8, 8)], &network, &mut ids, &mut rng);
        assert!(matches!(result, Err(LayoutError::MissingFrontage { .. })));
    }
}
