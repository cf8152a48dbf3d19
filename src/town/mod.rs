//! The town aggregate: generation pipeline and post-generation queries
//!
//! Generation runs land subdivision, street tracing, lot building, block
//! survey and the all-pairs distance table strictly in sequence. Once it
//! returns, the layout is fixed; only buildings and residences change.

pub mod registry;
pub mod snapshot;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::LayoutConfig;
use crate::core::error::{LayoutError, Result};
use crate::core::types::{Axis, BuildingId, IdAllocator, LotId, ParcelId, SideOfStreet};
use crate::layout::{build_plots, survey_blocks, Block, Lot, Parcel, Street, StreetNetwork};
use crate::pathing::{find_path, AdjacencyGraph, DistanceTable};
use crate::spatial::{subdivide_land, LandRegion};

pub use registry::{choose_top_three, PlotClass, Residence};
pub use snapshot::TownSnapshot;

#[derive(Debug, Clone)]
pub struct Town {
    config: LayoutConfig,
    ids: IdAllocator,
    streets: Vec<Street>,
    parcels: Vec<Parcel>,
    /// Lots and tracts, indexed by `LotId`
    plots: Vec<Lot>,
    lots: Vec<LotId>,
    tracts: Vec<LotId>,
    blocks: Vec<Block>,
    graph: AdjacencyGraph,
    distances: DistanceTable,
    downtown: LotId,
    residences: Vec<Residence>,
    residence_index: AHashMap<BuildingId, usize>,
}

impl Town {
    /// Generate a town, regenerating until the layout has enough tracts.
    ///
    /// One generator seeded from `config.seed` drives every attempt, so a
    /// rejected layout is followed by a fresh one and the run as a whole
    /// stays reproducible.
    pub fn generate(config: &LayoutConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut best = 0;
        for attempt in 1..=config.max_generation_attempts {
            let regions = subdivide_land(config, &mut rng);
            let found = count_tracts(&regions);
            best = best.max(found);
            if found < config.min_tracts {
                tracing::warn!(
                    attempt,
                    tracts = found,
                    required = config.min_tracts,
                    "Too few tracts, regenerating layout"
                );
                continue;
            }

            let town = Self::from_regions(config, &regions, &mut rng)?;
            tracing::info!(
                seed = config.seed,
                attempt,
                streets = town.streets.len(),
                parcels = town.parcels.len(),
                lots = town.lots.len(),
                tracts = town.tracts.len(),
                blocks = town.blocks.len(),
                "Generated town layout"
            );
            return Ok(town);
        }

        Err(LayoutError::InsufficientTracts {
            required: config.min_tracts,
            found: best,
            attempts: config.max_generation_attempts,
        })
    }

    /// Lay out a town over an already subdivided piece of land
    pub fn from_regions(
        config: &LayoutConfig,
        regions: &[LandRegion],
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        let mut ids = IdAllocator::new();
        let network = StreetNetwork::build(regions, config, &mut ids, rng);
        let built = build_plots(regions, &network, &mut ids, rng)?;
        let mut streets = network.streets;
        let parcels = built.parcels;
        let mut plots = built.plots;

        // Until blocks exist, plots sharing a parcel are neighbours
        for plot in plots.iter_mut() {
            let sharing = frontage_neighbors(plot, &parcels);
            plot.set_neighbors(sharing);
        }

        for plot in plots.iter_mut() {
            plot.generate_address(&streets, rng);
        }

        let survey_order: Vec<LotId> = built.lots.iter().chain(built.tracts.iter()).copied().collect();
        let blocks = survey_blocks(&survey_order, &mut plots, &parcels, &mut streets, &mut ids)?;

        let graph = AdjacencyGraph::from_parcels(&parcels);
        graph.ensure_connected()?;
        let distances = DistanceTable::compute(&graph, config.parallel_threshold)?;

        for plot in plots.iter_mut() {
            plot.coordinates = lot_coordinates(plot, &streets);
        }

        let downtown = select_downtown(&plots, &built.lots).ok_or(LayoutError::EmptyLayout)?;

        // From here on, neighbours are the other plots on the same block
        for block in &blocks {
            for &id in &block.lots {
                plots[id.index()].set_neighbors(block.lots.iter().copied());
            }
        }

        Ok(Self {
            config: config.clone(),
            ids,
            streets,
            parcels,
            plots,
            lots: built.lots,
            tracts: built.tracts,
            blocks,
            graph,
            distances,
            downtown,
            residences: Vec::new(),
            residence_index: AHashMap::new(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn streets(&self) -> &[Street] {
        &self.streets
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Lots and tracts together, indexed by `LotId`
    pub fn plots(&self) -> &[Lot] {
        &self.plots
    }

    pub fn plot(&self, id: LotId) -> Option<&Lot> {
        self.plots.get(id.index())
    }

    fn plot_or_err(&self, id: LotId) -> Result<&Lot> {
        self.plot(id).ok_or(LayoutError::UnknownLot(id))
    }

    pub fn lot_ids(&self) -> &[LotId] {
        &self.lots
    }

    pub fn tract_ids(&self) -> &[LotId] {
        &self.tracts
    }

    pub fn lots(&self) -> impl Iterator<Item = &Lot> + '_ {
        self.lots.iter().map(|id| &self.plots[id.index()])
    }

    pub fn tracts(&self) -> impl Iterator<Item = &Lot> + '_ {
        self.tracts.iter().map(|id| &self.plots[id.index()])
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    /// Lot with the highest frontage density, the town's centre
    pub fn downtown(&self) -> LotId {
        self.downtown
    }

    pub fn parcel_distance(&self, a: ParcelId, b: ParcelId) -> Option<u32> {
        self.distances.get(a, b)
    }

    /// Closest pair of parcels fronted by the two plots
    fn closest_parcels(&self, a: LotId, b: LotId) -> Result<(ParcelId, ParcelId, u32)> {
        let lot_a = self.plot_or_err(a)?;
        let lot_b = self.plot_or_err(b)?;

        let mut best: Option<(ParcelId, ParcelId, u32)> = None;
        for pa in lot_a.parcels() {
            for pb in lot_b.parcels() {
                let Some(hops) = self.distances.get(pa, pb) else {
                    continue;
                };
                if best.map_or(true, |(_, _, h)| hops < h) {
                    best = Some((pa, pb, hops));
                }
            }
        }
        best.ok_or(LayoutError::NoFrontage(if lot_a.frontages.is_empty() { a } else { b }))
    }

    /// Fewest parcel hops between any frontage of `a` and any of `b`
    pub fn distance_between(&self, a: LotId, b: LotId) -> Result<u32> {
        self.closest_parcels(a, b).map(|(_, _, hops)| hops)
    }

    pub fn dist_from_downtown(&self, lot: LotId) -> Result<u32> {
        self.distance_between(lot, self.downtown)
    }

    /// Parcel route realising `distance_between`
    pub fn route_between(&self, a: LotId, b: LotId) -> Result<Vec<ParcelId>> {
        let (from, to, _) = self.closest_parcels(a, b)?;
        find_path(&self.graph, from, to)
    }

    /// The lot, its neighbours and their neighbours, each once
    pub fn tertiary_lots(&self, lot: LotId) -> Result<Vec<LotId>> {
        self.plot_or_err(lot)?;
        Ok(two_hop_set(&self.plots, lot))
    }

    /// Plots sharing a parcel with this one, the neighbourhood downtown is
    /// chosen by
    pub fn frontage_neighbors(&self, lot: LotId) -> Result<Vec<LotId>> {
        let plot = self.plot_or_err(lot)?;
        let mut out = Vec::new();
        for n in frontage_neighbors(plot, &self.parcels) {
            if n != lot && !out.contains(&n) {
                out.push(n);
            }
        }
        Ok(out)
    }

    /// Two-hop density over frontage neighbours
    pub fn frontage_density(&self, lot: LotId) -> Result<usize> {
        self.plot_or_err(lot)?;
        let mut seen = vec![lot];
        for n in self.frontage_neighbors(lot)? {
            if !seen.contains(&n) {
                seen.push(n);
            }
            for nn in self.frontage_neighbors(n)? {
                if !seen.contains(&nn) {
                    seen.push(nn);
                }
            }
        }
        Ok(seen.len())
    }

    /// Number of distinct plots within two neighbour hops, the lot included.
    ///
    /// Neighbours here are block-mates, so downtown need not maximise this
    /// count. Downtown is chosen by [`Town::frontage_density`].
    pub fn tertiary_density(&self, lot: LotId) -> Result<usize> {
        self.tertiary_lots(lot).map(|set| set.len())
    }

    /// Population of the lot and its immediate neighbours
    pub fn secondary_population(&self, lot: LotId, population_of: impl Fn(&Lot) -> u32) -> Result<u32> {
        let plot = self.plot_or_err(lot)?;
        let mut seen = vec![lot];
        for &n in &plot.neighboring_lots {
            if !seen.contains(&n) {
                seen.push(n);
            }
        }
        Ok(seen.iter().map(|id| population_of(&self.plots[id.index()])).sum())
    }

    /// Population over the two-hop neighbourhood
    pub fn tertiary_population(&self, lot: LotId, population_of: impl Fn(&Lot) -> u32) -> Result<u32> {
        Ok(self
            .tertiary_lots(lot)?
            .iter()
            .map(|id| population_of(&self.plots[id.index()]))
            .sum())
    }

    pub fn snapshot(&self) -> TownSnapshot {
        TownSnapshot::new(self)
    }
}

fn count_tracts(regions: &[LandRegion]) -> usize {
    regions.iter().filter(|r| r.parcels_per_side() > 1).count()
}

fn frontage_neighbors(plot: &Lot, parcels: &[Parcel]) -> Vec<LotId> {
    plot.parcels()
        .flat_map(|p| {
            let parcel = &parcels[p.index()];
            parcel.lots.iter().chain(parcel.tracts.iter()).copied()
        })
        .collect()
}

fn two_hop_set(plots: &[Lot], lot: LotId) -> Vec<LotId> {
    let mut seen = vec![lot];
    let first: Vec<LotId> = plots[lot.index()].neighboring_lots.clone();
    for n in first {
        if !seen.contains(&n) {
            seen.push(n);
        }
        for &nn in &plots[n.index()].neighboring_lots {
            if !seen.contains(&nn) {
                seen.push(nn);
            }
        }
    }
    seen
}

/// First lot in ID order with the highest two-hop density, counted while
/// neighbours are still the plots sharing a parcel
fn select_downtown(plots: &[Lot], lots: &[LotId]) -> Option<LotId> {
    let mut best: Option<(LotId, usize)> = None;
    for &id in lots {
        let density = two_hop_set(plots, id).len();
        if best.map_or(true, |(_, d)| density > d) {
            best = Some((id, density));
        }
    }
    best.map(|(id, _)| id)
}

/// Render position from the street the address is on.
///
/// The coordinate along that street comes from the house number's
/// hundreds, nudged to a quarter or three quarters by position in the
/// block; the cross coordinate is the street number nudged a quarter
/// toward the lot's side.
fn lot_coordinates(plot: &Lot, streets: &[Street]) -> Option<(f64, f64)> {
    let address = plot.address.as_ref()?;
    let frontage = plot.address_frontage()?;
    let street = &streets[address.street.index()];

    let along = (address.house_number / 100) as f64
        + if frontage.position_in_block == 0 { 0.25 } else { 0.75 };
    let across = street.number as f64;
    let (mut x, mut y) = match street.axis() {
        Axis::EastWest => (along, across),
        Axis::NorthSouth => (across, along),
    };

    match frontage.side {
        SideOfStreet::North => y += 0.25,
        SideOfStreet::South => y -= 0.25,
        SideOfStreet::East => x += 0.25,
        SideOfStreet::West => x -= 0.25,
    }
    Some((x, y))
}
