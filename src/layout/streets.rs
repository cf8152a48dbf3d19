//! Street network derived from leaf region boundaries
//!
//! Every leaf edge is a street segment. Segments on the same grid line
//! chain end-to-start into whole streets, each emitted exactly once.

use ahash::{AHashMap, AHashSet};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::LayoutConfig;
use crate::core::error::{LayoutError, Result};
use crate::core::types::{Axis, BlockId, Direction, GridCoord, IdAllocator, StreetId};
use crate::layout::names;
use crate::spatial::LandRegion;

/// Convert a land coordinate on an even grid line to its 1-based street index
#[inline]
pub fn grid_index(land_coord: i32) -> i32 {
    land_coord / 2 + 1
}

/// A named street in the town
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Street {
    pub id: StreetId,
    pub name: String,
    /// Position of this street along the perpendicular axis
    pub number: i32,
    pub direction: Direction,
    /// First grid index this street reaches
    pub starting_parcel: i32,
    /// Last grid index this street reaches
    pub ending_parcel: i32,
    /// Blocks along this street, sorted by number once surveyed
    pub blocks: Vec<BlockId>,
}

impl Street {
    pub fn axis(&self) -> Axis {
        self.direction.axis()
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A merged run of segments, in land coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreetSpan {
    pub axis: Axis,
    pub start: (i32, i32),
    pub end: (i32, i32),
}

type SegmentMap = AHashMap<(i32, i32), (i32, i32)>;

/// Record a segment, keeping the farthest end for a shared start.
///
/// Quadtree edges are dyadic, so two segments from one start always nest
/// and the longer one covers the shorter.
fn record_segment(map: &mut SegmentMap, start: (i32, i32), end: (i32, i32)) {
    map.entry(start)
        .and_modify(|existing| {
            if end > *existing {
                *existing = end;
            }
        })
        .or_insert(end);
}

fn follow_chain(map: &SegmentMap, start: (i32, i32)) -> Option<(i32, i32)> {
    let mut end = *map.get(&start)?;
    while let Some(&next) = map.get(&end) {
        end = next;
    }
    Some(end)
}

/// Merge leaf edges into whole streets.
///
/// The grid is swept column by column over even coordinates. A segment
/// start found on the sweep is followed to its terminal point; the span is
/// kept only the first time that terminal shows up, so a street built
/// from many small edges comes out once, anchored at its first start.
pub fn trace_street_spans(regions: &[LandRegion], land_size: i32) -> Vec<StreetSpan> {
    let mut ns_segments = SegmentMap::new();
    let mut ew_segments = SegmentMap::new();

    for r in regions {
        record_segment(&mut ns_segments, (r.west, r.north), (r.west, r.south()));
        record_segment(&mut ns_segments, (r.east(), r.north), (r.east(), r.south()));
        record_segment(&mut ew_segments, (r.west, r.north), (r.east(), r.north));
        record_segment(&mut ew_segments, (r.west, r.south()), (r.east(), r.south()));
    }

    let mut ns_ends = AHashSet::new();
    let mut ew_ends = AHashSet::new();
    let mut spans = Vec::new();

    for i in (0..=land_size).step_by(2) {
        for j in (0..=land_size).step_by(2) {
            let point = (i, j);
            if let Some(end) = follow_chain(&ns_segments, point) {
                if ns_ends.insert(end) {
                    spans.push(StreetSpan { axis: Axis::NorthSouth, start: point, end });
                }
            }
            if let Some(end) = follow_chain(&ew_segments, point) {
                if ew_ends.insert(end) {
                    spans.push(StreetSpan { axis: Axis::EastWest, start: point, end });
                }
            }
        }
    }

    spans
}

/// Generate a street name: ordinal or named, suffixed by street type
pub fn generate_street_name(
    number: i32,
    direction: Direction,
    config: &LayoutConfig,
    rng: &mut ChaCha8Rng,
) -> String {
    let (street_type, chance_numbered) = match direction.axis() {
        Axis::EastWest => ("Street", config.chance_street_gets_numbered_name),
        Axis::NorthSouth => ("Avenue", config.chance_avenue_gets_numbered_name),
    };

    let name = if rng.gen::<f64>() < chance_numbered {
        names::ordinal(number.max(0) as u32)
    } else if rng.gen::<f64>() < 0.5 {
        names::any_surname(rng).to_string()
    } else {
        names::a_place_name(rng).to_string()
    };

    format!("{} {}", name, street_type)
}

/// Streets plus the lookups the lot builder needs
#[derive(Debug, Clone)]
pub struct StreetNetwork {
    pub streets: Vec<Street>,
    /// (street number, grid index) -> north-south street
    ns_index: AHashMap<GridCoord, StreetId>,
    /// (grid index, street number) -> east-west street
    ew_index: AHashMap<GridCoord, StreetId>,
    ns_links: Vec<(GridCoord, GridCoord)>,
    ew_links: Vec<(GridCoord, GridCoord)>,
}

impl StreetNetwork {
    pub fn build(
        regions: &[LandRegion],
        config: &LayoutConfig,
        ids: &mut IdAllocator,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let land_size = config.land_size as i32;
        let mut network = Self {
            streets: Vec::new(),
            ns_index: AHashMap::new(),
            ew_index: AHashMap::new(),
            ns_links: Vec::new(),
            ew_links: Vec::new(),
        };

        for span in trace_street_spans(regions, land_size) {
            let (number, first, last) = match span.axis {
                Axis::NorthSouth => (grid_index(span.start.0), span.start.1, span.end.1),
                Axis::EastWest => (grid_index(span.start.1), span.start.0, span.end.0),
            };
            let near_half = number < land_size / 4;
            let direction = match (span.axis, near_half) {
                (Axis::NorthSouth, true) => Direction::North,
                (Axis::NorthSouth, false) => Direction::South,
                (Axis::EastWest, true) => Direction::East,
                (Axis::EastWest, false) => Direction::West,
            };
            let starting_parcel = grid_index(first);
            let ending_parcel = grid_index(last);

            let id = ids.street();
            let name = generate_street_name(number, direction, config, rng);

            let place = |i: i32| match span.axis {
                Axis::NorthSouth => GridCoord::new(number, i),
                Axis::EastWest => GridCoord::new(i, number),
            };
            let (index, links) = match span.axis {
                Axis::NorthSouth => (&mut network.ns_index, &mut network.ns_links),
                Axis::EastWest => (&mut network.ew_index, &mut network.ew_links),
            };
            for i in starting_parcel..=ending_parcel {
                index.insert(place(i), id);
            }
            for i in starting_parcel..ending_parcel {
                links.push((place(i), place(i + 1)));
            }

            network.streets.push(Street {
                id,
                name,
                number,
                direction,
                starting_parcel,
                ending_parcel,
                blocks: Vec::new(),
            });
        }

        tracing::debug!(streets = network.streets.len(), "Traced street network");
        network
    }

    /// Street running along `axis` through a grid position
    pub fn street_at(&self, axis: Axis, coord: GridCoord) -> Result<StreetId> {
        let index = match axis {
            Axis::NorthSouth => &self.ns_index,
            Axis::EastWest => &self.ew_index,
        };
        index
            .get(&coord)
            .copied()
            .ok_or(LayoutError::MissingFrontage { axis, coord })
    }

    /// Consecutive grid positions joined by a street on this axis
    pub fn links(&self, axis: Axis) -> &[(GridCoord, GridCoord)] {
        match axis {
            Axis::NorthSouth => &self.ns_links,
            Axis::EastWest => &self.ew_links,
        }
    }
}
