//! Vacancy views, construction and the top-three siting choice
//!
//! Buildings and residences are owned by whatever simulation sits on top
//! of the town. The registry only records which building stands where and
//! how many people live in each residence.

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{LayoutError, Result};
use crate::core::types::{BuildingId, LotId};
use crate::layout::lot::Lot;
use crate::town::Town;

/// Weight thresholds for picking the best, second and third candidate
const TOP_THREE_CUTOFFS: [f64; 2] = [0.6, 0.9];

/// Which kind of plot a siting decision is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotClass {
    Lot,
    Tract,
}

/// A dwelling registered on a lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residence {
    pub building: BuildingId,
    pub lot: LotId,
    pub occupants: u32,
}

impl Residence {
    pub fn is_vacant(&self) -> bool {
        self.occupants == 0
    }
}

/// Pick among the three best-scoring candidates with weights 60/30/10.
///
/// Candidates are ranked by score, highest first, with the lower ID ahead
/// on equal scores. With fewer than three candidates the best one wins.
/// Returns `None` for an empty candidate list.
pub fn choose_top_three<T, R>(mut scored: Vec<(T, f64)>, rng: &mut R) -> Option<T>
where
    T: Ord + Copy,
    R: Rng + ?Sized,
{
    scored.sort_by(|(a, sa), (b, sb)| {
        OrderedFloat(*sb)
            .cmp(&OrderedFloat(*sa))
            .then_with(|| a.cmp(b))
    });

    if scored.len() < 3 {
        return scored.first().map(|(c, _)| *c);
    }

    let x: f64 = rng.gen();
    let pick = if x < TOP_THREE_CUTOFFS[0] {
        0
    } else if x < TOP_THREE_CUTOFFS[1] {
        1
    } else {
        2
    };
    Some(scored[pick].0)
}

impl Town {
    pub fn vacant_lots(&self) -> Vec<LotId> {
        self.lots().filter(|l| l.is_vacant()).map(|l| l.id).collect()
    }

    pub fn vacant_tracts(&self) -> Vec<LotId> {
        self.tracts().filter(|l| l.is_vacant()).map(|l| l.id).collect()
    }

    /// Residences nobody lives in, in registration order
    pub fn vacant_homes(&self) -> Vec<BuildingId> {
        self.residences
            .iter()
            .filter(|r| r.is_vacant())
            .map(|r| r.building)
            .collect()
    }

    pub fn residences(&self) -> &[Residence] {
        &self.residences
    }

    pub fn residence(&self, building: BuildingId) -> Option<&Residence> {
        self.residence_index
            .get(&building)
            .map(|&i| &self.residences[i])
    }

    fn residence_mut(&mut self, building: BuildingId) -> Result<&mut Residence> {
        let index = *self
            .residence_index
            .get(&building)
            .ok_or(LayoutError::UnknownResidence(building))?;
        Ok(&mut self.residences[index])
    }

    /// Fresh building ID for the business/residence layer
    pub fn allocate_building_id(&mut self) -> BuildingId {
        self.ids.building()
    }

    fn plot_mut(&mut self, id: LotId) -> Result<&mut Lot> {
        self.plots.get_mut(id.index()).ok_or(LayoutError::UnknownLot(id))
    }

    /// Put a building on a vacant plot
    pub fn construct(&mut self, lot: LotId, building: BuildingId) -> Result<()> {
        let plot = self.plot_mut(lot)?;
        if let Some(existing) = plot.building {
            return Err(LayoutError::LotOccupied {
                lot,
                building: existing,
            });
        }
        plot.building = Some(building);
        tracing::debug!(lot = lot.0, building = building.0, "Constructed building");
        Ok(())
    }

    /// Tear down whatever stands on a plot.
    ///
    /// The building moves to the plot's history, and any residence it held
    /// is dropped from the registry.
    pub fn demolish(&mut self, lot: LotId) -> Result<Option<BuildingId>> {
        let plot = self.plot_mut(lot)?;
        let Some(building) = plot.building.take() else {
            return Ok(None);
        };
        plot.former_buildings.push(building);

        if let Some(index) = self.residence_index.remove(&building) {
            self.residences.remove(index);
            for slot in self.residence_index.values_mut() {
                if *slot > index {
                    *slot -= 1;
                }
            }
        }
        tracing::debug!(lot = lot.0, building = building.0, "Demolished building");
        Ok(Some(building))
    }

    /// Record that a building already standing on `lot` is a residence
    pub fn register_residence(&mut self, building: BuildingId, lot: LotId) -> Result<()> {
        let plot = self.plot(lot).ok_or(LayoutError::UnknownLot(lot))?;
        if plot.building != Some(building) {
            return Err(LayoutError::BuildingNotOnLot { building, lot });
        }
        if self.residence_index.contains_key(&building) {
            return Ok(());
        }
        self.residence_index.insert(building, self.residences.len());
        self.residences.push(Residence {
            building,
            lot,
            occupants: 0,
        });
        Ok(())
    }

    /// One more occupant; returns the new head count
    pub fn move_in(&mut self, building: BuildingId) -> Result<u32> {
        let residence = self.residence_mut(building)?;
        residence.occupants += 1;
        Ok(residence.occupants)
    }

    /// One fewer occupant; returns the new head count
    pub fn move_out(&mut self, building: BuildingId) -> Result<u32> {
        let residence = self.residence_mut(building)?;
        residence.occupants = residence.occupants.saturating_sub(1);
        Ok(residence.occupants)
    }

    /// Score vacant plots of one class and make the top-three choice.
    ///
    /// `None` means nothing of that class is vacant.
    pub fn choose_vacant_plot<R: Rng + ?Sized>(
        &self,
        class: PlotClass,
        score: impl Fn(&Lot) -> f64,
        rng: &mut R,
    ) -> Option<LotId> {
        let vacant = match class {
            PlotClass::Lot => self.vacant_lots(),
            PlotClass::Tract => self.vacant_tracts(),
        };
        let scored = vacant
            .into_iter()
            .map(|id| (id, score(&self.plots[id.index()])))
            .collect();
        choose_top_three(scored, rng)
    }

    /// Closest candidate to `from` and its distance; ties go to the lower ID
    pub fn nearest_plot(&self, from: LotId, candidates: &[LotId]) -> Result<Option<(LotId, u32)>> {
        let mut best: Option<(LotId, u32)> = None;
        for &candidate in candidates {
            let distance = self.distance_between(from, candidate)?;
            let closer = match best {
                None => true,
                Some((id, d)) => distance < d || (distance == d && candidate < id),
            };
            if closer {
                best = Some((candidate, distance));
            }
        }
        Ok(best)
    }
}
