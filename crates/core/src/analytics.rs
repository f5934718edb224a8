// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{HashMap, HashSet};

use chipwatch_domain::{
    Animal, AnimalType, Area, AreaAnalytics, DateWindow, DomainError, Location, Polygon,
    Sighting, Trail, TrailClassification, classify_positions, point_in_polygon,
    polygon_from_points, position_infos,
};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::store::TrailStore;

/// Computes occupancy, arrivals and departures for an area.
///
/// Locations are classified against the area polygon once. Sightings are
/// read in a single pass and grouped per animal; only candidate animals
/// (chipped at, or sighted at, an in-area location) are classified.
///
/// Reads are not taken from a single snapshot; a concurrent write may be
/// partially visible.
///
/// # Errors
///
/// Returns an error if the area does not exist or the store fails.
pub fn compute_area_analytics<S: TrailStore>(
    store: &mut S,
    area_id: i64,
    window: &DateWindow,
) -> Result<AreaAnalytics, CoreError> {
    let area: Area = store
        .get_area(area_id)?
        .ok_or(DomainError::AreaNotFound(area_id))?;
    if window.is_inverted() {
        debug!(area_id, "Inverted date window, nothing to count");
        return Ok(AreaAnalytics::default());
    }
    let polygon: Polygon<f64> = polygon_from_points(&area.points)?;

    let in_area: HashSet<i64> = store
        .list_locations()?
        .iter()
        .filter(|location: &&Location| point_in_polygon(&location.coordinates, &polygon))
        .map(|location| location.location_id)
        .collect();
    let mut in_area_ids: Vec<i64> = in_area.iter().copied().collect();
    in_area_ids.sort_unstable();

    debug!(
        area_id,
        locations_in_area = in_area_ids.len(),
        "Resolved in-area locations"
    );

    let candidates: Vec<Animal> = store.list_candidate_animals(&in_area_ids, window.end)?;

    let mut trails: HashMap<i64, Vec<Sighting>> = HashMap::new();
    for sighting in store.list_sightings(window.end)? {
        trails.entry(sighting.animal_id).or_default().push(sighting);
    }

    let types: HashMap<i64, AnimalType> = store
        .list_animal_types()?
        .into_iter()
        .map(|animal_type| (animal_type.type_id, animal_type))
        .collect();

    let mut analytics: AreaAnalytics = AreaAnalytics::default();
    for animal in &candidates {
        let sightings: Vec<Sighting> = trails.remove(&animal.animal_id).unwrap_or_default();
        let trail: Trail<'_> = Trail::new(animal, sightings);
        let classification: TrailClassification =
            classify_positions(&position_infos(&trail, &in_area, window));

        let animal_types: Vec<AnimalType> = animal
            .type_ids
            .iter()
            .filter_map(|type_id| types.get(type_id).cloned())
            .collect();
        analytics.record(&animal_types, classification);
    }

    info!(
        area_id,
        candidates = candidates.len(),
        total_quantity_animals = analytics.total_quantity_animals,
        total_animals_arrived = analytics.total_animals_arrived,
        total_animals_gone = analytics.total_animals_gone,
        "Computed area analytics"
    );

    Ok(analytics)
}
