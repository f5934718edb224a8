// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Geofence analytics reduction.
//!
//! Each candidate animal's route is reduced to three flags: whether it ends
//! inside the area, whether it entered the area during the window, and
//! whether it left the area during the window. The flags are then summed per
//! animal type.

use std::collections::HashSet;

use time::{Date, OffsetDateTime};

use crate::trail::Trail;
use crate::types::AnimalType;

/// Optional calendar-date bounds of an analytics query.
///
/// `start` is exclusive: only dates strictly after it fall inside the
/// window. `end` is inclusive of its whole day. A missing bound is open.
/// An inverted window is accepted and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateWindow {
    #[must_use]
    pub const fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self { start, end }
    }

    /// Returns whether the start date lies after the end date.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    /// Returns whether `timestamp` is on or before the end date.
    #[must_use]
    pub fn admits_until_end(&self, timestamp: OffsetDateTime) -> bool {
        self.end.is_none_or(|end| timestamp.date() <= end)
    }

    /// Returns whether `timestamp` falls on a date after the start date.
    #[must_use]
    pub fn is_after_start(&self, timestamp: OffsetDateTime) -> bool {
        self.start.is_none_or(|start| timestamp.date() > start)
    }
}

/// What the analytics need to know about one position on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionInfo {
    pub in_area: bool,
    pub in_window: bool,
}

/// The three per-animal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrailClassification {
    pub currently_in_area: bool,
    pub arrived: bool,
    pub gone: bool,
}

impl TrailClassification {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.currently_in_area && !self.arrived && !self.gone
    }
}

/// Builds the position sequence for one animal.
///
/// The chipping location is always the first entry, whatever its date.
/// Sightings after the window's end date are dropped. An inverted window
/// yields no positions at all.
///
/// # Arguments
///
/// * `trail` - The animal and its sightings
/// * `in_area` - Ids of every location inside the area polygon
/// * `window` - The query window
#[must_use]
pub fn position_infos(
    trail: &Trail<'_>,
    in_area: &HashSet<i64>,
    window: &DateWindow,
) -> Vec<PositionInfo> {
    if window.is_inverted() {
        return Vec::new();
    }

    let animal = trail.animal();
    let mut infos: Vec<PositionInfo> = Vec::with_capacity(trail.sightings().len() + 1);

    infos.push(PositionInfo {
        in_area: in_area.contains(&animal.chipping_location_id),
        in_window: window.is_after_start(animal.chipping_date_time),
    });

    infos.extend(
        trail
            .sightings()
            .iter()
            .filter(|sighting| window.admits_until_end(sighting.visited_at))
            .map(|sighting| PositionInfo {
                in_area: in_area.contains(&sighting.location_id),
                in_window: window.is_after_start(sighting.visited_at),
            }),
    );

    infos
}

/// Reduces a position sequence to its classification.
///
/// Every neighbouring pair is a transition. A transition whose later end is
/// inside the area and inside the window is an arrival; one that goes from
/// inside to outside with its later end inside the window is a departure.
#[must_use]
pub fn classify_positions(positions: &[PositionInfo]) -> TrailClassification {
    let Some(first) = positions.first() else {
        return TrailClassification::default();
    };

    let mut classification: TrailClassification = TrailClassification {
        currently_in_area: first.in_area,
        ..TrailClassification::default()
    };

    for pair in positions.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        classification.currently_in_area = later.in_area;
        if later.in_area && later.in_window {
            classification.arrived = true;
        }
        if earlier.in_area && !later.in_area && later.in_window {
            classification.gone = true;
        }
    }

    classification
}

/// Counts for a single animal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalTypeAnalytics {
    pub type_id: i64,
    pub type_name: String,
    pub quantity_animals: u64,
    pub animals_arrived: u64,
    pub animals_gone: u64,
}

/// Aggregate counts for an area plus the per-type breakdown.
///
/// The breakdown lists each type once, in the order types were first
/// recorded, and only types that received at least one count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreaAnalytics {
    pub total_quantity_animals: u64,
    pub total_animals_arrived: u64,
    pub total_animals_gone: u64,
    pub animals_analytics: Vec<AnimalTypeAnalytics>,
}

impl AreaAnalytics {
    /// Adds one animal's classification to the totals and to each of its
    /// types.
    pub fn record(&mut self, types: &[AnimalType], classification: TrailClassification) {
        if classification.is_empty() {
            return;
        }

        let quantity: u64 = u64::from(classification.currently_in_area);
        let arrived: u64 = u64::from(classification.arrived);
        let gone: u64 = u64::from(classification.gone);

        self.total_quantity_animals += quantity;
        self.total_animals_arrived += arrived;
        self.total_animals_gone += gone;

        for animal_type in types {
            let entry: &mut AnimalTypeAnalytics = self.entry_for(animal_type);
            entry.quantity_animals += quantity;
            entry.animals_arrived += arrived;
            entry.animals_gone += gone;
        }
    }

    fn entry_for(&mut self, animal_type: &AnimalType) -> &mut AnimalTypeAnalytics {
        let index: usize = match self
            .animals_analytics
            .iter()
            .position(|entry| entry.type_id == animal_type.type_id)
        {
            Some(index) => index,
            None => {
                self.animals_analytics.push(AnimalTypeAnalytics {
                    type_id: animal_type.type_id,
                    type_name: animal_type.name.clone(),
                    quantity_animals: 0,
                    animals_arrived: 0,
                    animals_gone: 0,
                });
                self.animals_analytics.len() - 1
            }
        };
        &mut self.animals_analytics[index]
    }
}
