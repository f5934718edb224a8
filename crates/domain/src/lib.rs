// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod analytics;
mod animal_types;
mod error;
mod geometry;
mod trail;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use analytics::{
    AnimalTypeAnalytics, AreaAnalytics, DateWindow, PositionInfo, TrailClassification,
    classify_positions, position_infos,
};
pub use animal_types::{plan_type_addition, plan_type_removal, plan_type_replacement};
pub use geometry::{
    AreaRelation, point_in_polygon, polygon_from_points, relate_areas, validate_area_placement,
};
pub use trail::{Position, Trail, apply_attributes, trail_order};

// Re-export public types
pub use error::DomainError;
pub use types::{
    Account, AccountFields, Animal, AnimalAttributes, AnimalType, Area, Coordinates, Gender,
    LifeStatus, Location, NewAnimal, Role, Sighting,
};
pub use validation::{
    validate_account_fields, validate_animal_attributes, validate_email, validate_id,
    validate_new_animal, validate_non_blank, validate_password, validate_positive,
};

/// Polygon type produced by [`polygon_from_points`].
pub use geo::Polygon;
