// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Animal, AnimalAttributes, Sighting};

/// A requested change to one animal's trail or record, as data only.
///
/// Commands are the only way the engine changes an animal after chipping.
#[derive(Debug, Clone, PartialEq)]
pub enum TrailCommand {
    /// Record a new sighting at the end of the trail.
    AddSighting {
        /// Where the animal was seen.
        location_id: i64,
    },
    /// Remove a sighting, cascading to its successor when required.
    DeleteSighting {
        /// The sighting to remove.
        sighting_id: i64,
    },
    /// Move an existing sighting to another location.
    UpdateSighting {
        /// The sighting to move.
        sighting_id: i64,
        /// The replacement location.
        location_id: i64,
    },
    /// Replace the animal's attributes.
    UpdateAnimal {
        /// The new attribute values.
        attributes: AnimalAttributes,
    },
    /// Attach one more type to the animal.
    AddAnimalType {
        /// The type to add.
        type_id: i64,
    },
    /// Swap one of the animal's types for another.
    ReplaceAnimalType {
        /// The type currently assigned.
        old_type_id: i64,
        /// The type to assign instead.
        new_type_id: i64,
    },
    /// Detach a type from the animal.
    RemoveAnimalType {
        /// The type to remove.
        type_id: i64,
    },
}

impl TrailCommand {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddSighting { .. } => "AddSighting",
            Self::DeleteSighting { .. } => "DeleteSighting",
            Self::UpdateSighting { .. } => "UpdateSighting",
            Self::UpdateAnimal { .. } => "UpdateAnimal",
            Self::AddAnimalType { .. } => "AddAnimalType",
            Self::ReplaceAnimalType { .. } => "ReplaceAnimalType",
            Self::RemoveAnimalType { .. } => "RemoveAnimalType",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TrailOutcome {
    /// A sighting was appended.
    SightingCreated(Sighting),
    /// These sightings were removed, the requested one first.
    SightingsDeleted(Vec<i64>),
    /// A sighting now points at a new location.
    SightingRelocated(Sighting),
    /// The animal record changed.
    AnimalUpdated(Animal),
}
