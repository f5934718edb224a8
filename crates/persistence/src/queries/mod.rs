// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `accounts`: Account lookup, search and credential rows
//! - `locations`: Location lookup and reference checks
//! - `animal_types`: Animal type lookup and usage checks
//! - `animals`: Animal lookup, search and analytics candidates
//! - `sightings`: Trails and sighting search
//! - `areas`: Area polygons

pub mod accounts;
pub mod animal_types;
pub mod animals;
pub mod areas;
pub mod locations;
pub mod sightings;
