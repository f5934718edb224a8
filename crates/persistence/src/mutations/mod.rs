// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Every write to an animal or its trail goes through [`animals::claim_revision`]
//! inside the same transaction as the change itself.

pub mod accounts;
pub mod animal_types;
pub mod animals;
pub mod areas;
pub mod locations;
pub mod sightings;
