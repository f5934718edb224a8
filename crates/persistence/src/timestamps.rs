// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp encoding.
//!
//! Timestamps are stored as fixed-width UTC text with microsecond precision,
//! so lexical order in SQL equals chronological order.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::PersistenceError;

const STORED_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Encodes a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the year cannot be represented in four digits.
pub fn encode(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    let utc: OffsetDateTime = timestamp.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
        .format(STORED_FORMAT)
        .map_err(|e| PersistenceError::QueryFailed(format!("Cannot encode {timestamp}: {e}")))
}

/// Decodes a stored timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is malformed.
pub fn decode(stored: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(stored, STORED_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRow(format!("Bad timestamp '{stored}': {e}")))
}

/// Truncates a timestamp to what survives a round trip through storage.
#[must_use]
pub fn truncate(timestamp: OffsetDateTime) -> OffsetDateTime {
    let utc: OffsetDateTime = timestamp.to_offset(UtcOffset::UTC);
    let micros: u32 = utc.microsecond();
    utc.replace_nanosecond(micros * 1_000).unwrap_or(utc)
}

/// Returns the exclusive upper bound that admits every timestamp on or
/// before `date`, or `None` when no later date exists.
///
/// # Errors
///
/// Returns an error if the bound cannot be encoded.
pub fn end_of_day_bound(date: Date) -> Result<Option<String>, PersistenceError> {
    date.next_day()
        .map(|next| encode(next.midnight().assume_utc()))
        .transpose()
}
