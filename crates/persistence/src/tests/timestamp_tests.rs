// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::{date, datetime};

use crate::error::PersistenceError;
use crate::timestamps::{decode, encode, end_of_day_bound, truncate};

#[test]
fn test_encode_is_fixed_width_utc() {
    let encoded: String = encode(datetime!(2026-03-01 08:05:09.25 +02:00)).unwrap();

    assert_eq!(encoded, "2026-03-01T06:05:09.250000Z");
}

#[test]
fn test_decode_restores_microseconds() {
    let decoded = decode("2026-03-01T06:05:09.000123Z").unwrap();

    assert_eq!(decoded, datetime!(2026-03-01 06:05:09.000123 UTC));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(
        decode("yesterday"),
        Err(PersistenceError::CorruptRow(_))
    ));
}

#[test]
fn test_encoded_order_matches_time_order() {
    let earlier: String = encode(datetime!(2026-03-01 09:59:59.999999 UTC)).unwrap();
    let later: String = encode(datetime!(2026-03-01 10:00:00 UTC)).unwrap();

    assert!(earlier < later);
}

#[test]
fn test_truncate_drops_sub_microsecond_precision() {
    let truncated = truncate(datetime!(2026-03-01 10:00:00.123456789 UTC));

    assert_eq!(truncated, datetime!(2026-03-01 10:00:00.123456 UTC));
    assert_eq!(decode(&encode(truncated).unwrap()).unwrap(), truncated);
}

#[test]
fn test_end_of_day_bound_is_next_midnight() {
    let bound: Option<String> = end_of_day_bound(date!(2026 - 03 - 31)).unwrap();

    assert_eq!(bound.as_deref(), Some("2026-04-01T00:00:00.000000Z"));
}
