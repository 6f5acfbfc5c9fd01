use bizidata_admin::utils::format::{
    clamp_rating, convert_timestamps, format_address, format_currency, parse_datetime,
    star_rating, status_badge, BadgeVariant, StarRating, NO_ADDRESS,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

// ── Timestamps ──────────────────────────────────────────────────────────────

#[test]
fn converts_nested_timestamp_wrappers() {
    let raw = json!({
        "created_at": { "seconds": 1700000000, "nanoseconds": 0 },
        "history": [{ "_seconds": 1700000000, "_nanoseconds": 500000000 }],
        "rest": { "updated": { "timestampValue": "2023-11-14T22:13:20Z" } },
        "name": "kept"
    });
    let converted = convert_timestamps(raw);
    assert_eq!(converted["created_at"], "2023-11-14T22:13:20Z");
    assert_eq!(converted["history"][0], "2023-11-14T22:13:20.500Z");
    assert_eq!(converted["rest"]["updated"], "2023-11-14T22:13:20Z");
    assert_eq!(converted["name"], "kept");

    // running it again changes nothing
    assert_eq!(convert_timestamps(converted.clone()), converted);
}

#[test]
fn maps_with_extra_keys_are_not_timestamps() {
    let raw = json!({ "seconds": 1, "nanoseconds": 0, "label": "lap" });
    assert_eq!(convert_timestamps(raw.clone()), raw);
}

#[test]
fn parses_every_supported_datetime_shape() {
    let expected = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
    assert_eq!(
        parse_datetime(&json!("2023-11-14T22:13:20Z")),
        Some(expected)
    );
    assert_eq!(
        parse_datetime(&json!("2023-11-14T23:13:20+01:00")),
        Some(expected)
    );
    assert_eq!(
        parse_datetime(&json!({ "seconds": 1700000000, "nanoseconds": 0 })),
        Some(expected)
    );
    assert_eq!(parse_datetime(&json!(1700000000000i64)), Some(expected));
    assert_eq!(parse_datetime(&json!("yesterday")), None);
    assert_eq!(parse_datetime(&json!(true)), None);
}

// ── Addresses ───────────────────────────────────────────────────────────────

#[test]
fn formats_structured_address_in_order() {
    let address = json!({
        "country": "US",
        "zipCode": 62701,
        "city": "Springfield",
        "street": "1 Main St",
        "state": "IL"
    });
    assert_eq!(
        format_address(&address),
        "1 Main St, Springfield, IL, 62701, US"
    );
}

#[test]
fn formats_string_and_array_addresses() {
    assert_eq!(format_address(&json!("  22 Ocean Ave ")), "22 Ocean Ave");
    assert_eq!(format_address(&json!(["Unit 4", "", 12])), "Unit 4, 12");
}

#[test]
fn missing_address_has_placeholder() {
    assert_eq!(format_address(&json!(null)), NO_ADDRESS);
    assert_eq!(format_address(&json!({})), NO_ADDRESS);
    assert_eq!(format_address(&json!("   ")), NO_ADDRESS);
    assert_eq!(format_address(&json!({ "note": "back door" })), NO_ADDRESS);
}

// ── Ratings ─────────────────────────────────────────────────────────────────

#[test]
fn star_rating_always_has_five_slots() {
    let cases = [
        (4.5, StarRating { full: 4, half: 1, empty: 0 }),
        (3.7, StarRating { full: 3, half: 1, empty: 1 }),
        (3.2, StarRating { full: 3, half: 0, empty: 2 }),
        (5.0, StarRating { full: 5, half: 0, empty: 0 }),
        (9.0, StarRating { full: 5, half: 0, empty: 0 }),
        (-2.0, StarRating { full: 0, half: 0, empty: 5 }),
        (f64::NAN, StarRating { full: 0, half: 0, empty: 5 }),
    ];
    for (rating, expected) in cases {
        let stars = star_rating(rating);
        assert_eq!(stars, expected, "rating {rating}");
        assert_eq!(stars.full + stars.half + stars.empty, 5);
    }
}

#[test]
fn clamp_rating_bounds() {
    assert_eq!(clamp_rating(7.0), 5.0);
    assert_eq!(clamp_rating(-1.0), 0.0);
    assert_eq!(clamp_rating(f64::NAN), 0.0);
    assert_eq!(clamp_rating(3.3), 3.3);
}

// ── Status badges ───────────────────────────────────────────────────────────

#[test]
fn status_badge_variants() {
    let badge = status_badge("ACTIVE");
    assert_eq!(badge.label, "Active");
    assert_eq!(badge.variant, BadgeVariant::Success);

    let badge = status_badge("in-progress");
    assert_eq!(badge.label, "In Progress");
    assert_eq!(badge.variant, BadgeVariant::Warning);

    assert_eq!(status_badge("suspended").variant, BadgeVariant::Destructive);
    assert_eq!(status_badge("offline").variant, BadgeVariant::Secondary);
    assert_eq!(status_badge("delivering").variant, BadgeVariant::Warning);
}

#[test]
fn unknown_or_blank_status_gets_default_badge() {
    let badge = status_badge("mystery_state");
    assert_eq!(badge.label, "Mystery State");
    assert_eq!(badge.variant, BadgeVariant::Default);

    let badge = status_badge("  ");
    assert_eq!(badge.label, "Unknown");
    assert_eq!(badge.variant, BadgeVariant::Default);
}

// ── Currency ────────────────────────────────────────────────────────────────

#[test]
fn formats_currency_with_grouping() {
    assert_eq!(format_currency(0.0), "$0.00");
    assert_eq!(format_currency(45.75), "$45.75");
    assert_eq!(format_currency(1234567.891), "$1,234,567.89");
    assert_eq!(format_currency(999.999), "$1,000.00");
    assert_eq!(format_currency(-5.5), "-$5.50");
}

#[test]
fn currency_edge_cases() {
    assert_eq!(format_currency(f64::NAN), "$0.00");
    assert_eq!(format_currency(f64::INFINITY), "$0.00");
    // rounds to zero, so no sign
    assert_eq!(format_currency(-0.001), "$0.00");
}
