// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::way::Way;

const KMH_PER_MPH: f64 = 1.609344;
const KMH_PER_KNOT: f64 = 1.852;

/// Extracts the legal maximum speed (in km/h) applicable to one direction of
/// a way, from its [maxspeed](https://wiki.openstreetmap.org/wiki/Key:maxspeed)
/// tags. A directional `maxspeed:forward`/`maxspeed:backward` tag overrides
/// the plain `maxspeed` one.
///
/// Missing or malformed values yield [None]: an unreadable speed limit means
/// "no speed-based rule applies", never a failure.
pub fn max_speed(way: &Way, reverse: bool) -> Option<f64> {
    let directional_key = if reverse {
        "maxspeed:backward"
    } else {
        "maxspeed:forward"
    };
    way.get_tag(directional_key)
        .or_else(|| way.get_tag("maxspeed"))
        .and_then(parse_speed)
}

/// The higher of the two directions' maximum speeds, if any is known.
pub fn max_speed_over_directions(way: &Way) -> Option<f64> {
    match (max_speed(way, false), max_speed(way, true)) {
        (Some(forward), Some(backward)) => Some(forward.max(backward)),
        (forward, backward) => forward.or(backward),
    }
}

/// Parses a raw `maxspeed` value into km/h. Handles plain numbers, the
/// `mph` and `knots` unit suffixes, and the `walk` keyword.
fn parse_speed(value: &str) -> Option<f64> {
    let value = value.trim();

    if value == "walk" {
        return Some(5.0);
    }

    let (number, unit_factor) = if let Some(rest) = value.strip_suffix("mph") {
        (rest.trim_end(), KMH_PER_MPH)
    } else if let Some(rest) = value.strip_suffix("knots") {
        (rest.trim_end(), KMH_PER_KNOT)
    } else {
        (value, 1.0)
    };

    match number.parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed > 0.0 => Some(speed * unit_factor),
        _ => None,
    }
}
