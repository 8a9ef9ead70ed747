// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::arbitration::{RouteNetwork, WeightMap};
use super::code::PriorityCode;
use crate::way::Way;

/// Nominal riding speed assumed when a way's type has no entry in
/// [BikeProfile::nominal_speeds].
const DEFAULT_WAY_TYPE_SPEED: f64 = 15.0;

/// Selects which of the two scoring strategies a profile wires to the
/// priority entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Road-type base priority scaled by highway class and motor-proximity
    /// factors. The default.
    Multiplicative,

    /// Weighted arbitration between independent tag-derived signals; the
    /// stored priority is the winning [PriorityCode]'s ordinal value.
    Arbitration,
}

/// An additional arbitration rule supplied by a profile, applied after the
/// base rule set in registration order.
pub type ExtraRule = fn(&Way, f64, &mut WeightMap);

/// Describes how way tags translate into cycling priorities.
///
/// Profiles are plain immutable data: built once, usually as a `const`, and
/// passed by reference into the scoring functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeProfile<'a> {
    /// Human readable name of the profile, also the default subkey of its
    /// classification tag.
    pub name: &'a str,

    /// The scoring strategy wired to the priority entry point.
    pub strategy: Strategy,

    /// Highway types where the rider is expected to get off and push the
    /// bike.
    pub pushing_section_highways: &'a [&'a str],

    /// Highway types this profile prefers regardless of speed limits.
    pub prefer_highways: &'a [&'a str],

    /// Highway types this profile avoids, with the severity of the avoidance.
    pub avoid_highways: &'a [(&'a str, PriorityCode)],

    /// Priority granted for membership in a bicycle route relation,
    /// per network rank.
    pub route_map: &'a [(RouteNetwork, PriorityCode)],

    /// Nominal riding speed (km/h) per highway type, consumed by the
    /// scenic-compensation rule.
    pub nominal_speeds: &'a [(&'a str, f64)],

    /// Car speed limit (km/h) at which a road flips from unremarkable
    /// to avoided.
    pub avoid_speed_limit: f64,

    /// The profile-specific classification tag
    /// (e.g. `class:bicycle:touring`), consulted before the generic
    /// `class:bicycle`.
    pub class_key: &'a str,

    /// Additional arbitration rules, applied after the base rule set.
    pub extra_rules: &'a [ExtraRule],
}

impl<'a> BikeProfile<'a> {
    /// The priority granted for membership in a route relation of the given
    /// network rank.
    pub fn route_code(&self, network: RouteNetwork) -> Option<PriorityCode> {
        self.route_map
            .iter()
            .find_map(|&(n, code)| (n == network).then_some(code))
    }

    /// The avoidance severity of a highway type, if this profile avoids it.
    pub fn avoid_code(&self, highway: Option<&str>) -> Option<PriorityCode> {
        let highway = highway?;
        self.avoid_highways
            .iter()
            .find_map(|&(h, code)| (h == highway).then_some(code))
    }

    /// The nominal riding speed for the provided way's type.
    pub fn way_type_speed(&self, way: &Way) -> f64 {
        way.get_tag("highway")
            .and_then(|highway| {
                self.nominal_speeds
                    .iter()
                    .find_map(|&(h, speed)| (h == highway).then_some(speed))
            })
            .unwrap_or(DEFAULT_WAY_TYPE_SPEED)
    }
}

/// Routing profile for touring bikes: no highway class is preferred or
/// avoided outright, leaving the verdicts to infrastructure and speed rules.
pub const TOURING_PROFILE: BikeProfile = BikeProfile {
    name: "touring",
    strategy: Strategy::Multiplicative,
    pushing_section_highways: &[],
    prefer_highways: &[],
    avoid_highways: &[],
    route_map: &[
        (RouteNetwork::International, PriorityCode::Best),
        (RouteNetwork::National, PriorityCode::Best),
        (RouteNetwork::Regional, PriorityCode::VeryNice),
        (RouteNetwork::Local, PriorityCode::Prefer),
    ],
    nominal_speeds: &[
        ("motorway", 18.0),
        ("motorway_link", 18.0),
        ("trunk", 18.0),
        ("trunk_link", 18.0),
        ("primary", 18.0),
        ("primary_link", 18.0),
        ("secondary", 18.0),
        ("secondary_link", 18.0),
        ("tertiary", 18.0),
        ("tertiary_link", 18.0),
        ("unclassified", 16.0),
        ("residential", 18.0),
        ("living_street", 6.0),
        ("service", 14.0),
        ("road", 12.0),
        ("track", 12.0),
        ("cycleway", 18.0),
        ("path", 10.0),
        ("footway", 6.0),
        ("pedestrian", 6.0),
        ("bridleway", 6.0),
        ("steps", 2.0),
        ("platform", 4.0),
    ],
    avoid_speed_limit: 71.0,
    class_key: "class:bicycle:touring",
    extra_rules: &[],
};

/// Routing profile for racing bikes: prefers smooth through roads, avoids
/// motorways and primaries outright, and rates tracks by their surface grade.
pub const RACING_PROFILE: BikeProfile = BikeProfile {
    name: "roadcycling",
    strategy: Strategy::Multiplicative,
    pushing_section_highways: &["path"],
    prefer_highways: &[
        "road",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "residential",
    ],
    avoid_highways: &[
        ("motorway", PriorityCode::Bad),
        ("motorway_link", PriorityCode::Bad),
        ("trunk", PriorityCode::Bad),
        ("trunk_link", PriorityCode::Bad),
        ("primary", PriorityCode::AvoidMore),
        ("primary_link", PriorityCode::AvoidMore),
    ],
    route_map: &[
        (RouteNetwork::International, PriorityCode::Best),
        (RouteNetwork::National, PriorityCode::Best),
        (RouteNetwork::Regional, PriorityCode::VeryNice),
        (RouteNetwork::Local, PriorityCode::Unchanged),
    ],
    nominal_speeds: &[
        ("motorway", 20.0),
        ("motorway_link", 20.0),
        ("trunk", 20.0),
        ("trunk_link", 20.0),
        ("primary", 20.0),
        ("primary_link", 20.0),
        ("secondary", 20.0),
        ("secondary_link", 20.0),
        ("tertiary", 20.0),
        ("tertiary_link", 20.0),
        ("unclassified", 16.0),
        ("residential", 16.0),
        ("living_street", 6.0),
        ("service", 12.0),
        ("road", 16.0),
        ("track", 2.0),
        ("cycleway", 20.0),
        ("path", 8.0),
        ("footway", 4.0),
        ("pedestrian", 4.0),
        ("bridleway", 4.0),
        ("steps", 2.0),
        ("platform", 4.0),
    ],
    avoid_speed_limit: 81.0,
    class_key: "class:bicycle:roadcycling",
    extra_rules: &[racing_road_rules],
};

/// Racing-specific arbitration rules: demote service and residential streets,
/// and rate tracks by their [tracktype](https://wiki.openstreetmap.org/wiki/Key:tracktype).
fn racing_road_rules(way: &Way, _way_type_speed: f64, map: &mut WeightMap) {
    match way.get_tag("highway") {
        Some("service") | Some("residential") => {
            map.insert(40, PriorityCode::SlightAvoid);
        }
        Some("track") => match way.get_tag("tracktype") {
            Some("grade1") => {
                map.insert(110, PriorityCode::Prefer);
            }
            None => {
                map.insert(110, PriorityCode::AvoidMore);
            }
            Some(grade) if grade.starts_with("grade") => {
                map.insert(110, PriorityCode::AvoidMore);
            }
            Some(_) => {}
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! way {
        {$( $k:literal : $v:literal ),+} => {
            Way::from_tags(1, [ $( ($k, $v) ),+ ])
        };
    }

    #[test]
    fn route_codes() {
        assert_eq!(
            TOURING_PROFILE.route_code(RouteNetwork::National),
            Some(PriorityCode::Best),
        );
        assert_eq!(
            TOURING_PROFILE.route_code(RouteNetwork::Local),
            Some(PriorityCode::Prefer),
        );
        assert_eq!(
            RACING_PROFILE.route_code(RouteNetwork::Local),
            Some(PriorityCode::Unchanged),
        );
    }

    #[test]
    fn avoid_codes() {
        assert_eq!(TOURING_PROFILE.avoid_code(Some("motorway")), None);
        assert_eq!(
            RACING_PROFILE.avoid_code(Some("motorway")),
            Some(PriorityCode::Bad),
        );
        assert_eq!(
            RACING_PROFILE.avoid_code(Some("primary")),
            Some(PriorityCode::AvoidMore),
        );
        assert_eq!(RACING_PROFILE.avoid_code(Some("residential")), None);
        assert_eq!(RACING_PROFILE.avoid_code(None), None);
    }

    #[test]
    fn way_type_speeds() {
        assert_eq!(
            TOURING_PROFILE.way_type_speed(&way! {"highway": "residential"}),
            18.0,
        );
        assert_eq!(TOURING_PROFILE.way_type_speed(&way! {"highway": "steps"}), 2.0);
        // Unknown and missing highway types fall back to the default.
        assert_eq!(
            TOURING_PROFILE.way_type_speed(&way! {"highway": "elevator"}),
            DEFAULT_WAY_TYPE_SPEED,
        );
        assert_eq!(
            TOURING_PROFILE.way_type_speed(&way! {"route": "ferry"}),
            DEFAULT_WAY_TYPE_SPEED,
        );
    }
}
