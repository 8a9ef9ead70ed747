// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod arbitration;
mod code;
mod profile;

pub use arbitration::{collect, handle_priority, is_designated, winner, RouteNetwork, WeightMap};
pub use code::PriorityCode;
pub use profile::{BikeProfile, ExtraRule, Strategy, RACING_PROFILE, TOURING_PROFILE};

use crate::attrs::EdgeAttributes;
use crate::way::{is_ferry, Way};
use crate::RoadType;

/// Base priority multiplier per assigned road type.
const BASE_PRIORITIES: &[(RoadType, f64)] = &[
    (RoadType::Cyclable, 1.5),
    (RoadType::PedestrianBicycleSegregated, 1.3),
    (RoadType::MotorBicycleTrack, 1.3),
    (RoadType::MotorBicycleLane, 1.2),
    (RoadType::PedestrianBicycle, 1.15),
    (RoadType::Pedestrian, 0.4),
    (RoadType::BusBicycle, 0.9),
    (RoadType::MotorBicycle, 0.9),
    (RoadType::Motor, 0.7),
];

/// Priority adjustment per highway class, applied to motor-adjacent road types.
const HIGHWAY_FACTORS: &[(&str, f64)] = &[
    ("living_street", 1.0),
    ("track", 1.0),
    ("path", 1.0),
    ("cycleway", 1.0),
    ("residential", 1.0),
    ("service", 1.0),
    ("platform", 1.0),
    ("unclassified", 1.0),
    ("tertiary", 0.95),
    ("secondary", 0.9),
    ("primary", 0.85),
];

/// How strongly the highway class weighs on each road type, reflecting the
/// proximity to motor traffic. Road types without an entry are insulated from
/// the road and take their base priority unmodified.
const PROXIMITY_COEFFICIENTS: &[(RoadType, f64)] = &[
    (RoadType::MotorBicycleTrack, 1.0),
    (RoadType::MotorBicycleLane, 1.0),
    (RoadType::BusBicycle, 0.9),
    (RoadType::MotorBicycle, 0.9),
    (RoadType::Motor, 0.8),
];

fn base_priority(road_type: RoadType) -> f64 {
    BASE_PRIORITIES
        .iter()
        .find_map(|&(rt, priority)| (rt == road_type).then_some(priority))
        .unwrap_or(1.0)
}

fn highway_factor(highway: Option<&str>) -> f64 {
    highway
        .and_then(|highway| {
            HIGHWAY_FACTORS
                .iter()
                .find_map(|&(h, factor)| (h == highway).then_some(factor))
        })
        .unwrap_or(1.0)
}

fn proximity_coefficient(road_type: RoadType) -> Option<f64> {
    PROXIMITY_COEFFICIENTS
        .iter()
        .find_map(|&(rt, coefficient)| (rt == road_type).then_some(coefficient))
}

/// The multiplicative strategy: the road type's base priority, scaled by the
/// highway class factor and the proximity coefficient for road types exposed
/// to motor traffic. An unassigned road type is neutral.
pub fn multiplicative_priority(way: &Way, road_type: Option<RoadType>) -> f64 {
    let Some(road_type) = road_type else {
        return 1.0;
    };

    let base = base_priority(road_type);
    match proximity_coefficient(road_type) {
        Some(coefficient) => base * highway_factor(way.get_tag("highway")) * coefficient,
        None => base,
    }
}

/// Computes and stores both directions' priorities for a single way.
///
/// Expects the road types to have been classified into `attrs` beforehand
/// (see [classify_road_type](crate::classify_road_type)). Ways without a
/// `highway` tag are skipped entirely unless they are ferries; a ferry's
/// relation code is forced to [PriorityCode::SlightAvoid].
///
/// `network` is the way's route-relation membership, consumed by the
/// arbitration strategy.
pub fn handle_way_tags(
    profile: &BikeProfile,
    way: &Way,
    attrs: &mut EdgeAttributes,
    network: Option<RouteNetwork>,
) {
    let mut relation_code = network.and_then(|n| profile.route_code(n));
    if way.get_tag("highway").is_none() {
        if is_ferry(way) {
            relation_code = Some(PriorityCode::SlightAvoid);
        } else {
            return;
        }
    }

    attrs.set_priority(false, 1.0);
    attrs.set_priority(true, 1.0);

    match profile.strategy {
        Strategy::Multiplicative => {
            for reverse in [false, true] {
                let priority = multiplicative_priority(way, attrs.road_type(reverse));
                attrs.set_priority(reverse, priority);
            }
        }
        Strategy::Arbitration => {
            let way_type_speed = profile.way_type_speed(way);
            let code = handle_priority(profile, way, way_type_speed, relation_code);
            for reverse in [false, true] {
                attrs.set_priority(reverse, code.value() as f64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road_type::classify_road_type;

    macro_rules! way {
        {$( $k:literal : $v:literal ),+} => {
            Way::from_tags(1, [ $( ($k, $v) ),+ ])
        };
    }

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b) as f64).abs() < 1e-9,
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn scored(profile: &BikeProfile, way: &Way) -> EdgeAttributes {
        let mut attrs = EdgeAttributes::default();
        classify_road_type(way, &mut attrs);
        handle_way_tags(profile, way, &mut attrs, None);
        attrs
    }

    #[test]
    fn motor_roads_scale_with_highway_class() {
        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "primary"});
        assert_almost_eq!(attrs.priority(false), 0.7 * 0.85 * 0.8);
        assert_almost_eq!(attrs.priority(true), 0.7 * 0.85 * 0.8);

        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "residential"});
        assert_almost_eq!(attrs.priority(false), 0.7 * 1.0 * 0.8);
    }

    #[test]
    fn insulated_road_types_take_base_priority() {
        // Cyclable is not motor-adjacent: the highway factor does not apply.
        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "cycleway"});
        assert_almost_eq!(attrs.priority(false), 1.5);
        assert_almost_eq!(attrs.priority(true), 1.5);

        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "footway"});
        assert_almost_eq!(attrs.priority(false), 0.4);
    }

    #[test]
    fn tracks_and_lanes() {
        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "residential", "cycleway": "track"});
        assert_almost_eq!(attrs.priority(false), 1.3);

        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "secondary", "cycleway": "track"});
        assert_almost_eq!(attrs.priority(false), 1.3 * 0.9);

        let attrs = scored(&TOURING_PROFILE, &way! {"highway": "secondary", "cycleway": "share_busway"});
        // Only the forward direction carries the bus lane; backward stays unset.
        assert_almost_eq!(attrs.priority(false), 0.9 * 0.9 * 0.9);
        assert_almost_eq!(attrs.priority(true), 1.0);
    }

    #[test]
    fn directions_score_independently() {
        let w = way! {"highway": "residential", "cycleway:left": "track", "cycleway:right": "lane"};
        let attrs = scored(&TOURING_PROFILE, &w);
        assert_almost_eq!(attrs.priority(false), 1.2); // lane forward
        assert_almost_eq!(attrs.priority(true), 1.3); // track backward
    }

    #[test]
    fn ways_without_highway_are_skipped() {
        let w = way! {"railway": "rail"};
        let mut attrs = EdgeAttributes::default();
        attrs.set_priority(false, 0.5);
        handle_way_tags(&TOURING_PROFILE, &w, &mut attrs, None);
        assert_almost_eq!(attrs.priority(false), 0.5);
        assert_almost_eq!(attrs.priority(true), 1.0);
    }

    #[test]
    fn ferries_are_scored() {
        let w = way! {"route": "ferry"};
        let mut attrs = EdgeAttributes::default();
        classify_road_type(&w, &mut attrs);
        handle_way_tags(&TOURING_PROFILE, &w, &mut attrs, None);
        // The classifier falls back to Motor; without a highway tag only the
        // proximity coefficient applies.
        assert_almost_eq!(attrs.priority(false), 0.7 * 0.8);
    }

    #[test]
    fn arbitration_strategy_stores_ordinals() {
        let profile = BikeProfile {
            strategy: Strategy::Arbitration,
            ..TOURING_PROFILE
        };

        let attrs = scored(&profile, &way! {"highway": "residential", "lcn": "yes"});
        assert_almost_eq!(attrs.priority(false), PriorityCode::Prefer.value() as f64);
        assert_almost_eq!(attrs.priority(true), PriorityCode::Prefer.value() as f64);

        let mut attrs = EdgeAttributes::default();
        let w = way! {"highway": "residential"};
        handle_way_tags(&profile, &w, &mut attrs, Some(RouteNetwork::Regional));
        assert_almost_eq!(attrs.priority(false), PriorityCode::VeryNice.value() as f64);
    }

    #[test]
    fn arbitration_scores_ferries_slight_avoid() {
        let profile = BikeProfile {
            strategy: Strategy::Arbitration,
            ..TOURING_PROFILE
        };
        let mut attrs = EdgeAttributes::default();
        let w = way! {"route": "ferry"};
        handle_way_tags(&profile, &w, &mut attrs, None);
        assert_almost_eq!(attrs.priority(false), PriorityCode::SlightAvoid.value() as f64);
    }
}
