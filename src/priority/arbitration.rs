// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use super::code::PriorityCode;
use super::profile::BikeProfile;
use crate::maxspeed::max_speed_over_directions;
use crate::way::{Way, INTENDED_ACCESS};

/// Bicycle route [relation](https://wiki.openstreetmap.org/wiki/Cycle_routes)
/// networks, ordered by rank: a way belonging to several relations keeps the
/// highest-ranked membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouteNetwork {
    Local,
    Regional,
    National,
    International,
}

impl RouteNetwork {
    /// Maps a route relation's `network` tag value onto a [RouteNetwork].
    pub fn from_network_tag(value: &str) -> Option<Self> {
        match value {
            "icn" => Some(Self::International),
            "ncn" => Some(Self::National),
            "rcn" => Some(Self::Regional),
            "lcn" => Some(Self::Local),
            _ => None,
        }
    }
}

/// Associates an importance weight with every applicable [PriorityCode].
///
/// Rules insert their verdict at a fixed weight; inserting at an occupied
/// weight overwrites the earlier verdict, and the entry at the highest weight
/// present wins the arbitration.
pub type WeightMap = BTreeMap<u32, PriorityCode>;

/// Keys marking compulsory-use cycle tracks alongside the tagged road.
const CYCLEWAY_ACCESS_KEYS: &[&str] = &[
    "cycleway:bicycle",
    "cycleway:both:bicycle",
    "cycleway:left:bicycle",
    "cycleway:right:bicycle",
];

/// Checks if a way is explicitly designated for cycling.
pub fn is_designated(way: &Way) -> bool {
    way.has_tag("bicycle", "designated")
        || way.has_any_tag(CYCLEWAY_ACCESS_KEYS, "designated")
        || way.has_tag("bicycle_road", "yes")
        || way.has_tag("cyclestreet", "yes")
        || way.has_tag("bicycle", "official")
}

/// Conversion of a [class:bicycle](http://wiki.openstreetmap.org/wiki/Class:bicycle)
/// value to a [PriorityCode]. Unparsable and out-of-range values stay neutral.
fn convert_class_value(value: &str) -> PriorityCode {
    match value.parse::<i32>() {
        Ok(3) => PriorityCode::Best,
        Ok(2) => PriorityCode::VeryNice,
        Ok(1) => PriorityCode::Prefer,
        Ok(-1) => PriorityCode::SlightAvoid,
        Ok(-2) => PriorityCode::Avoid,
        Ok(-3) => PriorityCode::AvoidMore,
        _ => PriorityCode::Unchanged,
    }
}

/// Runs the weighted-arbitration strategy for a single way.
///
/// `relation` is the code derived from the way's route-relation membership
/// (see [BikeProfile::route_code]), seeded at weight 110; without it the map
/// is seeded with [PriorityCode::Unchanged] at weight 0. The base rules and
/// the profile's extra rules then insert their verdicts, and the code at the
/// highest weight wins.
///
/// `way_type_speed` is the profile's nominal riding speed for the way's type,
/// consumed by the scenic-compensation rule.
pub fn handle_priority(
    profile: &BikeProfile,
    way: &Way,
    way_type_speed: f64,
    relation: Option<PriorityCode>,
) -> PriorityCode {
    let mut map = WeightMap::new();
    match relation {
        Some(code) => map.insert(110, code),
        None => map.insert(0, PriorityCode::Unchanged),
    };

    collect(profile, way, way_type_speed, &mut map);
    for rule in profile.extra_rules {
        rule(way, way_type_speed, &mut map);
    }

    winner(&map)
}

/// The code at the highest weight present in the map.
pub fn winner(map: &WeightMap) -> PriorityCode {
    map.last_key_value()
        .map(|(_, &code)| code)
        .unwrap_or(PriorityCode::Unchanged)
}

/// Inserts the base rule set's verdicts into the weight map. Every rule is
/// evaluated unconditionally; competing verdicts at the same weight resolve
/// to the last one inserted.
pub fn collect(profile: &BikeProfile, way: &Way, way_type_speed: f64, map: &mut WeightMap) {
    let highway = way.get_tag("highway");

    if is_designated(way) {
        if highway == Some("path") {
            map.insert(100, PriorityCode::VeryNice);
        } else {
            map.insert(100, PriorityCode::Prefer);
        }
    }

    if highway == Some("cycleway") {
        if way.has_tag_in("foot", INTENDED_ACCESS) && !way.has_tag("segregated", "yes") {
            map.insert(100, PriorityCode::Prefer);
        } else {
            map.insert(100, PriorityCode::VeryNice);
        }
    }

    let max_speed = max_speed_over_directions(way);
    let avoid_code = profile.avoid_code(highway);
    if profile.prefer_highways.contains(&highway.unwrap_or(""))
        || matches!(max_speed, Some(s) if s <= 30.0)
    {
        if max_speed.is_none_or(|s| s < profile.avoid_speed_limit) {
            map.insert(40, PriorityCode::Prefer);
            if way.has_tag_in("tunnel", INTENDED_ACCESS) {
                map.insert(40, PriorityCode::Unchanged);
            }
        }
    } else if avoid_code.is_some()
        || matches!(max_speed, Some(s) if s >= profile.avoid_speed_limit)
            && highway != Some("track")
    {
        map.insert(50, avoid_code.unwrap_or(PriorityCode::Avoid));
        if way.has_tag_in("tunnel", INTENDED_ACCESS) {
            let worse = avoid_code.map_or(PriorityCode::Bad, |c| c.worse().worse());
            map.insert(
                50,
                if worse == PriorityCode::Exclude {
                    PriorityCode::ReachDestination
                } else {
                    worse
                },
            );
        }
    }

    let cycleway_values = ["cycleway", "cycleway:left", "cycleway:both", "cycleway:right"]
        .map(|key| way.get_tag(key).unwrap_or(""));
    if cycleway_values.contains(&"track") {
        map.insert(100, PriorityCode::Prefer);
    } else if ["lane", "opposite_track", "shared_lane", "share_busway", "shoulder"]
        .iter()
        .any(|v| cycleway_values.contains(v))
    {
        map.insert(100, PriorityCode::SlightPrefer);
    }

    if way.has_tag("bicycle", "use_sidepath") {
        map.insert(100, PriorityCode::ReachDestination);
    }

    if profile.pushing_section_highways.contains(&highway.unwrap_or(""))
        || way.has_tag("service", "parking_aisle")
    {
        let mut code = PriorityCode::SlightAvoid;
        if way.has_tag_in("bicycle", &["yes", "permissive"]) {
            code = PriorityCode::Prefer;
        }
        if is_designated(way) && !way.has_tag("highway", "steps") {
            code = PriorityCode::VeryNice;
        }
        if way.has_tag("foot", "yes") {
            code = code.worse();
            if way.has_tag("segregated", "yes") {
                code = code.better();
            }
        }
        if way.has_tag("highway", "steps") {
            code = PriorityCode::Bad;
        }
        map.insert(100, code);
    }

    if way.has_tag("railway", "tram") {
        map.insert(50, PriorityCode::AvoidMore);
    }

    if way.has_tag("lcn", "yes") {
        map.insert(100, PriorityCode::Prefer);
    }

    // An explicit classification beats the derived verdicts at the same weight:
    // humans classify preferences better than the rules above.
    if let Some(class_value) = way
        .get_tag(profile.class_key)
        .or_else(|| way.get_tag("class:bicycle"))
    {
        map.insert(100, convert_class_value(class_value));
    }

    // Scenic ways, and ways whose speed limit caps the riding speed anyway,
    // get a one-step compensation on top of the winning verdict.
    if way.has_tag("scenic", "yes")
        || matches!(max_speed, Some(s) if s > 0.0 && s <= way_type_speed)
    {
        let last = winner(map);
        if last < PriorityCode::Best {
            map.insert(110, last.better());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::profile::{RACING_PROFILE, TOURING_PROFILE};
    use PriorityCode::*;

    macro_rules! way {
        {$( $k:literal : $v:literal ),+} => {
            Way::from_tags(1, [ $( ($k, $v) ),+ ])
        };
    }

    fn touring(way: &Way) -> PriorityCode {
        let speed = TOURING_PROFILE.way_type_speed(way);
        handle_priority(&TOURING_PROFILE, way, speed, None)
    }

    fn racing(way: &Way) -> PriorityCode {
        let speed = RACING_PROFILE.way_type_speed(way);
        handle_priority(&RACING_PROFILE, way, speed, None)
    }

    #[test]
    fn neutral_without_any_rule() {
        assert_eq!(touring(&way! {"highway": "residential"}), Unchanged);
    }

    #[test]
    fn relation_membership_seeds_high_weight() {
        let w = way! {"highway": "residential"};
        assert_eq!(
            handle_priority(&TOURING_PROFILE, &w, 18.0, Some(Best)),
            Best,
        );
        assert_eq!(
            handle_priority(&TOURING_PROFILE, &w, 18.0, Some(VeryNice)),
            VeryNice,
        );
    }

    #[test]
    fn designated_infrastructure() {
        assert_eq!(touring(&way! {"highway": "path", "bicycle": "designated"}), VeryNice);
        assert_eq!(touring(&way! {"highway": "residential", "bicycle": "designated"}), Prefer);
        assert_eq!(touring(&way! {"highway": "residential", "cyclestreet": "yes"}), Prefer);
        assert_eq!(
            touring(&way! {"highway": "residential", "cycleway:right:bicycle": "designated"}),
            Prefer,
        );
    }

    #[test]
    fn dedicated_cycleways() {
        assert_eq!(touring(&way! {"highway": "cycleway"}), VeryNice);
        // Shared with pedestrians without segregation: one step less attractive.
        assert_eq!(touring(&way! {"highway": "cycleway", "foot": "yes"}), Prefer);
        assert_eq!(
            touring(&way! {"highway": "cycleway", "foot": "yes", "segregated": "yes"}),
            VeryNice,
        );
    }

    #[test]
    fn low_speed_roads() {
        assert_eq!(touring(&way! {"highway": "residential", "maxspeed": "30"}), Prefer);
        assert_eq!(
            touring(&way! {"highway": "residential", "maxspeed": "30", "tunnel": "yes"}),
            Unchanged,
        );
    }

    #[test]
    fn high_speed_roads() {
        assert_eq!(touring(&way! {"highway": "unclassified", "maxspeed": "80"}), Avoid);
        // Tunnels make fast roads two steps worse, from the Avoid default to Bad.
        assert_eq!(
            touring(&way! {"highway": "unclassified", "maxspeed": "80", "tunnel": "yes"}),
            Bad,
        );
        // Tracks are exempt from the speed-based avoidance.
        assert_eq!(touring(&way! {"highway": "track", "maxspeed": "80"}), Unchanged);
    }

    #[test]
    fn avoided_highways_in_tunnels_clamp_at_reach_destination() {
        assert_eq!(racing(&way! {"highway": "motorway"}), Bad);
        // Bad worsened twice lands on Exclude, remapped to ReachDestination.
        assert_eq!(racing(&way! {"highway": "motorway", "tunnel": "yes"}), ReachDestination);
        assert_eq!(racing(&way! {"highway": "primary", "tunnel": "yes"}), ReachDestination);
    }

    #[test]
    fn cycleway_side_values() {
        assert_eq!(touring(&way! {"highway": "secondary", "cycleway:right": "track"}), Prefer);
        assert_eq!(
            touring(&way! {"highway": "secondary", "cycleway:left": "shoulder"}),
            SlightPrefer,
        );
        assert_eq!(
            touring(&way! {"highway": "secondary", "cycleway": "shared_lane"}),
            SlightPrefer,
        );
    }

    #[test]
    fn use_sidepath() {
        assert_eq!(
            touring(&way! {"highway": "secondary", "bicycle": "use_sidepath"}),
            ReachDestination,
        );
    }

    #[test]
    fn pushing_sections() {
        // Touring has no pushing-section highways; parking aisles still count.
        assert_eq!(
            touring(&way! {"highway": "service", "service": "parking_aisle"}),
            SlightAvoid,
        );
        assert_eq!(racing(&way! {"highway": "path"}), SlightAvoid);
        assert_eq!(racing(&way! {"highway": "path", "bicycle": "yes"}), Prefer);
        assert_eq!(racing(&way! {"highway": "path", "bicycle": "designated"}), VeryNice);
        // Shared with pedestrians: one step worse, unless segregated.
        assert_eq!(
            racing(&way! {"highway": "path", "bicycle": "yes", "foot": "yes"}),
            SlightPrefer,
        );
        assert_eq!(
            racing(&way! {"highway": "path", "bicycle": "yes", "foot": "yes", "segregated": "yes"}),
            Prefer,
        );
        assert_eq!(
            touring(&way! {"highway": "steps", "service": "parking_aisle"}),
            Bad,
        );
    }

    #[test]
    fn tram_tracks() {
        assert_eq!(touring(&way! {"highway": "residential", "railway": "tram"}), AvoidMore);
    }

    #[test]
    fn local_cycling_network() {
        assert_eq!(touring(&way! {"highway": "residential", "lcn": "yes"}), Prefer);
    }

    #[test]
    fn explicit_classification() {
        assert_eq!(
            touring(&way! {"highway": "residential", "class:bicycle": "3"}),
            Best,
        );
        assert_eq!(
            touring(&way! {"highway": "residential", "class:bicycle": "-2"}),
            Avoid,
        );
        // The profile-specific subkey wins over the generic one.
        assert_eq!(
            touring(&way! {"highway": "residential", "class:bicycle": "3", "class:bicycle:touring": "-3"}),
            AvoidMore,
        );
        assert_eq!(
            racing(&way! {"highway": "residential", "class:bicycle:roadcycling": "2"}),
            VeryNice,
        );
        // Malformed values degrade to Unchanged instead of failing.
        assert_eq!(
            touring(&way! {"highway": "residential", "class:bicycle": "excellent"}),
            Unchanged,
        );
        assert_eq!(
            touring(&way! {"highway": "residential", "class:bicycle": "7"}),
            Unchanged,
        );
    }

    #[test]
    fn scenic_compensation() {
        assert_eq!(
            touring(&way! {"highway": "residential", "scenic": "yes"}),
            SlightPrefer,
        );
        // A speed limit at or below the nominal riding speed compensates too.
        assert_eq!(
            touring(&way! {"highway": "residential", "maxspeed": "15"}),
            VeryNice,
        );
        // No compensation beyond Best.
        let w = way! {"highway": "residential", "scenic": "yes"};
        assert_eq!(
            handle_priority(&TOURING_PROFILE, &w, 18.0, Some(Best)),
            Best,
        );
    }

    #[test]
    fn same_weight_overwrites() {
        let mut map = WeightMap::new();
        map.insert(100, Prefer);
        map.insert(100, Prefer);
        assert_eq!(winner(&map), Prefer);
        map.insert(100, SlightAvoid);
        assert_eq!(winner(&map), SlightAvoid);
        map.insert(40, Best);
        assert_eq!(winner(&map), SlightAvoid);
    }

    #[test]
    fn racing_extra_rules() {
        assert_eq!(racing(&way! {"highway": "residential"}), SlightAvoid);
        assert_eq!(racing(&way! {"highway": "service"}), SlightAvoid);
        assert_eq!(touring(&way! {"highway": "service"}), Unchanged);

        assert_eq!(racing(&way! {"highway": "track", "tracktype": "grade1"}), Prefer);
        assert_eq!(racing(&way! {"highway": "track", "tracktype": "grade3"}), AvoidMore);
        assert_eq!(racing(&way! {"highway": "track"}), AvoidMore);
    }

    #[test]
    fn network_tag_mapping() {
        assert_eq!(RouteNetwork::from_network_tag("icn"), Some(RouteNetwork::International));
        assert_eq!(RouteNetwork::from_network_tag("ncn"), Some(RouteNetwork::National));
        assert_eq!(RouteNetwork::from_network_tag("rcn"), Some(RouteNetwork::Regional));
        assert_eq!(RouteNetwork::from_network_tag("lcn"), Some(RouteNetwork::Local));
        assert_eq!(RouteNetwork::from_network_tag("mtb"), None);
        assert!(RouteNetwork::International > RouteNetwork::Local);
    }
}
