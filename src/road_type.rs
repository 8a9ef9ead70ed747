// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::attrs::EdgeAttributes;
use crate::way::{Way, INTENDED_ACCESS};

/// Categorical classification of the cycling context of one direction of a way.
///
/// A way may legitimately carry different road types forward and backward,
/// e.g. with a cycle track mapped on only one side of the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadType {
    /// Shared with general motor traffic, no cycling infrastructure.
    Motor,

    /// Shared with motor traffic on a marked shared lane.
    MotorBicycle,

    /// Shared with buses on a [bus lane](https://wiki.openstreetmap.org/wiki/Tag:cycleway%3Dshare_busway).
    BusBicycle,

    /// Foot traffic only.
    Pedestrian,

    /// Shared with pedestrians on a single unsegregated surface.
    PedestrianBicycle,

    /// A [cycle lane](https://wiki.openstreetmap.org/wiki/Tag:cycleway%3Dlane) on a road.
    MotorBicycleLane,

    /// A [cycle track](https://wiki.openstreetmap.org/wiki/Tag:cycleway%3Dtrack) alongside a road.
    MotorBicycleTrack,

    /// Shared with pedestrians, with a [segregated](https://wiki.openstreetmap.org/wiki/Key:segregated)
    /// lane for each mode.
    PedestrianBicycleSegregated,

    /// Dedicated cycling infrastructure without pedestrian or motor traffic.
    Cyclable,
}

impl std::fmt::Display for RoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Motor => write!(f, "motor"),
            Self::MotorBicycle => write!(f, "motor_bicycle"),
            Self::BusBicycle => write!(f, "bus_bicycle"),
            Self::Pedestrian => write!(f, "pedestrian"),
            Self::PedestrianBicycle => write!(f, "pedestrian_bicycle"),
            Self::MotorBicycleLane => write!(f, "motor_bicycle_lane"),
            Self::MotorBicycleTrack => write!(f, "motor_bicycle_track"),
            Self::PedestrianBicycleSegregated => write!(f, "pedestrian_bicycle_segregated"),
            Self::Cyclable => write!(f, "cyclable"),
        }
    }
}

/// Side of a way on which a `cycleway:left`/`cycleway:right` tag applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn key(self) -> &'static str {
        match self {
            Self::Left => "cycleway:left",
            Self::Right => "cycleway:right",
        }
    }

    fn oneway_key(self) -> &'static str {
        match self {
            Self::Left => "cycleway:left:oneway",
            Self::Right => "cycleway:right:oneway",
        }
    }

    /// The direction a side's infrastructure serves by default:
    /// left-side infrastructure the backward direction, right-side the forward one.
    fn natural_reverse(self) -> bool {
        match self {
            Self::Left => true,
            Self::Right => false,
        }
    }
}

/// Assigns a [RoadType] to up to both directions of the provided way,
/// based solely on its tags.
///
/// Directions without any matching rule are left unset; consumers treat
/// an unset road type as a neutral 1.0 priority factor.
pub fn classify_road_type(way: &Way, attrs: &mut EdgeAttributes) {
    match way.get_tag("highway") {
        Some("cycleway") => {
            if way.has_tag_in("foot", INTENDED_ACCESS) {
                segregated(way, attrs);
            } else {
                cyclable(way, attrs);
            }
        }

        Some("path") | Some("footway") => {
            if way.has_tag_in("bicycle", INTENDED_ACCESS) {
                segregated(way, attrs);
            } else {
                set_both(attrs, RoadType::Pedestrian);
            }
        }

        // primary, secondary, tertiary, residential, service, ...
        _ => {
            if way.has_key("cycleway") {
                cycleway_value(way, attrs);
            } else if way.has_key("cycleway:both") {
                cycleway_both(way, attrs);
            } else {
                cycleway_sides(way, attrs);
            }
        }
    }
}

fn set_both(attrs: &mut EdgeAttributes, road_type: RoadType) {
    attrs.set_road_type(false, road_type);
    attrs.set_road_type(true, road_type);
}

/// A way is "opposite" when cyclists ride against its only legal motor direction.
fn is_opposite(way: &Way) -> bool {
    way.has_tag("oneway", "yes") && !way.has_tag("oneway:bicycle", "no")
}

/// Shared pedestrian-and-bicycle infrastructure: segregated lanes when
/// `segregated=yes`, a single shared surface otherwise.
fn segregated(way: &Way, attrs: &mut EdgeAttributes) {
    if way.has_tag("segregated", "yes") {
        let road_type = RoadType::PedestrianBicycleSegregated;
        match way.get_tag("oneway:bicycle") {
            Some("yes") => attrs.set_road_type(false, road_type),
            Some("-1") => attrs.set_road_type(true, road_type),
            _ => set_both(attrs, road_type),
        }
    } else {
        set_both(attrs, RoadType::PedestrianBicycle);
    }
}

fn cyclable(way: &Way, attrs: &mut EdgeAttributes) {
    const ONEWAY_KEYS: &[&str] = &["oneway", "cycleway:oneway", "oneway:bicycle"];

    let road_type = RoadType::Cyclable;
    if ONEWAY_KEYS.iter().any(|&key| way.has_tag(key, "no")) {
        set_both(attrs, road_type);
    } else if ONEWAY_KEYS.iter().any(|&key| way.has_tag(key, "-1")) {
        attrs.set_road_type(true, road_type);
    } else if way.has_tag("oneway", "yes") {
        attrs.set_road_type(false, road_type);
    } else {
        set_both(attrs, road_type);
    }
}

/// Fallback for ways without any cycling infrastructure.
///
/// Only `oneway=-1` yields a single (backward) direction here; every other
/// `oneway` value, including `yes`, ends up with both directions set.
fn no_infra(way: &Way, attrs: &mut EdgeAttributes) {
    let road_type = RoadType::Motor;
    if way.has_tag("oneway", "yes") {
        attrs.set_road_type(false, road_type);
    }
    if way.has_tag("oneway", "-1") {
        attrs.set_road_type(true, road_type);
    } else {
        set_both(attrs, road_type);
    }
}

/// Direction resolution shared by `cycleway=track` and `cycleway=lane`:
/// `oneway:bicycle` decides; with the tag absent, `oneway=-1` flips the
/// infrastructure to the backward direction.
fn infra_direction(way: &Way, attrs: &mut EdgeAttributes, road_type: RoadType) {
    match way.get_tag("oneway:bicycle") {
        Some("yes") => attrs.set_road_type(false, road_type),
        Some("-1") => attrs.set_road_type(true, road_type),
        Some("no") => set_both(attrs, road_type),
        _ => {
            if way.has_tag("oneway", "-1") {
                attrs.set_road_type(true, road_type);
            } else {
                set_both(attrs, road_type);
            }
        }
    }
}

fn cycleway_value(way: &Way, attrs: &mut EdgeAttributes) {
    match way.get_tag("cycleway") {
        Some("opposite") => attrs.set_road_type(true, RoadType::MotorBicycle),

        Some("opposite_share_busway") | Some("opposite_shared_busway") => {
            attrs.set_road_type(false, RoadType::BusBicycle)
        }

        Some("share_busway") | Some("shared_busway") => {
            attrs.set_road_type(is_opposite(way), RoadType::BusBicycle)
        }

        Some("share") | Some("shared") | Some("share_lane") | Some("shared_lane") => {
            attrs.set_road_type(is_opposite(way), RoadType::MotorBicycle)
        }

        Some("track") => infra_direction(way, attrs, RoadType::MotorBicycleTrack),
        Some("lane") => infra_direction(way, attrs, RoadType::MotorBicycleLane),

        Some("opposite_track") => attrs.set_road_type(true, RoadType::MotorBicycleTrack),
        Some("opposite_lane") => attrs.set_road_type(true, RoadType::MotorBicycleLane),

        Some("no") => no_infra(way, attrs),

        // Unrecognized values leave both directions unset.
        _ => {}
    }
}

fn cycleway_both(way: &Way, attrs: &mut EdgeAttributes) {
    match way.get_tag("cycleway:both") {
        Some("track") => set_both(attrs, RoadType::MotorBicycleTrack),
        Some("lane") => set_both(attrs, RoadType::MotorBicycleLane),
        Some("no") => no_infra(way, attrs),
        _ => {}
    }
}

/// An infrastructure value of a single `cycleway:left`/`cycleway:right` tag:
/// the resulting road type, and whether the value carries an `opposite_` prefix
/// (reversing the side's natural direction).
fn side_road_type(value: Option<&str>) -> Option<(RoadType, bool)> {
    match value {
        Some("track") => Some((RoadType::MotorBicycleTrack, false)),
        Some("lane") => Some((RoadType::MotorBicycleLane, false)),
        Some("opposite_track") => Some((RoadType::MotorBicycleTrack, true)),
        Some("opposite_lane") => Some((RoadType::MotorBicycleLane, true)),
        _ => None,
    }
}

fn cycleway_sides(way: &Way, attrs: &mut EdgeAttributes) {
    // An explicit cycleway:left=no falls straight through to the no-infrastructure
    // case and discards any right-side value. Known limitation of the rule order.
    if way.has_tag("cycleway:left", "no") {
        return no_infra(way, attrs);
    }

    let left = side_road_type(way.get_tag(Side::Left.key()));
    let right = side_road_type(way.get_tag(Side::Right.key()));
    if left.is_none() && right.is_none() {
        return no_infra(way, attrs);
    }

    if let Some(assignment) = left {
        apply_side(way, attrs, Side::Left, assignment, right.is_some());
    }
    if let Some(assignment) = right {
        apply_side(way, attrs, Side::Right, assignment, left.is_some());
    }
}

fn apply_side(
    way: &Way,
    attrs: &mut EdgeAttributes,
    side: Side,
    (road_type, opposite): (RoadType, bool),
    other_side_tagged: bool,
) {
    let natural = side.natural_reverse();

    // opposite_track/opposite_lane always serve the reverse of the side's
    // natural direction, regardless of any cycleway:<side>:oneway tag.
    if opposite {
        attrs.set_road_type(!natural, road_type);
        return;
    }

    match way.get_tag(side.oneway_key()) {
        Some("yes") => attrs.set_road_type(natural, road_type),
        Some("-1") => attrs.set_road_type(!natural, road_type),
        Some("no") => set_both(attrs, road_type),
        _ => {
            // Without an explicit oneway the side covers both directions,
            // unless the other side carries its own infrastructure value:
            // then each side keeps only its natural direction.
            if other_side_tagged {
                attrs.set_road_type(natural, road_type);
            } else {
                set_both(attrs, road_type);
            }
        }
    }
}
