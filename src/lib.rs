// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Cycling road-type classification and priority scoring over
//! [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Every way is assigned, independently per direction of travel, a
//! [RoadType] (the cycling context of that direction: dedicated track,
//! painted lane, shared bus lane, mixed motor traffic, ...) and a priority
//! multiplier consumed by downstream routing cost models. Both derivations
//! are pure functions of the way's tag set and a static [BikeProfile];
//! interpretation details differ per profile (e.g. [TOURING_PROFILE] vs
//! [RACING_PROFILE]).
//!
//! # Example
//!
//! ```
//! let way = velotype::Way::from_tags(
//!     42,
//!     [("highway", "residential"), ("cycleway:right", "lane")],
//! );
//!
//! let attrs = velotype::classify_and_score(&velotype::TOURING_PROFILE, &way, None);
//! assert_eq!(attrs.road_type(false), Some(velotype::RoadType::MotorBicycleLane));
//! assert_eq!(attrs.priority(false), 1.2);
//! ```

mod attrs;
mod maxspeed;
pub mod priority;
pub mod reader;
mod road_type;
mod way;

pub use attrs::EdgeAttributes;
pub use maxspeed::{max_speed, max_speed_over_directions};
pub use priority::{
    handle_way_tags, multiplicative_priority, BikeProfile, PriorityCode, RouteNetwork, Strategy,
    RACING_PROFILE, TOURING_PROFILE,
};
pub use road_type::{classify_road_type, RoadType};
pub use way::{is_ferry, Way, INTENDED_ACCESS};

/// Derives both directions' road types and priorities for a single way.
///
/// The road types are classified first and written into the returned
/// [EdgeAttributes]; the priority scorer then reads them back and fills in
/// both directions' multipliers. `network` is the way's bicycle
/// route-relation membership, if known (see
/// [reader::Extract::network_of]).
pub fn classify_and_score(
    profile: &BikeProfile,
    way: &Way,
    network: Option<RouteNetwork>,
) -> EdgeAttributes {
    let mut attrs = EdgeAttributes::default();
    classify_road_type(way, &mut attrs);
    handle_way_tags(profile, way, &mut attrs, network);
    attrs
}
