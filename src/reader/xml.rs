// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::str::from_utf8;

use crate::way::Way;
use std::io;

/// Represents an [OSM relation](https://wiki.openstreetmap.org/wiki/Relation),
/// reduced to its way members and tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Relation {
    pub id: i64,
    pub way_members: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// Union over the OSM features relevant for classification.
/// Nodes carry no tags of interest and are skipped at the parser level.
#[derive(Debug, Clone)]
pub(super) enum Feature {
    Way(Way),
    Relation(Relation),
}

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<quick_xml::events::Event<'a>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> IoParser<R> {
    #[inline]
    fn new(reader: R) -> Self {
        Self(quick_xml::Reader::from_reader(reader), Vec::default())
    }
}

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<quick_xml::events::Event<'a>> {
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> BufParser<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Self(quick_xml::Reader::from_reader(data))
    }
}

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event<'b>(&'b mut self) -> quick_xml::Result<quick_xml::events::Event<'b>> {
        self.0.read_event()
    }
}

/// Reader streams ways and relations from an OSM XML file.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<P: Parser> Reader<P> {
    #[inline]
    fn new(parser: P) -> Self {
        Self { parser, eof: false }
    }
}

impl<P: Parser> Iterator for Reader<P> {
    type Item = Result<Feature, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut f: Option<Feature> = None;

        while !self.eof {
            let event = match self.parser.read_event() {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };

            match event {
                quick_xml::events::Event::Empty(start) => match start.local_name().as_ref() {
                    // "way" and "relation" can't be self-closing; nodes are skipped
                    b"tag" => {
                        if let Some(tags) = feature_tags(&mut f) {
                            if let Some((k, v)) = parse_tag(start) {
                                tags.insert(k, v);
                            }
                        }
                    }
                    b"member" => {
                        if let Some(members) = feature_way_members(&mut f) {
                            if let Some(ref_) = parse_way_member(start) {
                                members.push(ref_);
                            }
                        }
                    }
                    _ => {}
                },

                quick_xml::events::Event::Start(start) => match start.local_name().as_ref() {
                    b"way" => f = parse_way(start).map(Feature::Way),
                    b"relation" => f = parse_relation(start).map(Feature::Relation),
                    // "tag" and "member" must be self-closing
                    _ => {}
                },

                quick_xml::events::Event::End(end) => match end.local_name().as_ref() {
                    b"way" | b"relation" => {
                        if let Some(f) = f.take() {
                            return Some(Ok(f));
                        }
                    }
                    _ => {}
                },

                quick_xml::events::Event::Eof => {
                    self.eof = true;
                }

                _ => {}
            }
        }

        return f.map(Ok);
    }
}

impl<'a> Reader<BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self::new(BufParser::new(data))
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R) -> Self {
        Self::new(IoParser::new(reader))
    }
}

fn parse_way(start: quick_xml::events::BytesStart<'_>) -> Option<Way> {
    let mut id: i64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"id" {
            id = from_utf8(&attr.value).ok()?.parse().ok()?;
        }
    }

    if id != 0 {
        Some(Way {
            id,
            tags: HashMap::default(),
        })
    } else {
        log::warn!("skipping way without a valid id");
        None
    }
}

fn parse_relation(start: quick_xml::events::BytesStart<'_>) -> Option<Relation> {
    let mut id: i64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"id" {
            id = from_utf8(&attr.value).ok()?.parse().ok()?;
        }
    }

    if id != 0 {
        Some(Relation {
            id,
            way_members: Vec::default(),
            tags: HashMap::default(),
        })
    } else {
        log::warn!("skipping relation without a valid id");
        None
    }
}

fn parse_tag(start: quick_xml::events::BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"k" => k = from_utf8(&attr.value).ok().map(|s| s.to_string()),
            b"v" => v = from_utf8(&attr.value).ok().map(|s| s.to_string()),
            _ => {}
        }
    }

    if let Some(k) = k {
        Some((k, v.unwrap_or_default()))
    } else {
        None
    }
}

/// Parses a relation member reference, keeping way members only.
fn parse_way_member(start: quick_xml::events::BytesStart<'_>) -> Option<i64> {
    let mut is_way = false;
    let mut ref_: Option<i64> = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"type" => is_way = attr.value.as_ref() == b"way",
            b"ref" => ref_ = from_utf8(&attr.value).ok()?.parse().ok(),
            _ => {}
        }
    }

    if is_way {
        ref_
    } else {
        None
    }
}

fn feature_tags(f: &mut Option<Feature>) -> Option<&mut HashMap<String, String>> {
    match f {
        Some(Feature::Way(w)) => Some(&mut w.tags),
        Some(Feature::Relation(r)) => Some(&mut r.tags),
        None => None,
    }
}

fn feature_way_members(f: &mut Option<Feature>) -> Option<&mut Vec<i64>> {
    match f {
        Some(Feature::Relation(r)) => Some(&mut r.way_members),
        _ => None,
    }
}
