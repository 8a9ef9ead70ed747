// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::priority::RouteNetwork;
use crate::way::Way;

mod xml;

/// Format of the input OSM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Guess the format from the file extension. Only meaningful for
    /// [read_from_file]; the IO and buffer entry points fall back to
    /// plain XML.
    Unknown,

    /// Uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::XmlGz,
            Some("bz2") => Self::XmlBz2,
            _ => Self::Xml,
        }
    }
}

/// Error conditions which may occur while extracting features from an OSM file.
///
/// Malformed individual elements are not errors: they are skipped with a
/// warning, and extraction continues.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("i/o: {0}")]
    Io(#[from] io::Error),

    #[error("malformed xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// The classification-relevant content of an OSM file: all tagged ways, plus
/// each way's strongest bicycle route-network membership derived from
/// `type=route` relations.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extract {
    pub ways: Vec<Way>,
    networks: HashMap<i64, RouteNetwork>,
}

impl Extract {
    /// The route-network membership of a way, if it belongs to any
    /// bicycle route relation.
    pub fn network_of(&self, way_id: i64) -> Option<RouteNetwork> {
        self.networks.get(&way_id).copied()
    }

    fn add_feature(&mut self, f: xml::Feature) {
        match f {
            xml::Feature::Way(w) => self.ways.push(w),
            xml::Feature::Relation(r) => self.add_relation(r),
        }
    }

    fn add_relation(&mut self, relation: xml::Relation) {
        if !relation.tags.get("type").is_some_and(|v| v == "route")
            || !relation.tags.get("route").is_some_and(|v| v == "bicycle")
        {
            return;
        }

        let network = match relation
            .tags
            .get("network")
            .and_then(|v| RouteNetwork::from_network_tag(v))
        {
            Some(network) => network,
            None => {
                log::debug!("ignoring bicycle route relation {} without a known network", relation.id);
                return;
            }
        };

        // Ways on several routes keep the highest-ranked network.
        for way_id in relation.way_members {
            self.networks
                .entry(way_id)
                .and_modify(|n| *n = (*n).max(network))
                .or_insert(network);
        }
    }
}

fn collect_features<I>(features: I) -> Result<Extract, ReadError>
where
    I: Iterator<Item = Result<xml::Feature, quick_xml::Error>>,
{
    let mut extract = Extract::default();
    for feature in features {
        extract.add_feature(feature?);
    }
    log::debug!(
        "extracted {} ways and {} route memberships",
        extract.ways.len(),
        extract.networks.len(),
    );
    Ok(extract)
}

/// Extracts ways and route memberships from a reader with OSM data.
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn read_from_io<R: io::Read>(format: FileFormat, reader: R) -> Result<Extract, ReadError> {
    match format {
        FileFormat::Unknown | FileFormat::Xml => {
            let b = io::BufReader::new(reader);
            collect_features(xml::Reader::from_io(b))
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            let b = io::BufReader::new(d);
            collect_features(xml::Reader::from_io(b))
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            let b = io::BufReader::new(d);
            collect_features(xml::Reader::from_io(b))
        }
    }
}

/// Extracts ways and route memberships from an OSM file at the provided path.
/// [FileFormat::Unknown] is resolved from the file extension.
pub fn read_from_file<P: AsRef<Path>>(format: FileFormat, path: P) -> Result<Extract, ReadError> {
    let format = match format {
        FileFormat::Unknown => FileFormat::from_path(path.as_ref()),
        other => other,
    };
    let f = File::open(path)?;
    read_from_io(format, f)
}

/// Extracts ways and route memberships from a static buffer with OSM data.
pub fn read_from_buffer(format: FileFormat, data: &[u8]) -> Result<Extract, ReadError> {
    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        collect_features(xml::Reader::from_buffer(data))
    } else {
        // Wrap the buffer in a cursor and use the IO path
        let cursor = io::Cursor::new(data);
        read_from_io(format, cursor)
    }
}
