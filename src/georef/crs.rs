//! Coordinate Reference System identifiers
//!
//! Only EPSG-coded systems are representable; that is what GeoTIFF keys
//! carry for the rasters this tool handles.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

lazy_static! {
    static ref EPSG_CODE: Regex = Regex::new(r"(?i)^\s*(?:\+init=)?epsg:(\d+)\s*$").unwrap();
    static ref WKT_AUTHORITY: Regex =
        Regex::new(r#"(?:AUTHORITY|ID)\[\s*"EPSG"\s*,\s*"?(\d+)"?\s*\]"#).unwrap();
}

/// Geographic 2D systems allocated outside 4000-4999, sorted
const GEOGRAPHIC_OUTSIDE_BLOCK: [u32; 52] = [
    3824, 3889, 3906, 5013, 5132, 5228, 5229, 5233, 5252, 5264,
    5324, 5340, 5354, 5360, 5365, 5371, 5373, 5381, 5393, 5489,
    5524, 5527, 5546, 5561, 5593, 5681, 5886, 6135, 6207, 6311,
    6318, 6322, 6325, 6365, 6668, 6706, 6783, 6881, 6883, 6892,
    6894, 6980, 6983, 6987, 6990, 7844, 8086, 8545, 8860, 9057,
    9777, 9782,
];

/// Projected systems inside 4000-4999, as inclusive code ranges
const PROJECTED_INSIDE_BLOCK: [(u32, u32); 29] = [
    (4026, 4026), (4037, 4038), (4048, 4051), (4056, 4063), (4071, 4071),
    (4082, 4083), (4087, 4088), (4093, 4096), (4217, 4217), (4390, 4413),
    (4418, 4434), (4437, 4437), (4455, 4457), (4462, 4462), (4467, 4467),
    (4471, 4471), (4474, 4474), (4484, 4489), (4491, 4554), (4559, 4559),
    (4568, 4589), (4647, 4647), (4652, 4656), (4766, 4800), (4812, 4812),
    (4822, 4822), (4826, 4826), (4839, 4839), (4855, 4880),
];

/// Coordinate reference system, normalised through `Crs::from_epsg`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CrsDefinition", into = "String")]
pub enum Crs {
    /// WGS 84 (EPSG:4326)
    Wgs84,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// WGS 84 / UTM zone (EPSG:326xx north, 327xx south)
    Utm { zone: u8, north: bool },
    /// Any other EPSG code
    Epsg(u32),
}

impl Crs {
    pub fn from_epsg(code: u32) -> Self {
        match code {
            4326 => Crs::Wgs84,
            3857 => Crs::WebMercator,
            32601..=32660 => Crs::Utm { zone: (code - 32600) as u8, north: true },
            32701..=32760 => Crs::Utm { zone: (code - 32700) as u8, north: false },
            _ => Crs::Epsg(code),
        }
    }

    pub fn epsg_code(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::Utm { zone, north: true } => 32600 + *zone as u32,
            Crs::Utm { zone, north: false } => 32700 + *zone as u32,
            Crs::Epsg(code) => *code,
        }
    }

    /// Geographic (lat/lon) as opposed to projected
    ///
    /// Most geographic 2D systems sit in the EPSG 4000-4999 block, but the
    /// block also holds projected systems and newer datums were allocated
    /// outside it. Both exception lists are checked before the block rule.
    pub fn is_geographic(&self) -> bool {
        let code = self.epsg_code();
        if GEOGRAPHIC_OUTSIDE_BLOCK.binary_search(&code).is_ok() {
            return true;
        }
        if PROJECTED_INSIDE_BLOCK.iter().any(|&(first, last)| (first..=last).contains(&code)) {
            return false;
        }
        (4000..5000).contains(&code)
    }

    pub fn description(&self) -> String {
        match self {
            Crs::Wgs84 => "WGS 84 (EPSG:4326)".to_string(),
            Crs::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            Crs::Utm { zone, north } => format!(
                "UTM Zone {}{} (EPSG:{})", zone, if *north { "N" } else { "S" }, self.epsg_code()),
            Crs::Epsg(code) => format!("EPSG:{}", code),
        }
    }

    /// Extracts the code of the outermost EPSG authority from WKT
    ///
    /// WKT nests the authority of every component; the root's comes last.
    fn from_wkt(wkt: &str) -> Option<Self> {
        WKT_AUTHORITY.captures_iter(wkt)
            .last()
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .map(Self::from_epsg)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg_code())
    }
}

impl FromStr for Crs {
    type Err = ConvertError;

    /// Accepts `EPSG:<code>` in any case, `+init=epsg:<code>`, a bare code,
    /// or WKT carrying an EPSG authority
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(caps) = EPSG_CODE.captures(s) {
            return caps[1].parse::<u32>()
                .map(Self::from_epsg)
                .map_err(|_| ConvertError::InvalidCrs(format!("invalid EPSG code in '{}'", s)));
        }
        if let Ok(code) = s.trim().parse::<u32>() {
            return Ok(Self::from_epsg(code));
        }
        Self::from_wkt(s).ok_or_else(|| ConvertError::InvalidCrs(format!("unsupported CRS definition '{}'", s)))
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

/// Shapes a CRS may take in sidecar JSON
#[derive(Deserialize)]
#[serde(untagged)]
enum CrsDefinition {
    Code(u32),
    Text(String),
    Dict(HashMap<String, serde_json::Value>),
}

impl TryFrom<CrsDefinition> for Crs {
    type Error = String;

    fn try_from(definition: CrsDefinition) -> Result<Self, Self::Error> {
        match definition {
            CrsDefinition::Code(code) => Ok(Crs::from_epsg(code)),
            CrsDefinition::Text(text) => text.parse().map_err(|e: ConvertError| e.to_string()),
            CrsDefinition::Dict(dict) => match dict.get("init").and_then(|v| v.as_str()) {
                Some(init) => init.parse().map_err(|e: ConvertError| e.to_string()),
                None => Err(format!("CRS object without an 'init' entry: {:?}", dict.keys().collect::<Vec<_>>())),
            },
        }
    }
}
