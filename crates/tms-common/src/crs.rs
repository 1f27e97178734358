//! Coordinate Reference System identifiers.
//!
//! A [`Crs`] is only an identity tag. Two CRS values are the same when their
//! URIs are byte-for-byte equal; nothing in this workspace reprojects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const OGC_CRS84_URI: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";
const EPSG_URI_PREFIX: &str = "http://www.opengis.net/def/crs/EPSG/0/";

/// A CRS identified by its OGC URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs(String);

impl Crs {
    /// Wrap a CRS URI as-is.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// OGC CRS84 (WGS84 with lon/lat axis order).
    pub fn crs84() -> Self {
        Self(OGC_CRS84_URI.to_string())
    }

    /// An EPSG code in OGC URI form.
    pub fn epsg(code: u32) -> Self {
        Self(format!("{}{}", EPSG_URI_PREFIX, code))
    }

    /// Parse a CRS string, normalizing well-known short forms to their URI.
    ///
    /// Accepts formats like:
    /// - "EPSG:3857" / "epsg:3857"
    /// - "CRS:84" / "OGC:CRS84"
    /// - any URI, kept verbatim
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "CRS:84" | "OGC:CRS84" | "CRS84" => return Self::crs84(),
            _ => {}
        }
        if let Some(code) = upper.strip_prefix("EPSG:") {
            if let Ok(code) = code.parse::<u32>() {
                return Self::epsg(code);
            }
        }
        Self(s.trim().to_string())
    }

    /// The URI of this CRS.
    pub fn uri(&self) -> &str {
        &self.0
    }

    /// EPSG code, if this CRS is an EPSG URI.
    pub fn epsg_code(&self) -> Option<u32> {
        self.0.strip_prefix(EPSG_URI_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The TMS 2.0 encoding allows the CRS as a bare URI or as an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum CrsRepr {
    Uri(String),
    Object { uri: String },
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Crs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match CrsRepr::deserialize(deserializer)? {
            CrsRepr::Uri(uri) | CrsRepr::Object { uri } => Ok(Crs(uri)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(Crs::parse("EPSG:3857"), Crs::epsg(3857));
        assert_eq!(Crs::parse("epsg:4326"), Crs::epsg(4326));
        assert_eq!(Crs::parse("CRS:84"), Crs::crs84());
        assert_eq!(
            Crs::parse("http://www.opengis.net/def/crs/EPSG/0/2056"),
            Crs::epsg(2056)
        );
    }

    #[test]
    fn test_epsg_code() {
        assert_eq!(Crs::epsg(3857).epsg_code(), Some(3857));
        assert_eq!(Crs::crs84().epsg_code(), None);
    }

    #[test]
    fn test_crs84_is_not_epsg_4326() {
        // Identity only: axis order differs, so the tags differ.
        assert_ne!(Crs::crs84(), Crs::epsg(4326));
    }

    #[test]
    fn test_deserialize_crs_union() {
        let a: Crs = serde_json::from_str(r#""http://www.opengis.net/def/crs/EPSG/0/3857""#).unwrap();
        let b: Crs =
            serde_json::from_str(r#"{"uri": "http://www.opengis.net/def/crs/EPSG/0/3857"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), r#""http://www.opengis.net/def/crs/EPSG/0/3857""#);
    }
}
