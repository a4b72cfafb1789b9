//! Point Geometry Codec
//!
//! Reads and writes the single-point subset of well-known text:
//!
//! ```text
//! [SRID=<int>;] POINT ( <lon> <lat> )
//! ```
//!
//! The tag is case-insensitive and whitespace around tokens is free-form.
//! Every other well-known tag is recognised only to report it as unsupported.

use crate::domain::value_objects::Coordinates;
use crate::error::GeometryError;

const POINT_TAG: &str = "POINT";

/// Well-known geometry tags other than `POINT`
const OTHER_TAGS: &[&str] = &[
    "MULTIPOINT",
    "LINESTRING",
    "MULTILINESTRING",
    "POLYGON",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "CIRCULARSTRING",
    "COMPOUNDCURVE",
    "CURVEPOLYGON",
    "MULTICURVE",
    "MULTISURFACE",
    "POLYHEDRALSURFACE",
    "TRIANGLE",
    "TIN",
];

/// Stateless point codec
pub struct GeometryCodec;

impl GeometryCodec {
    /// Parse point text into validated coordinates
    pub fn decode(text: &str) -> Result<Coordinates, GeometryError> {
        let text = strip_srid(text.trim())?;
        if text.is_empty() {
            return Err(malformed("geometry text is empty"));
        }

        let tag_end = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (tag, rest) = text.split_at(tag_end);
        if tag.is_empty() {
            return Err(malformed("missing geometry type tag"));
        }

        let tag = tag.to_ascii_uppercase();
        if tag != POINT_TAG {
            return Err(if OTHER_TAGS.contains(&tag.as_str()) {
                GeometryError::Unsupported(tag)
            } else {
                malformed(&format!("unknown geometry type `{}`", tag))
            });
        }

        let rest = rest.trim_start();
        if rest.eq_ignore_ascii_case("EMPTY") {
            return Err(malformed("POINT EMPTY has no location"));
        }

        let body = rest
            .strip_prefix('(')
            .ok_or_else(|| malformed("expected `(` after POINT"))?
            .strip_suffix(')')
            .ok_or_else(|| malformed("expected `)` at end of POINT"))?;

        let mut tokens = body.split_whitespace();
        let (Some(lon), Some(lat), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(malformed("POINT must hold exactly two numbers"));
        };

        Coordinates::new(parse_number(lon)?, parse_number(lat)?)
    }

    /// Render coordinates as `POINT (<lon> <lat>)`
    ///
    /// Uses the shortest representation that parses back to the same value.
    pub fn encode(location: Coordinates) -> String {
        format!("{} ({} {})", POINT_TAG, location.lon(), location.lat())
    }

    /// Encode a raw pair, validating it first
    pub fn encode_pair(lon: f64, lat: f64) -> Result<String, GeometryError> {
        Coordinates::new(lon, lat).map(Self::encode)
    }
}

fn strip_srid(text: &str) -> Result<&str, GeometryError> {
    let has_srid = text
        .get(..5)
        .is_some_and(|p| p.eq_ignore_ascii_case("SRID="));
    if !has_srid {
        return Ok(text);
    }
    let (srid, rest) = text[5..]
        .split_once(';')
        .ok_or_else(|| malformed("SRID prefix must end with `;`"))?;
    srid.trim()
        .parse::<u32>()
        .map_err(|_| malformed(&format!("invalid SRID `{}`", srid)))?;
    Ok(rest.trim_start())
}

fn parse_number(token: &str) -> Result<f64, GeometryError> {
    let value: f64 = token
        .parse()
        .map_err(|_| malformed(&format!("`{}` is not a number", token)))?;
    if !value.is_finite() {
        return Err(malformed(&format!("`{}` is not finite", token)));
    }
    Ok(value)
}

fn malformed(reason: &str) -> GeometryError {
    GeometryError::Malformed(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_pair(text: &str) -> (f64, f64) {
        GeometryCodec::decode(text).unwrap().pair()
    }

    #[test]
    fn test_decode_basic() {
        assert_eq!(decode_pair("POINT (-73.9955 40.7354)"), (-73.9955, 40.7354));
        assert_eq!(decode_pair("point(-74.006 40.7128)"), (-74.006, 40.7128));
        assert_eq!(decode_pair("  POINT  (  1.5\t-2  )  "), (1.5, -2.0));
        assert_eq!(decode_pair("POINT (1e-3 -4E1)"), (0.001, -40.0));
    }

    #[test]
    fn test_decode_backend_output() {
        let (lon, lat) = decode_pair("POINT (-73.99549999999999 40.735400000000006)");
        assert!((lon - -73.9955).abs() < 1e-9);
        assert!((lat - 40.7354).abs() < 1e-9);
    }

    #[test]
    fn test_decode_srid_prefix() {
        assert_eq!(decode_pair("SRID=4326;POINT (10 20)"), (10.0, 20.0));
        assert!(GeometryCodec::decode("SRID=abc;POINT (10 20)").is_err());
        assert!(GeometryCodec::decode("SRID=4326 POINT (10 20)").is_err());
    }

    #[test]
    fn test_decode_malformed() {
        let cases = [
            "",
            "   ",
            "POINT",
            "POINT -73 40",
            "POINT (-73 40",
            "POINT -73 40)",
            "POINT (abc 40)",
            "POINT (-73)",
            "POINT (-73 40 12)",
            "POINT (-73, 40)",
            "POINT (NaN 40)",
            "POINT (inf 40)",
            "POINT (200 40)",
            "POINT (-73 95)",
            "POINT (1 2) trailing",
            "POINT (1 2)(3 4)",
            "POINT EMPTY",
            "POINT Z (1 2 3)",
            "(1 2)",
            "CIRCLE (1 2)",
        ];
        for text in cases {
            assert!(
                matches!(GeometryCodec::decode(text), Err(GeometryError::Malformed(_))),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_decode_unsupported() {
        for text in [
            "MULTIPOINT ((1 2), (3 4))",
            "LINESTRING (0 0, 1 1)",
            "polygon ((0 0, 1 0, 1 1, 0 0))",
            "MULTIPOLYGON EMPTY",
        ] {
            assert!(
                matches!(GeometryCodec::decode(text), Err(GeometryError::Unsupported(_))),
                "{text:?} should be unsupported"
            );
        }
    }

    #[test]
    fn test_encode() {
        let c = Coordinates::new(-73.9955, 40.7354).unwrap();
        assert_eq!(GeometryCodec::encode(c), "POINT (-73.9955 40.7354)");
        assert_eq!(GeometryCodec::encode_pair(0.0, 0.0).unwrap(), "POINT (0 0)");
        assert!(GeometryCodec::encode_pair(0.0, 91.0).is_err());
    }

    #[test]
    fn test_round_trip_awkward_values() {
        let values = [
            (-73.99549999999999, 40.735400000000006),
            (180.0, -90.0),
            (-180.0, 90.0),
            (1e-300, -1e-300),
            (0.1 + 0.2, 1.0 / 3.0),
            (f64::EPSILON, -f64::MIN_POSITIVE),
            (123.456789012345, -12.000000000001),
        ];
        for (lon, lat) in values {
            let text = GeometryCodec::encode_pair(lon, lat).unwrap();
            assert_eq!(decode_pair(&text), (lon, lat), "{text}");
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_in_range(lon in -180.0f64..=180.0, lat in -90.0f64..=90.0) {
            let c = Coordinates::new(lon, lat).unwrap();
            let text = GeometryCodec::encode(c);
            prop_assert_eq!(GeometryCodec::decode(&text).unwrap(), c);
        }

        #[test]
        fn prop_round_trip_any_case_and_spacing(
            lon in -180.0f64..=180.0,
            lat in -90.0f64..=90.0,
            tag in "[Pp][Oo][Ii][Nn][Tt]",
            pad in "[ \t]{0,3}",
        ) {
            let text = format!("{pad}{tag}{pad}({pad}{lon} {pad}{lat}{pad}){pad}");
            prop_assert_eq!(GeometryCodec::decode(&text).unwrap().pair(), (lon, lat));
        }

        #[test]
        fn prop_arbitrary_text_never_panics(text in any::<String>()) {
            if let Ok(c) = GeometryCodec::decode(&text) {
                prop_assert!(c.lon().is_finite() && (-180.0..=180.0).contains(&c.lon()));
                prop_assert!(c.lat().is_finite() && (-90.0..=90.0).contains(&c.lat()));
            }
        }

        #[test]
        fn prop_point_shaped_garbage_is_malformed(body in "[^()]{0,24}") {
            let text = format!("POINT ({})", body);
            match GeometryCodec::decode(&text) {
                Ok(c) => {
                    let mut tokens = body.split_whitespace();
                    prop_assert_eq!(tokens.next().map(str::parse::<f64>), Some(Ok(c.lon())));
                }
                Err(e) => prop_assert!(matches!(e, GeometryError::Malformed(_))),
            }
        }
    }
}
