//! MAC address handling.
//!
//! The controller reports MACs lower-case and colon separated, so configuration
//! has to use the same form or every plan would show a diff.

use std::fmt;

use tfplug::schema::{Validator, ValidatorRequest, ValidatorResponse};
use tfplug::types::Diagnostics;

const INVALID_MAC: &str = "Invalid Mac String Value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacParseError(String);

impl fmt::Display for MacParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "address {}: invalid MAC address", self.0)
    }
}

impl std::error::Error for MacParseError {}

/// Parses an EUI-48, EUI-64 or 20-octet InfiniBand hardware address.
///
/// Accepted forms:
///   00:00:5e:00:53:01
///   00-00-5e-00-53-01
///   0000.5e00.5301
pub fn parse_mac(s: &str) -> Result<Vec<u8>, MacParseError> {
    let err = || MacParseError(s.to_string());
    let bytes = s.as_bytes();
    if bytes.len() < 14 {
        return Err(err());
    }

    if bytes[2] == b':' || bytes[2] == b'-' {
        if (bytes.len() + 1) % 3 != 0 {
            return Err(err());
        }
        let octets = (bytes.len() + 1) / 3;
        if !matches!(octets, 6 | 8 | 20) {
            return Err(err());
        }
        let separator = bytes[2];
        let mut out = Vec::with_capacity(octets);
        for i in 0..octets {
            let start = i * 3;
            if i > 0 && bytes[start - 1] != separator {
                return Err(err());
            }
            out.push(hex_byte(bytes[start], bytes[start + 1]).ok_or_else(err)?);
        }
        return Ok(out);
    }

    if bytes[4] == b'.' {
        if (bytes.len() + 1) % 5 != 0 {
            return Err(err());
        }
        let octets = 2 * (bytes.len() + 1) / 5;
        if !matches!(octets, 6 | 8 | 20) {
            return Err(err());
        }
        let mut out = Vec::with_capacity(octets);
        for group in 0..octets / 2 {
            let start = group * 5;
            if group > 0 && bytes[start - 1] != b'.' {
                return Err(err());
            }
            out.push(hex_byte(bytes[start], bytes[start + 1]).ok_or_else(err)?);
            out.push(hex_byte(bytes[start + 2], bytes[start + 3]).ok_or_else(err)?);
        }
        return Ok(out);
    }

    Err(err())
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    let digit = |c: u8| (c as char).to_digit(16);
    Some((digit(hi)? * 16 + digit(lo)?) as u8)
}

/// Lower-case with dashes turned into colons
pub fn canonical_mac(s: &str) -> String {
    s.to_lowercase().replace('-', ":")
}

/// Requires a canonical, parseable MAC. Both problems are reported when both apply.
pub struct MacValidator;

impl Validator for MacValidator {
    fn description(&self) -> String {
        "value must be a lower-case, colon separated MAC address".to_string()
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        let Some(raw) = request.config_value.as_str() else {
            return ValidatorResponse { diagnostics };
        };

        let sanitised = canonical_mac(raw);
        if sanitised != raw {
            diagnostics.add_attribute_error(
                request.path.clone(),
                INVALID_MAC,
                format!(
                    "A string value that contains upper case characters or dashes was provided.\n\nGiven Value: {}\nExpected Value: {}\n",
                    raw, sanitised
                ),
            );
        }

        if let Err(e) = parse_mac(raw) {
            diagnostics.add_attribute_error(
                request.path.clone(),
                INVALID_MAC,
                format!(
                    "A string value was provided that is not valid Mac string format.\n\nGiven Value: {}\nError: {}",
                    raw, e
                ),
            );
        }

        ValidatorResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]
    use super::*;
    use tfplug::path::PathExpression;
    use tfplug::types::{AttributePath, Dynamic, DynamicValue};

    fn validate(value: Dynamic) -> Diagnostics {
        let path = AttributePath::new("mac");
        let expression = PathExpression::from_path(&path);
        let config = DynamicValue::object();
        MacValidator
            .validate(ValidatorRequest {
                config: &config,
                config_value: &value,
                path: &path,
                path_expression: &expression,
            })
            .diagnostics
    }

    #[test]
    fn parses_all_go_forms() {
        assert_eq!(
            parse_mac("00:00:5e:00:53:01").unwrap(),
            vec![0x00, 0x00, 0x5e, 0x00, 0x53, 0x01]
        );
        assert_eq!(parse_mac("00-00-5E-00-53-01").unwrap().len(), 6);
        assert_eq!(parse_mac("0000.5e00.5301").unwrap().len(), 6);
        assert_eq!(parse_mac("02:00:5e:10:00:00:00:01").unwrap().len(), 8);
        assert_eq!(parse_mac("0200.5e10.0000.0001").unwrap().len(), 8);
        assert_eq!(
            parse_mac("00:00:00:00:fe:80:00:00:00:00:00:00:02:00:5e:10:00:00:00:01")
                .unwrap()
                .len(),
            20
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "not-a-mac",
            "00:00:5e:00:53",
            "00:00:5e:00:53:0g",
            "00:00-5e:00:53:01",
            "00:00:5e:00:53:01:02",
            "0000.5e00.530",
            "",
        ] {
            assert!(parse_mac(bad).is_err(), "{} should not parse", bad);
        }
        assert_eq!(
            parse_mac("not-a-mac").unwrap_err().to_string(),
            "address not-a-mac: invalid MAC address"
        );
    }

    #[test]
    fn canonical_mac_is_accepted() {
        assert!(validate(Dynamic::String("aa:bb:cc:dd:ee:ff".to_string())).is_empty());
    }

    #[test]
    fn upper_case_and_dashes_are_rejected() {
        let upper = validate(Dynamic::String("AA:BB:CC:DD:EE:FF".to_string()));
        assert_eq!(upper.errors.len(), 1);
        assert_eq!(upper.errors[0].summary, INVALID_MAC);
        assert!(upper.errors[0].detail.contains("Expected Value: aa:bb:cc:dd:ee:ff"));

        let dashed = validate(Dynamic::String("aa-bb-cc-dd-ee-ff".to_string()));
        assert_eq!(dashed.errors.len(), 1);
        assert_eq!(
            dashed.errors[0].attribute,
            Some(AttributePath::new("mac"))
        );
    }

    #[test]
    fn unparseable_value_is_rejected() {
        let diags = validate(Dynamic::String("not-a-mac".to_string()));
        // lower-case but dashed, and unparseable
        assert_eq!(diags.errors.len(), 2);
        assert!(diags.errors[1].detail.contains("invalid MAC address"));

        let diags = validate(Dynamic::String("zz:zz".to_string()));
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn null_and_unknown_are_skipped() {
        assert!(validate(Dynamic::Null).is_empty());
        assert!(validate(Dynamic::Unknown).is_empty());
    }
}
