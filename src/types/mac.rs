// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MAC address used as the stable device identifier.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A lower-cased MAC address.
///
/// Phones report their MAC in varying case and with or without separators
/// depending on firmware. The address is normalized to lower-case with the
/// separators the device used, so the same phone always maps to the same
/// identifier.
///
/// # Examples
///
/// ```
/// use polycom_lib::types::MacAddress;
///
/// let mac: MacAddress = "00:04:F2:AA:BB:CC".parse().unwrap();
/// assert_eq!(mac.as_str(), "00:04:f2:aa:bb:cc");
///
/// assert!("".parse::<MacAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.chars().filter(char::is_ascii_hexdigit).count();
        let valid_chars = trimmed
            .chars()
            .all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '-' | '.'));

        if digits != 12 || !valid_chars {
            return Err(ValueError::InvalidMacAddress(s.to_string()));
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_cases_colon_separated() {
        let mac: MacAddress = "00:04:F2:AB:CD:EF".parse().unwrap();
        assert_eq!(mac.to_string(), "00:04:f2:ab:cd:ef");
    }

    #[test]
    fn accepts_bare_hex() {
        let mac: MacAddress = "0004F2ABCDEF".parse().unwrap();
        assert_eq!(mac.as_str(), "0004f2abcdef");
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<MacAddress>().is_err());
        assert!("00:04:f2".parse::<MacAddress>().is_err());
        assert!("zz:04:f2:ab:cd:ef".parse::<MacAddress>().is_err());
    }
}
