// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume type for speaker level control.
//!
//! Out-of-range levels are rejected when the value is constructed, so an
//! invalid volume can never reach the device.

use std::fmt;

use crate::error::ValueError;

/// Speaker volume as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use polycom_lib::types::Volume;
///
/// let vol = Volume::new(50).unwrap();
/// assert_eq!(vol.value(), 50);
///
/// assert_eq!(Volume::MIN.value(), 0);
/// assert_eq!(Volume::MAX.value(), 100);
///
/// // Invalid values return error
/// assert!(Volume::new(150).is_err());
/// assert!(Volume::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(u8);

impl Volume {
    /// Minimum volume (0%).
    pub const MIN: Self = Self(0);

    /// Maximum volume (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new volume value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside 0-100.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        match u8::try_from(value) {
            Ok(level) if level <= 100 => Ok(Self(level)),
            _ => Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: value,
            }),
        }
    }

    /// Creates a volume value, clamping to the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use polycom_lib::types::Volume;
    ///
    /// assert_eq!(Volume::clamped(150).value(), 100);
    /// assert_eq!(Volume::clamped(-20).value(), 0);
    /// ```
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        // Safe: clamped into 0..=100
        Self(u8::try_from(value.clamp(0, 100)).unwrap_or(100))
    }

    /// Returns the volume percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<i64> for Volume {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}
