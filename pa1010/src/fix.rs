use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::constants::MAX_COORDINATE_LEN;

/// Coordinate in the receiver's `(d)ddmm.mmmm` text form, kept verbatim.
pub type CoordinateText = heapless::String<MAX_COORDINATE_LEN>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LatitudeHemisphere {
    #[default]
    North,
    South,
}

impl LatitudeHemisphere {
    pub(crate) fn from_field(field: &str) -> Option<Self> {
        match field {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }

    const fn sign(self) -> f64 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LongitudeHemisphere {
    #[default]
    East,
    West,
}

impl LongitudeHemisphere {
    pub(crate) fn from_field(field: &str) -> Option<Self> {
        match field {
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    const fn sign(self) -> f64 {
        match self {
            Self::East => 1.0,
            Self::West => -1.0,
        }
    }
}

/// Last known state of the receiver, updated in place by the decoder.
///
/// Time, date, position, speed, heading and `is_valid` always come from the same
/// RMC sentence. Altitude and satellite count come from GGA sentences and may
/// lead or lag the rest. When the fix is lost only `is_valid` drops; every other
/// field keeps its last observed value.
///
/// Before the first RMC the text coordinates are empty and the numbers are zero.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixRecord {
    pub is_valid: bool,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub day: u8,
    pub month: u8,
    /// Two digit year plus the configured century, see `ReceiverConfig::century`.
    pub year: u16,
    pub latitude: CoordinateText,
    pub latitude_hemisphere: LatitudeHemisphere,
    pub longitude: CoordinateText,
    pub longitude_hemisphere: LongitudeHemisphere,
    pub altitude_meters: f64,
    pub satellites_tracked: u32,
    pub speed_knots: f64,
    pub heading_degrees: f64,
}

impl FixRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an RMC sentence has ever populated the position fields.
    pub fn has_position(&self) -> bool {
        !self.latitude.is_empty() && !self.longitude.is_empty()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())
    }

    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_milli_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
            self.millisecond.into(),
        )
    }

    /// UTC timestamp of the last RMC sentence, `None` before the first one.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Some(NaiveDateTime::new(self.date()?, self.time()?).and_utc())
    }

    /// Whole degrees and decimal minutes of the latitude text (`ddmm.mmmm`).
    pub fn latitude_dm(&self) -> Option<(u16, f64)> {
        split_degrees_minutes(&self.latitude, 2)
    }

    /// Whole degrees and decimal minutes of the longitude text (`dddmm.mmmm`).
    pub fn longitude_dm(&self) -> Option<(u16, f64)> {
        split_degrees_minutes(&self.longitude, 3)
    }

    /// Signed decimal degrees, south negative.
    pub fn latitude_degrees(&self) -> Option<f64> {
        let (deg, min) = self.latitude_dm()?;
        Some(self.latitude_hemisphere.sign() * (f64::from(deg) + min / 60.0))
    }

    /// Signed decimal degrees, west negative.
    pub fn longitude_degrees(&self) -> Option<f64> {
        let (deg, min) = self.longitude_dm()?;
        Some(self.longitude_hemisphere.sign() * (f64::from(deg) + min / 60.0))
    }
}

fn split_degrees_minutes(text: &str, degree_digits: usize) -> Option<(u16, f64)> {
    if !text.is_char_boundary(degree_digits) || text.len() <= degree_digits {
        return None;
    }
    let (deg, min) = text.split_at(degree_digits);
    Some((deg.parse().ok()?, min.parse().ok()?))
}
