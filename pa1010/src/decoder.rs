//! Decoding of the two sentence formats the receiver is configured to emit.
//!
//! ```text
//! $GNGGA,hhmmss.sss,lat,N|S,lon,E|W,quality,sats,hdop,altitude,M,...*CS
//! $GNRMC,hhmmss.sss,A|V,lat,N|S,lon,E|W,knots,heading,ddmmyy,...*CS
//! ```
//!
//! Sentences are split on literal commas and every field is checked against a
//! fixed grammar: time and date groups are exactly two digits each, everything
//! else is variable width decimal text. A sentence is parsed completely before
//! the fix is touched, so a field error never leaves a half-applied update.

use crate::{
    constants::{NMEA_FIELD_SEPARATOR, SENTENCE_GGA, SENTENCE_RMC, TALKER_GNSS},
    error::DecodeError,
    fix::{CoordinateText, FixRecord, LatitudeHemisphere, LongitudeHemisphere},
};

/// UTC time of day as sent by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

/// UTC date with the year as sent, two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcDate {
    pub day: u8,
    pub month: u8,
    pub year_of_century: u8,
}

/// Fix quality sentence. Only satellites and altitude are applied to the fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Gga {
    pub time: UtcTime,
    pub latitude: CoordinateText,
    pub latitude_hemisphere: LatitudeHemisphere,
    pub longitude: CoordinateText,
    pub longitude_hemisphere: LongitudeHemisphere,
    pub fix_quality: u8,
    pub satellites: u32,
    pub altitude_meters: f64,
}

/// Recommended minimum time/position sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Rmc {
    pub time: UtcTime,
    pub active: bool,
    pub latitude: CoordinateText,
    pub latitude_hemisphere: LatitudeHemisphere,
    pub longitude: CoordinateText,
    pub longitude_hemisphere: LongitudeHemisphere,
    pub speed_knots: f64,
    pub heading_degrees: f64,
    pub date: UtcDate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NmeaSentence {
    Gga(Gga),
    Rmc(Rmc),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    Gga,
    Rmc,
}

impl NmeaSentence {
    pub fn kind(&self) -> SentenceKind {
        match self {
            NmeaSentence::Gga(_) => SentenceKind::Gga,
            NmeaSentence::Rmc(_) => SentenceKind::Rmc,
        }
    }
}

/// Parse one sentence, `$` included, terminator already stripped.
///
/// The fix quality sentence is tried first, then the time/position sentence.
pub fn parse_sentence(text: &str) -> Result<NmeaSentence, DecodeError> {
    let body = text
        .strip_prefix('$')
        .ok_or(DecodeError::UnknownSentence)?;
    // fields end where the checksum starts
    let body = body.split('*').next().unwrap_or(body);
    let mut split = body.split(NMEA_FIELD_SEPARATOR);
    let address = split.next().unwrap_or_default();
    let sentence_id = address
        .strip_prefix(TALKER_GNSS)
        .ok_or(DecodeError::UnknownSentence)?;

    if sentence_id == SENTENCE_GGA {
        parse_gga(Fields::new(SENTENCE_GGA, split)).map(NmeaSentence::Gga)
    } else if sentence_id == SENTENCE_RMC {
        parse_rmc(Fields::new(SENTENCE_RMC, split)).map(NmeaSentence::Rmc)
    } else {
        Err(DecodeError::UnknownSentence)
    }
}

fn parse_gga(mut f: Fields<'_>) -> Result<Gga, DecodeError> {
    let time = f.parse("time", parse_time)?;
    let latitude = f.parse("latitude", parse_coordinate)?;
    let latitude_hemisphere = f.parse("latitude_hemisphere", LatitudeHemisphere::from_field)?;
    let longitude = f.parse("longitude", parse_coordinate)?;
    let longitude_hemisphere =
        f.parse("longitude_hemisphere", LongitudeHemisphere::from_field)?;
    let fix_quality = f.parse("fix_quality", |s| match s.as_bytes() {
        [d] if d.is_ascii_digit() => Some(d - b'0'),
        _ => None,
    })?;
    let satellites = f.parse("satellites", parse_unsigned)?;
    f.parse("hdop", |s| (!s.is_empty()).then_some(()))?;
    let altitude_meters = f.parse("altitude", parse_signed_decimal)?;

    Ok(Gga {
        time,
        latitude,
        latitude_hemisphere,
        longitude,
        longitude_hemisphere,
        fix_quality,
        satellites,
        altitude_meters,
    })
}

fn parse_rmc(mut f: Fields<'_>) -> Result<Rmc, DecodeError> {
    let time = f.parse("time", parse_time)?;
    let active = f.parse("status", |s| match s {
        "A" => Some(true),
        "V" => Some(false),
        _ => None,
    })?;
    let latitude = f.parse("latitude", parse_coordinate)?;
    let latitude_hemisphere = f.parse("latitude_hemisphere", LatitudeHemisphere::from_field)?;
    let longitude = f.parse("longitude", parse_coordinate)?;
    let longitude_hemisphere =
        f.parse("longitude_hemisphere", LongitudeHemisphere::from_field)?;
    let speed_knots = f.parse("speed", parse_decimal)?;
    // an empty course, as sent while stationary, rejects the whole sentence
    let heading_degrees = f.parse("heading", parse_decimal)?;
    let date = f.parse("date", parse_date)?;

    Ok(Rmc {
        time,
        active,
        latitude,
        latitude_hemisphere,
        longitude,
        longitude_hemisphere,
        speed_knots,
        heading_degrees,
        date,
    })
}

/// Comma separated fields of one sentence, with error context.
struct Fields<'a> {
    sentence: &'static str,
    split: core::str::Split<'a, char>,
}

impl<'a> Fields<'a> {
    fn new(sentence: &'static str, split: core::str::Split<'a, char>) -> Self {
        Self { sentence, split }
    }

    fn parse<T>(
        &mut self,
        field: &'static str,
        parse: impl FnOnce(&'a str) -> Option<T>,
    ) -> Result<T, DecodeError> {
        let text = self.split.next().ok_or(DecodeError::MissingField {
            sentence: self.sentence,
            field,
        })?;
        parse(text).ok_or(DecodeError::InvalidField {
            sentence: self.sentence,
            field,
        })
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn two_digits(s: &str, at: usize) -> Option<u8> {
    match s.as_bytes().get(at..at + 2)? {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some((a - b'0') * 10 + (b - b'0')),
        _ => None,
    }
}

/// `hhmmss` with an optional fraction of any length, kept to millisecond precision.
fn parse_time(s: &str) -> Option<UtcTime> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    if whole.len() != 6 {
        return None;
    }
    let hour = two_digits(whole, 0).filter(|h| *h < 24)?;
    let minute = two_digits(whole, 2).filter(|m| *m < 60)?;
    let second = two_digits(whole, 4).filter(|s| *s < 60)?;

    let millisecond = match fraction {
        None => 0,
        Some(fraction) if all_digits(fraction) => fraction
            .bytes()
            .chain(core::iter::repeat(b'0'))
            .take(3)
            .fold(0u16, |ms, b| ms * 10 + u16::from(b - b'0')),
        Some(_) => return None,
    };

    Some(UtcTime {
        hour,
        minute,
        second,
        millisecond,
    })
}

/// `ddmmyy`, exactly six digits.
fn parse_date(s: &str) -> Option<UtcDate> {
    if s.len() != 6 {
        return None;
    }
    Some(UtcDate {
        day: two_digits(s, 0).filter(|d| (1..=31).contains(d))?,
        month: two_digits(s, 2).filter(|m| (1..=12).contains(m))?,
        year_of_century: two_digits(s, 4)?,
    })
}

/// `digits.digits`, kept as text.
fn parse_coordinate(s: &str) -> Option<CoordinateText> {
    let (deg_min, fraction) = s.split_once('.')?;
    if !all_digits(deg_min) || !all_digits(fraction) {
        return None;
    }
    CoordinateText::try_from(s).ok()
}

fn parse_unsigned(s: &str) -> Option<u32> {
    if !all_digits(s) {
        return None;
    }
    s.parse().ok()
}

/// Unsigned decimal text: digits and dots only.
fn parse_decimal(s: &str) -> Option<f64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    s.parse().ok()
}

/// Decimal text that may go below zero, as altitudes do.
fn parse_signed_decimal(s: &str) -> Option<f64> {
    match s.strip_prefix('-') {
        Some(magnitude) => parse_decimal(magnitude).map(|v| -v),
        None => parse_decimal(s),
    }
}

/// Applies decoded sentences to a [`FixRecord`] with the field ownership rules
/// of each sentence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    century: u16,
}

impl Decoder {
    /// `century` is added to every two digit year.
    pub const fn new(century: u16) -> Self {
        Self { century }
    }

    pub const fn century(&self) -> u16 {
        self.century
    }

    /// Decode `text` into `fix`. Anything that is not a well formed GGA or RMC
    /// sentence leaves `fix` untouched and yields `None`.
    pub fn decode(&self, text: &str, fix: &mut FixRecord) -> Option<SentenceKind> {
        match parse_sentence(text) {
            Ok(sentence) => {
                self.apply(&sentence, fix);
                Some(sentence.kind())
            },
            Err(DecodeError::UnknownSentence) => {
                log::trace!("Ignoring sentence {text:?}");
                None
            },
            Err(e) => {
                log::debug!("Malformed sentence {text:?}, ignore it; cause {e}");
                None
            },
        }
    }

    pub fn apply(&self, sentence: &NmeaSentence, fix: &mut FixRecord) {
        match sentence {
            NmeaSentence::Gga(gga) => {
                // time and position of GGA duplicate RMC and are not applied
                fix.satellites_tracked = gga.satellites;
                fix.altitude_meters = gga.altitude_meters;
            },
            NmeaSentence::Rmc(rmc) => {
                fix.is_valid = rmc.active;
                fix.hour = rmc.time.hour;
                fix.minute = rmc.time.minute;
                fix.second = rmc.time.second;
                fix.millisecond = rmc.time.millisecond;
                fix.latitude.clone_from(&rmc.latitude);
                fix.latitude_hemisphere = rmc.latitude_hemisphere;
                fix.longitude.clone_from(&rmc.longitude);
                fix.longitude_hemisphere = rmc.longitude_hemisphere;
                fix.speed_knots = rmc.speed_knots;
                fix.heading_degrees = rmc.heading_degrees;
                fix.day = rmc.date.day;
                fix.month = rmc.date.month;
                fix.year = self.century.saturating_add(rmc.date.year_of_century.into());
            },
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CENTURY)
    }
}
