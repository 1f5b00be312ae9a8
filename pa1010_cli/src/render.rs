use chrono::{DateTime, Utc};
use pa1010::FixRecord;

fn timestamp(datetime: DateTime<Utc>) -> String {
    datetime.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Fix as display lines: timestamp, latitude, longitude, altitude, satellites.
pub fn lines(fix: &FixRecord) -> Vec<String> {
    if !fix.is_valid {
        return vec!["GPS invalid".to_string()];
    }

    let mut lines = vec![fix.datetime().map(timestamp).unwrap_or_else(|| {
        format!(
            "{:02}/{:02}/{:04} {:02}:{:02}:{:02}",
            fix.day, fix.month, fix.year, fix.hour, fix.minute, fix.second
        )
    })];
    if let Some((deg, min)) = fix.latitude_dm() {
        lines.push(format!(
            "{}  {deg:02}° {min:.3}",
            fix.latitude_hemisphere.as_char()
        ));
    }
    if let Some((deg, min)) = fix.longitude_dm() {
        lines.push(format!(
            "{} {deg:03}° {min:.3}",
            fix.longitude_hemisphere.as_char()
        ));
    }
    lines.push(format!("Alt {:.1}m", fix.altitude_meters));
    lines.push(format!("Tracking {} sats", fix.satellites_tracked));
    lines
}
