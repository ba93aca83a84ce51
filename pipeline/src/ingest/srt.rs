use chrono::NaiveDateTime;
use log::warn;

/// One geotagged flight-log record before projection.
#[derive(Debug, Clone, Copy)]
pub struct GeoSample {
    pub timestamp: NaiveDateTime,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Extracts the numeric value following `key`, terminated by `]`.
fn field_value(line: &str, key: &str) -> Option<f64> {
    let start = line.find(key)? + key.len();
    let rest = &line[start..];
    let end = rest.find(']')?;
    rest[..end].trim().parse().ok()
}

/// Parses an SRT-like flight log into geotagged samples.
///
/// Records alternate between a bare timestamp line and a bracketed data line
/// (`[latitude: …] [longitude: …] [rel_alt: … abs_alt: …]`). Subtitle
/// sequence numbers and cue timing lines are ignored. A malformed data line,
/// or one with no preceding timestamp, is skipped with a diagnostic; the rest
/// of the file is still processed.
pub fn parse_srt(contents: &str) -> Vec<GeoSample> {
    let mut samples = Vec::new();
    let mut pending_timestamp: Option<NaiveDateTime> = None;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
            pending_timestamp = Some(timestamp);
            continue;
        }

        if trimmed.contains("[latitude:") {
            let timestamp = match pending_timestamp.take() {
                Some(timestamp) => timestamp,
                None => {
                    warn!("coordinate line without preceding timestamp: {}", trimmed);
                    continue;
                }
            };
            let latitude = field_value(trimmed, "[latitude:");
            let longitude = field_value(trimmed, "[longitude:");
            let altitude = field_value(trimmed, "abs_alt:");
            match (latitude, longitude, altitude) {
                (Some(latitude_deg), Some(longitude_deg), Some(altitude_m)) => {
                    samples.push(GeoSample {
                        timestamp,
                        latitude_deg,
                        longitude_deg,
                        altitude_m,
                    });
                }
                _ => {
                    warn!("malformed coordinate line skipped: {}", trimmed);
                }
            }
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
1
00:00:00,000 --> 00:00:00,033
2025-01-01 12:00:00.000000
[iso: 100] [latitude: 30.000000] [longitude: 120.000000] [rel_alt: 5.000 abs_alt: 100.000] </font>

2
00:00:00,033 --> 00:00:00,066
2025-01-01 12:00:00.033000
[iso: 100] [latitude: 30.000100] [longitude: 120.000100] [rel_alt: 5.100 abs_alt: 100.100] </font>
";

    #[test]
    fn pairs_timestamps_with_coordinate_lines() {
        let samples = parse_srt(SAMPLE_LOG);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].latitude_deg, 30.0);
        assert_eq!(samples[0].longitude_deg, 120.0);
        assert_eq!(samples[0].altitude_m, 100.0);
        assert!(samples[1].timestamp > samples[0].timestamp);
    }

    #[test]
    fn malformed_coordinate_line_is_skipped() {
        let log = "\
2025-01-01 12:00:00.000000
[latitude: not-a-number] [longitude: 120.0] [rel_alt: 1.0 abs_alt: 10.0] </font>
2025-01-01 12:00:00.100000
[latitude: 30.0] [longitude: 120.0] [rel_alt: 1.0 abs_alt: 10.0] </font>
";
        let samples = parse_srt(log);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].latitude_deg, 30.0);
    }

    #[test]
    fn coordinate_line_without_timestamp_is_skipped() {
        let log = "[latitude: 30.0] [longitude: 120.0] [rel_alt: 1.0 abs_alt: 10.0] </font>\n";
        assert!(parse_srt(log).is_empty());
    }

    #[test]
    fn empty_log_yields_no_samples() {
        assert!(parse_srt("").is_empty());
        assert!(parse_srt("1\n00:00:00,000 --> 00:00:00,033\n").is_empty());
    }
}
