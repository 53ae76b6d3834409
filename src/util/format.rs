use chrono::{DateTime, Local};

const BYTE_UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];
const BYTE_SUFFIX: &str = "B";

/// Scale a byte count by 1024 to the largest unit keeping the value under 1024.
/// e.g. 1253656 -> "1.20MB", 1253656678 -> "1.17GB"
pub fn format_byte_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in &BYTE_UNITS[..BYTE_UNITS.len() - 1] {
        // Compare the value as it will be printed so 1023.999 rolls over too
        if (value * 100.0).round() / 100.0 < 1024.0 {
            return format!("{:.2}{}{}", value, unit, BYTE_SUFFIX);
        }
        value /= 1024.0;
    }
    // Petabytes is the last unit, anything larger stays expressed in it
    format!("{:.2}{}{}", value, BYTE_UNITS[BYTE_UNITS.len() - 1], BYTE_SUFFIX)
}

pub fn format_timestamp(t: &DateTime<Local>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_percent(value: f32) -> String {
    format!("{:.1}", value)
}
