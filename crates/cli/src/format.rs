//! Display formatting for sizes, durations and counts

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// `1536` -> `1.50 KB`; below 1 KB the exact byte count is shown
pub fn format_data_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size >= TB {
        format!("{:.2} TB", size / TB)
    } else if size >= GB {
        format!("{:.2} GB", size / GB)
    } else if size >= MB {
        format!("{:.2} MB", size / MB)
    } else if size >= KB {
        format!("{:.2} KB", size / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Milliseconds as `HH:MM:SS.mmm`, prefixed with whole days when present
pub fn format_duration(millis: i64) -> String {
    let mut remaining = millis.max(0);

    let days = remaining / MILLIS_PER_DAY;
    remaining %= MILLIS_PER_DAY;
    let hours = remaining / MILLIS_PER_HOUR;
    remaining %= MILLIS_PER_HOUR;
    let minutes = remaining / MILLIS_PER_MINUTE;
    remaining %= MILLIS_PER_MINUTE;
    let seconds = remaining / MILLIS_PER_SECOND;
    let millis = remaining % MILLIS_PER_SECOND;

    let clock = format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis);
    match days {
        0 => clock,
        1 => format!("1 day and {}", clock),
        n => format!("{} days and {}", n, clock),
    }
}

/// `1234567` -> `1,234,567`
pub fn format_integer(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
