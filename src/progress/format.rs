// String helpers for the progress line
use crate::progress::constants::ELIDE_MARKER;

/// Split a number of seconds into whole hours, whole minutes and remaining seconds.
fn split_hms(total: f64) -> (u64, u64, f64) {
    let hours = (total / 3600.0).floor();
    let rem = total - hours * 3600.0;
    let mins = (rem / 60.0).floor();
    let secs = rem - mins * 60.0;
    (hours as u64, mins as u64, secs)
}

/// Format a duration with millisecond precision, omitting leading zero units.
///
/// `0.34` renders as `0.340s`, `312` as `5m12.000s`, `3602.5` as `1h0m2.500s`.
/// Minutes are kept once hours are shown so the units stay positional.
pub fn duration_str(total: f64) -> String {
    let (hours, mins, secs) = split_hms(total);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || mins > 0 {
        out.push_str(&format!("{mins}m"));
    }
    out.push_str(&format!("{secs:.3}s"));
    out
}

/// Format an elapsed clock as `H:MM:SS`, or `M:SS` under an hour.
pub fn elapsed_str(total: f64) -> String {
    let (hours, mins, secs) = split_hms(total);
    let secs = secs as u64;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

/// Render an active job count, singular only for exactly one.
pub fn jobs_str(count: i64) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} job{suffix}")
}

/// Integer percentage of `done` over `total`, truncated toward zero.
pub fn percent(done: i64, total: i64) -> i64 {
    // Widened so `100 * done` cannot overflow for counts near i64::MAX.
    ((100 * done as i128) / total as i128) as i64
}

/// Cut `line` down to `columns - 1` characters plus the elide marker when it is too wide.
pub fn elide(line: String, columns: usize) -> String {
    if line.chars().count() <= columns {
        return line;
    }
    let mut cut: String = line.chars().take(columns.saturating_sub(1)).collect();
    cut.push_str(ELIDE_MARKER);
    cut
}
