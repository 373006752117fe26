use std::time::Duration;

// Terminal control sequences
// Erases the whole current line without moving the cursor; usually followed by '\r'.
pub const CSI_ERASE_LINE: &str = "\x1b[2K";
// Erases from the cursor to the end of the line so shorter redraws leave no residue.
pub const CSI_ERASE_LINE_AFTER: &str = "\x1b[K";

// Marker appended to lines cut down to the terminal width
pub const ELIDE_MARKER: &str = "..";

// Timing related constants
pub const SHOW_DELAY: Duration = Duration::from_millis(500);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// Quiet reporters move their start time this far ahead so they never become visible
pub const QUIET_HOLDOFF: Duration = Duration::from_secs(1 << 32);
