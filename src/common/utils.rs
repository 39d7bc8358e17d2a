use std::time::Duration;

/// Human-readable elapsed time: `850ms`, `12.3s`, `4m 05s`, `1h 02m 03s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs == 0 {
        return format!("{}ms", elapsed.as_millis());
    }
    if secs < 60 {
        return format!("{:.1}s", elapsed.as_secs_f64());
    }
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{}m {:02}s", minutes, seconds)
    }
}
