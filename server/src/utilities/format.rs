use std::time::SystemTime;

/// Render a live modification time the way listings display it, in the
/// server's local timezone.
pub fn mtime_to_display(mtime: SystemTime) -> String {
    let dt: chrono::DateTime<chrono::Local> = mtime.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
