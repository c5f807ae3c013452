mod client;
mod env;

pub use client::ModuleClient;
pub use env::EnvVars;

pub fn get_current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}

/// Epoch seconds rendered the way the client expects `drawTime`:
/// ISO-8601 with a UTC offset.
pub fn format_draw_time(epoch_secs: i64) -> String {
    chrono::DateTime::from_timestamp(epoch_secs, 0)
        .unwrap_or_default()
        .to_rfc3339()
}
