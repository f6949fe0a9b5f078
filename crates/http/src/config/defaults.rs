//! Default configuration values

pub struct HttpDefaults;

impl HttpDefaults {
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Uploads are plain text files; 16 MiB is generous
    pub const MAX_REQUEST_SIZE: usize = 16 * 1024 * 1024;
    pub const ENABLE_TRACING: bool = true;
    pub const HEALTH_CHECK_PATH: &'static str = "/health";
    pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
}
