//! Fixed addresses, deadlines and literals shared by the two binaries.
//!
//! Nothing here is read from the environment or the command line; the
//! binaries use the [`Default`] values as-is and tests override fields
//! directly.

use std::time::Duration;

/// Address the server binds to: every interface, port 50051.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:50051";

/// Address the client dials.
pub const DEFAULT_SERVER_ADDR: &str = "localhost:50051";

/// Wall-clock budget shared by every call of one client script.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Prepended to every upper-cased string by `ProcessStrings`.
pub const DEFAULT_STRING_PREFIX: &str = "PROCESSED-";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub string_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
            string_prefix: DEFAULT_STRING_PREFIX.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_addr: String,

    /// Measured once from the start of the script, not per call.
    pub call_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_owned(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}
