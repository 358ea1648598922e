/// Configuration constants for the ASA API
pub mod api {
    use std::time::Duration;

    /// Default ScaleFT / ASA host
    pub const HOST: &str = "app.scaleft.com";

    /// Base path for ASA API v1
    pub const BASE_PATH: &str = "/v1";

    /// Token exchange endpoint (team scoped)
    pub const SERVICE_TOKEN: &str = "service_token";

    /// Projects endpoint
    pub const PROJECTS: &str = "projects";

    /// Servers endpoint (below a project)
    pub const SERVERS: &str = "servers";

    /// Page size requested for server listings
    pub const SERVER_PAGE_SIZE: u32 = 1000;

    /// Upper bound on pages followed for a single query
    pub const MAX_PAGES: usize = 1000;

    /// Header carrying the remaining request quota
    pub const RATELIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Secret store retry settings
pub mod secrets {
    use std::time::Duration;

    /// Delay before each retry of a throttled fetch (1s, 2s, 3s)
    pub const THROTTLE_BACKOFF: &[Duration] = &[
        Duration::from_secs(1),
        Duration::from_secs(2),
        Duration::from_secs(3),
    ];

    /// Error code SSM returns when the request rate is exceeded
    pub const THROTTLING_ERROR_CODE: &str = "ThrottlingException";
}

/// Environment variable names
pub mod env {
    pub const TEAM: &str = "ASA_TEAM";
    pub const HOST: &str = "ASA_HOST";
    pub const API_KEY_PATH: &str = "ASA_API_KEY_PATH";
    pub const API_SECRET_PATH: &str = "ASA_API_SECRET_PATH";
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    pub const LOG_LEVEL: &str = "ASA_CLEANER_LOG_LEVEL";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "info";
}
