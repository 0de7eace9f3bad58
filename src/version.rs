// Version tracking for WebWaddle

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("v{}", VERSION)
}

/// User-Agent sent with outgoing HTTP requests
pub fn user_agent() -> String {
    format!("webwaddle/{}", VERSION)
}
