//! Connection addressing.
//!
//! Identity is carried by the connection path, `{server}/ws/{username}`, and
//! is fixed for the lifetime of that connection.

use std::{fmt, str::FromStr};

use url::Url;

use crate::EndpointError;

/// Server address used when none is configured.
pub const DEFAULT_SERVER_ADDRESS: &str = "ws://localhost:8000";

/// Path segment preceding the username.
const SOCKET_PATH: &str = "ws";

/// Validated base address of a chat server (`ws://` or `wss://`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress(Url);

impl ServerAddress {
    /// Parse and validate a server address.
    ///
    /// # Errors
    ///
    /// - `EndpointError::Invalid` if the text is not a URL
    /// - `EndpointError::UnsupportedScheme` if the scheme is not `ws`/`wss`
    pub fn parse(address: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(address).map_err(|e| EndpointError::Invalid(e.to_string()))?;
        match url.scheme() {
            "ws" | "wss" => Ok(Self(url)),
            other => Err(EndpointError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Base URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl FromStr for ServerAddress {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Address of one user's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    username: String,
}

impl Endpoint {
    /// Build the endpoint for `username` on `server`.
    ///
    /// The username is percent-encoded as a single path segment, so `/` and
    /// other reserved characters cannot change the path. The dot segments
    /// `.` and `..` are the exception: URL normalisation removes them, so
    /// callers must not pass them (`huddle_app::validate_username` rejects
    /// both).
    pub fn new(server: &ServerAddress, username: &str) -> Self {
        let mut url = server.as_url().clone();
        // ws/wss are special schemes and always have a base, so this only
        // fails for URLs `ServerAddress::parse` already rejects.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(SOCKET_PATH).push(username);
        }
        url.set_query(None);
        url.set_fragment(None);
        Self { url, username: username.to_string() }
    }

    /// Full connection URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Identity bound to this endpoint.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
