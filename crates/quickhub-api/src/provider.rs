// Connection parameter resolution.
//
// The hub address and Basic credentials are looked up through a
// `ConfigProvider` on every request rather than captured at client
// construction, so a credential rotation or host change takes effect
// on the next call without rebuilding the client.

use secrecy::SecretString;
use url::Url;

use crate::error::Error;

/// One resolved set of connection parameters.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// `http` or `https`.
    pub scheme: String,
    /// Host name or address, optionally with a port.
    pub host: String,
    /// Basic auth user.
    pub user: String,
    /// Basic auth password.
    pub password: SecretString,
}

impl ConnectionInfo {
    /// The hub root URL, e.g. `http://192.168.1.57/`.
    pub fn base_url(&self) -> Result<Url, Error> {
        Url::parse(&format!("{}://{}/", self.scheme, self.host)).map_err(Error::InvalidUrl)
    }
}

/// Source of connection parameters, consulted once per request.
///
/// Implementations may return a different `ConnectionInfo` between calls;
/// the client never caches the result beyond the request it was resolved for.
pub trait ConfigProvider: Send + Sync {
    fn connection(&self) -> Result<ConnectionInfo, Error>;
}

/// A provider that always hands out the same fixed parameters.
///
/// Useful for tests and for callers that resolve configuration up front.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    info: ConnectionInfo,
}

impl StaticProvider {
    pub fn new(info: ConnectionInfo) -> Self {
        Self { info }
    }

    /// Convenience constructor from bare parts.
    pub fn from_parts(
        scheme: impl Into<String>,
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            info: ConnectionInfo {
                scheme: scheme.into(),
                host: host.into(),
                user: user.into(),
                password: SecretString::from(password.into()),
            },
        }
    }
}

impl ConfigProvider for StaticProvider {
    fn connection(&self) -> Result<ConnectionInfo, Error> {
        Ok(self.info.clone())
    }
}
