// Refresh-states long poll endpoint
//
// The hub holds the request open for up to `timeout` seconds and
// responds as soon as new events exist. The client-side timeout is kept
// strictly above the server window so "nothing new" and "transport hung"
// stay distinguishable.

use std::time::Duration;

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::models::RefreshStates;

/// How long the server is asked to hold the poll open, in seconds.
pub const SERVER_WAIT_SECS: u64 = 30;

/// Margin added on top of the server wait for the client-side timeout.
const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

impl HubClient {
    /// Issue one long poll for events newer than `last`.
    ///
    /// `GET /api/refreshStates?last={last}&timeout={wait_secs}`
    pub async fn refresh_states(&self, last: u64, wait_secs: u64) -> Result<RefreshStates, Error> {
        debug!(last, wait_secs, "polling refresh states");
        let timeout = Duration::from_secs(wait_secs) + CLIENT_TIMEOUT_MARGIN;
        self.get_with_timeout(&format!("refreshStates?last={last}&timeout={wait_secs}"), timeout)
            .await
    }
}
