//! Historical hint queries.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::stream::EventClient;
use crate::error::{Error, TransportError};
use crate::types::{EventHistory, EventHistoryInfo, EventHistoryParams};

const HISTORY_PATH: &str = "/api/v1/history";
const HISTORY_INFO_PATH: &str = "/api/v1/history/info";

impl EventClient {
    /// Bounds of the stored hint history, from `GET /api/v1/history/info`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mev_share_kit::{EventClient, EventHistoryParams, MAINNET};
    ///
    /// # async fn example() -> Result<(), mev_share_kit::Error> {
    /// let client = EventClient::new(MAINNET.stream_url);
    /// let info = client.event_history_info().await?;
    ///
    /// let params = EventHistoryParams::new()
    ///     .block_start(info.max_block - 10)
    ///     .limit(info.max_limit);
    /// for record in client.get_event_history(&params).await? {
    ///     println!("{} {}", record.block, record.hint.hash);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn event_history_info(&self) -> Result<EventHistoryInfo, Error> {
        let url = self.endpoint(HISTORY_INFO_PATH);
        debug!(url = %url, "fetching history info");

        let response = self.client.get(&url).send().await?;
        decode_json(response).await
    }

    /// Historical hints matching `params`, in the order the server returns them.
    pub async fn get_event_history(
        &self,
        params: &EventHistoryParams,
    ) -> Result<Vec<EventHistory>, Error> {
        let url = self.endpoint(HISTORY_PATH);
        debug!(url = %url, "fetching history");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(params)?)
            .send()
            .await?;
        decode_json(response).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(TransportError::status(status.as_u16(), String::from_utf8_lossy(&body)).into());
    }
    Ok(serde_json::from_slice(&body)?)
}
