// frontend/src/dispatch.rs
//
// Command dispatch to the player server.
//
// Every command is one form-encoded POST. Player commands answer with the
// resulting PlayerState; bluetooth and shutdown answer with nothing useful.
// One reqwest Client is reused for all requests.

use crate::config::DashboardConfig;
use crate::error::DispatchError;
use cardash_shared::{ControlCommand, PlayerState};

/// Seam between the reconciler runtime and the transport.
pub trait CommandDispatcher: Clone + Send + Sync + 'static {
    /// Send a command and wait for the player state it produced.
    fn send(
        &self,
        command: ControlCommand,
    ) -> impl Future<Output = Result<PlayerState, DispatchError>> + Send;

    /// Send a command whose answer carries no state.
    fn send_unacknowledged(
        &self,
        command: ControlCommand,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    base_http: String,
}

impl HttpDispatcher {
    pub fn new(config: &DashboardConfig) -> reqwest::Result<Self> {
        // timeout covers connect and body transfer
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.base_http.clone()))
    }

    pub fn with_client(client: reqwest::Client, base_http: impl Into<String>) -> Self {
        Self {
            client,
            base_http: base_http.into(),
        }
    }

    pub fn endpoint(&self, command: &ControlCommand) -> String {
        format!("{}{}", self.base_http, command.path())
    }

    async fn post(&self, command: &ControlCommand) -> Result<reqwest::Response, DispatchError> {
        let url = self.endpoint(command);
        log::debug!("[CMD] POST {url} {:?}", command.form_fields());

        let resp = self
            .client
            .post(&url)
            .form(&command.form_fields())
            .send()
            .await
            .map_err(|e| DispatchError::Unreachable(classify_reqwest_error(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected(status.as_u16()));
        }
        Ok(resp)
    }
}

impl CommandDispatcher for HttpDispatcher {
    async fn send(&self, command: ControlCommand) -> Result<PlayerState, DispatchError> {
        let resp = self.post(&command).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| DispatchError::Unreachable(classify_reqwest_error(&e)))?;

        serde_json::from_slice::<PlayerState>(&bytes).map_err(|e| DispatchError::Decode(e.to_string()))
    }

    async fn send_unacknowledged(&self, command: ControlCommand) -> Result<(), DispatchError> {
        self.post(&command).await.map(|_| ())
    }
}

fn classify_reqwest_error(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect failed"
    } else if e.is_body() {
        "body read error"
    } else if e.is_request() {
        "request error"
    } else {
        "transport error"
    };
    format!("{kind}: {e}")
}
