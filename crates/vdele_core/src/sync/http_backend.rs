//! JSON-over-HTTP backend against the spreadsheet web endpoint.
//!
//! # Responsibility
//! - Map the backend SPI onto the single-endpoint action protocol:
//!   `GET ?action=load` returns the board, mutations POST their own
//!   serialized payload.
//! - Classify transport and status failures for the engine.
//!
//! # Invariants
//! - Network-level failures and 5xx/429 responses are retryable.
//! - Other non-2xx responses are terminal: replaying the same payload
//!   cannot succeed.

use crate::model::list::BoardSnapshot;
use crate::sync::backend::{BackendError, BackendResult, RemoteBackend, SyncStage};
use crate::sync::op::PendingOp;
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;

/// Blocking HTTP client for the remote board endpoint.
pub struct HttpBackend {
    endpoint: String,
    client: Client,
}

impl HttpBackend {
    /// Builds a client with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            BackendError::new(SyncStage::Push, "client_build", err.to_string(), false)
        })?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteBackend for HttpBackend {
    fn fetch_board(&self) -> BackendResult<BoardSnapshot> {
        debug!("event=remote_fetch module=sync status=start");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("action", "load")])
            .send()
            .map_err(|err| map_transport_error(SyncStage::Pull, &err))?;

        let response = check_status(SyncStage::Pull, response)?;
        let mut snapshot: BoardSnapshot = response.json().map_err(|err| {
            BackendError::new(SyncStage::Pull, "invalid_body", err.to_string(), false)
        })?;

        // Snapshot items omit list_id; the enclosing list is authoritative.
        for entry in &mut snapshot.lists {
            for task in &mut entry.tasks {
                task.list_uuid = entry.list.uuid;
            }
        }

        debug!(
            "event=remote_fetch module=sync status=ok lists={} tasks={}",
            snapshot.lists.len(),
            snapshot.task_count()
        );
        Ok(snapshot)
    }

    fn apply(&self, op: &PendingOp) -> BackendResult<()> {
        debug!(
            "event=remote_apply module=sync status=start action={}",
            op.action()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(op)
            .send()
            .map_err(|err| map_transport_error(SyncStage::Push, &err))?;

        check_status(SyncStage::Push, response)?;
        debug!(
            "event=remote_apply module=sync status=ok action={}",
            op.action()
        );
        Ok(())
    }
}

fn map_transport_error(stage: SyncStage, err: &reqwest::Error) -> BackendError {
    let code = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else {
        "network"
    };
    BackendError::new(stage, code, err.to_string(), true)
}

fn check_status(stage: SyncStage, response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retryable = status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
    Err(BackendError::new(
        stage,
        format!("http_status_{}", status.as_u16()),
        format!("unexpected response status {status}"),
        retryable,
    ))
}
