//! Best-effort reporting of one point per finished stroke.
//!
//! [Reporter::report] hands the request to a task on the runtime and returns right away. Whatever
//! happens to the request after that is logged and nothing else: no retries, no queue, no error
//! for the caller.

use crate::{
    config::Config,
    error::{ErrorKind, ScnError},
    graphics::StrokePos,
    note::NoteId,
};
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Url};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};
use tokio::{runtime::Handle, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryPoint {
    pub x: f32,
    pub y: f32,
    pub note_id: NoteId,
}

impl TelemetryPoint {
    pub fn new(pos: StrokePos, note_id: NoteId) -> Self {
        TelemetryPoint {
            x: pos.x,
            y: pos.y,
            note_id,
        }
    }
}

impl Display for TelemetryPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "x={} y={} note={}", self.x, self.y, self.note_id)
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    x: f32,
    y: f32,
    note_id: String,
}

impl From<TelemetryPoint> for Payload {
    fn from(point: TelemetryPoint) -> Self {
        Payload {
            x: point.x,
            y: point.y,
            note_id: point.note_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Delivered(u16),
    Rejected { status: u16, body: String },
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct Reporter {
    client: Client,
    endpoint: Url,
    runtime: Handle,
}

impl Reporter {
    pub fn new(endpoint: &str, timeout: Duration, runtime: Handle) -> Result<Self, ScnError> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            ScnError::because(ErrorKind::BadEndpoint(endpoint.to_string()), format!("{err}"))
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Reporter {
            client,
            endpoint,
            runtime,
        })
    }

    pub fn from_config(config: &Config, runtime: Handle) -> Result<Self, ScnError> {
        Reporter::new(
            &config.endpoint,
            Duration::from_millis(config.request_timeout_ms),
            runtime,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `point` in the background. `None` means nothing was sent.
    ///
    /// Dropping the returned handle detaches the request, it still runs to completion.
    pub fn report(&self, point: TelemetryPoint) -> Option<JoinHandle<Outcome>> {
        let body = match serde_json::to_vec(&Payload::from(point)) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!("could not serialize {point}: {err}");
                return None;
            }
        };

        let request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        Some(self.runtime.spawn(async move {
            let outcome = deliver(request).await;
            match &outcome {
                Outcome::Delivered(_) => tracing::info!("sent {point}"),
                Outcome::Rejected { status, body } if body.is_empty() => {
                    tracing::error!("collector rejected {point} with HTTP {status}")
                }
                Outcome::Rejected { status, body } => {
                    tracing::error!("collector rejected {point} with HTTP {status}: {body}")
                }
                Outcome::Transport(err) => tracing::error!("could not send {point}: {err}"),
            }
            outcome
        }))
    }
}

async fn deliver(request: RequestBuilder) -> Outcome {
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return Outcome::Transport(format!("{err}")),
    };

    let status = response.status();
    if status.is_success() {
        Outcome::Delivered(status.as_u16())
    } else {
        Outcome::Rejected {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }
    }
}
