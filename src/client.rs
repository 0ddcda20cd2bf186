use std::time::Duration;

use log::{debug, info};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::{Map, Value};
use tokio::time::{sleep, Instant};

use crate::config::PipelineConfig;
use crate::error::ImportError;

/// Lifecycle state reported by the pipeline API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    Done,
    Failed,
    /// Any state other than the two terminal ones.
    #[default]
    Pending,
}

impl From<&str> for RunState {
    fn from(state: &str) -> Self {
        match state {
            "DONE" => RunState::Done,
            "FAILED" => RunState::Failed,
            _ => RunState::Pending,
        }
    }
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

/// Response document for a pipeline run, as returned by `start_pipeline` or
/// the final `get_pl_run` poll.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: Option<String>,
    pub state: RunState,
    /// Named outputs, in the order the API listed them.
    pub outputs: Option<Map<String, Value>>,
    /// Free-text log lines, in emission order. Non-string entries are dropped.
    pub log: Vec<String>,
    /// The verbatim response document, kept for the fallback dump.
    pub raw: Value,
}

impl RunResponse {
    /// Build the typed view over a raw response document.
    pub fn from_value(raw: Value) -> Self {
        let run_id = raw
            .get("run_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let state = raw
            .get("state")
            .and_then(Value::as_str)
            .map(RunState::from)
            .unwrap_or_default();
        let outputs = raw.get("outputs").and_then(Value::as_object).cloned();
        let log = raw
            .get("log")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        RunResponse {
            run_id,
            state,
            outputs,
            log,
            raw,
        }
    }
}

/// Client for starting a saved pipeline and polling it to completion.
pub struct PipelineClient {
    client: Client,
    config: PipelineConfig,
}

impl PipelineClient {
    pub fn new(config: PipelineConfig) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(PipelineClient { client, config })
    }

    /// Start the saved pipeline with `payload` and wait for its final
    /// response document.
    ///
    /// Some pipelines complete synchronously: the start response then carries
    /// the outputs directly and no polling happens. Otherwise the run is
    /// polled at the configured interval until `DONE`, `FAILED`, or the
    /// deadline.
    pub async fn run(&self, payload: &Value) -> Result<RunResponse, ImportError> {
        let started = self.start(payload).await?;

        match started.run_id.clone() {
            Some(run_id) => self.poll(&run_id).await,
            None if started.outputs.is_some() && started.state == RunState::Done => Ok(started),
            None => Err(ImportError::MissingRunId(started.raw.to_string())),
        }
    }

    async fn start(&self, payload: &Value) -> Result<RunResponse, ImportError> {
        let url = format!(
            "{}/start_pipeline?user_id={}&saved_item_id={}",
            self.config.base_url, self.config.user_id, self.config.saved_item_id
        );
        debug!("Start payload: {payload}");

        let mut request = self.client.post(&url).json(payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.header(AUTHORIZATION, api_key.as_str());
        }

        let body = request.send().await?.bytes().await?;
        // Invalid UTF-8 bytes become replacement characters, not errors.
        let raw: Value = serde_json::from_str(&String::from_utf8_lossy(&body))?;
        Ok(RunResponse::from_value(raw))
    }

    async fn poll(&self, run_id: &str) -> Result<RunResponse, ImportError> {
        let url = format!("{}/get_pl_run", self.config.base_url);
        let deadline = Instant::now() + Duration::from_secs(self.config.poll_timeout_secs);

        loop {
            if Instant::now() >= deadline {
                return Err(ImportError::PollTimeout(self.config.poll_timeout_secs));
            }

            let mut request = self
                .client
                .get(&url)
                .query(&[("run_id", run_id), ("user_id", self.config.user_id.as_str())]);
            if let Some(api_key) = &self.config.api_key {
                request = request.header(AUTHORIZATION, api_key.as_str());
            }

            let body = request.send().await?.bytes().await?;
            let raw: Value = serde_json::from_str(&String::from_utf8_lossy(&body))?;
            let response = RunResponse::from_value(raw);
            info!("Run state: {:?}", response.state);

            match response.state {
                RunState::Done => return Ok(response),
                RunState::Failed => return Err(ImportError::RunFailed(response.raw.to_string())),
                RunState::Pending => sleep(Duration::from_secs(self.config.poll_interval_secs)).await,
            }
        }
    }
}
