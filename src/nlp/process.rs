//! NLP helper process client
//!
//! Spawns the configured helper (typically a small spaCy wrapper) once and
//! keeps it alive for the build. One JSON request per line goes to its stdin,
//! one JSON response per line comes back on stdout:
//!
//! ```text
//! → {"id": 1, "method": "lemmatize", "params": {"words": ["warns", "signs"]}}
//! ← {"id": 1, "result": {"lemmas": ["warn", "sign"]}}
//! → {"id": 2, "method": "tag", "params": {"texts": ["Warning signs of false prophets"]}}
//! ← {"id": 2, "result": {"docs": [[
//!       {"text": "Warning", "lemma": "warning", "pos": "NOUN", "dep": "ROOT"}, ...]]}}
//! ```

use super::{LemmaService, NlpError, PosTagger, TaggedToken};
use crate::config::NlpConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;

#[derive(Debug, Serialize)]
struct Request<'a> {
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct LemmatizeResult {
    lemmas: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagResult {
    docs: Vec<Vec<TaggedToken>>,
}

/// A running helper process with its pipes.
struct Channel {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    request_id: u64,
}

impl Channel {
    fn start(config: &NlpConfig) -> Result<Self, NlpError> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        let mut process = cmd.spawn().map_err(|e| {
            NlpError::Unavailable(format!("failed to start `{}`: {}", config.command, e))
        })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| NlpError::Unavailable("no stdin available".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| NlpError::Unavailable("no stdout available".to_string()))?;

        tracing::info!(command = %config.command, "NLP helper started");
        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            request_id: 0,
        })
    }

    async fn call(
        &mut self,
        method: &str,
        params: serde_json::Value,
        timeout_duration: Duration,
    ) -> Result<serde_json::Value, NlpError> {
        self.request_id += 1;
        let id = self.request_id;
        let request = Request { id, method, params };

        let mut line = serde_json::to_string(&request)
            .map_err(|e| NlpError::ParseError(format!("failed to serialize request: {}", e)))?;
        line.push('\n');

        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| NlpError::Unavailable(format!("failed to write request: {}", e)))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| NlpError::Unavailable(format!("failed to flush stdin: {}", e)))?;

        let mut reply = String::new();
        let read = timeout(timeout_duration, self.stdout.read_line(&mut reply)).await;
        match read {
            Ok(Ok(0)) => Err(NlpError::Unavailable("helper closed its output".to_string())),
            Ok(Ok(_)) => {
                let response: Response = serde_json::from_str(&reply)
                    .map_err(|e| NlpError::ParseError(format!("failed to parse response: {}", e)))?;

                if response.id != id {
                    return Err(NlpError::ParseError(format!(
                        "response id {} does not match request id {}",
                        response.id, id
                    )));
                }
                if let Some(error) = response.error {
                    return Err(NlpError::Service {
                        code: error.code,
                        message: error.message,
                    });
                }
                response
                    .result
                    .ok_or_else(|| NlpError::ParseError("empty response".to_string()))
            }
            Ok(Err(e)) => Err(NlpError::Unavailable(format!("failed to read response: {}", e))),
            Err(_) => Err(NlpError::Timeout(timeout_duration)),
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        let _ = self.process.start_kill();
    }
}

/// Production NLP client backed by a helper process.
///
/// The process is started lazily on first use and reused for every
/// subsequent request.
pub struct ProcessNlpClient {
    config: NlpConfig,
    channel: Mutex<Option<Channel>>,
}

impl ProcessNlpClient {
    pub fn new(config: NlpConfig) -> Self {
        Self {
            config,
            channel: Mutex::new(None),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    async fn ensure_started(&self) -> bool {
        let mut guard = self.channel.lock().await;
        if guard.is_none() {
            match Channel::start(&self.config) {
                Ok(channel) => *guard = Some(channel),
                Err(e) => {
                    tracing::warn!(error = %e, "NLP helper unavailable");
                    return false;
                }
            }
        }
        true
    }

    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, NlpError> {
        let mut guard = self.channel.lock().await;
        if guard.is_none() {
            *guard = Some(Channel::start(&self.config)?);
        }
        let channel = guard
            .as_mut()
            .ok_or_else(|| NlpError::Unavailable("no channel available".to_string()))?;

        let result = channel.call(method, params, self.timeout()).await;
        if result.is_err() {
            // The stream may hold a half-read reply; never reuse it.
            *guard = None;
        }
        result
    }
}

#[async_trait]
impl LemmaService for ProcessNlpClient {
    async fn is_available(&self) -> bool {
        self.ensure_started().await
    }

    async fn lemmatize(&self, words: &[String]) -> Result<Vec<String>, NlpError> {
        let result = self
            .call("lemmatize", serde_json::json!({ "words": words }))
            .await?;
        let parsed: LemmatizeResult = serde_json::from_value(result)
            .map_err(|e| NlpError::ParseError(format!("bad lemmatize result: {}", e)))?;
        Ok(parsed.lemmas)
    }
}

#[async_trait]
impl PosTagger for ProcessNlpClient {
    async fn is_available(&self) -> bool {
        self.ensure_started().await
    }

    async fn tag(&self, texts: &[String]) -> Result<Vec<Vec<TaggedToken>>, NlpError> {
        let result = self.call("tag", serde_json::json!({ "texts": texts })).await?;
        let parsed: TagResult = serde_json::from_value(result)
            .map_err(|e| NlpError::ParseError(format!("bad tag result: {}", e)))?;
        if parsed.docs.len() != texts.len() {
            return Err(NlpError::ParseError(format!(
                "tagged {} texts, expected {}",
                parsed.docs.len(),
                texts.len()
            )));
        }
        Ok(parsed.docs)
    }
}
