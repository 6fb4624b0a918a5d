//! Shared test helpers: envelope builders, a recording labeler and a log
//! capture.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::writer::MakeWriter;

use crate::labeler::{Decide, IssueContext, Labeler};
use crate::types::{IssueNumber, LabelSuggestion, RepoId, ScoredLabel};

/// Threshold the recording labeler passes to the decision function.
pub const RECORDING_THRESHOLD: f32 = 0.5;

/// Base64-encodes a JSON value the way envelope producers do.
pub fn encode(payload: &Value) -> String {
    STANDARD.encode(payload.to_string())
}

/// Builds an envelope body around `payload`.
///
/// With `event_type == None` the envelope has no `headers` entry at all.
pub fn envelope(event_type: Option<&str>, payload: &Value) -> String {
    let mut body = json!({ "content": encode(payload) });
    if let Some(t) = event_type {
        body["headers"] = json!({
            "X-GitHub-Event": [t],
            "X-GitHub-Delivery": ["f0d6a1c0-0000-0000-0000-000000000000"],
        });
    }
    body.to_string()
}

/// Builds an `issues` webhook payload.
pub fn issues_payload(action: &str, label: Option<&str>, number: u64, full_name: &str) -> Value {
    json!({
        "action": action,
        "label": label.map(|name| json!({ "name": name })),
        "issue": { "number": number, "title": "Something is broken" },
        "repository": { "full_name": full_name },
        "sender": { "login": "octocat" },
    })
}

/// A labeler that records every call and runs the decision function
/// against a fixed suggestion.
#[derive(Debug, Default)]
pub struct RecordingLabeler {
    calls: Mutex<Vec<(RepoId, IssueNumber)>>,
    decisions: Mutex<Vec<bool>>,
}

impl RecordingLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(RepoId, IssueNumber)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn decisions(&self) -> Vec<bool> {
        self.decisions.lock().unwrap().clone()
    }
}

impl Labeler for RecordingLabeler {
    fn apply_label_prediction(&self, repo: &RepoId, issue: IssueNumber, decide: Decide) {
        let suggestion = LabelSuggestion::new(vec![
            ScoredLabel::new("area-System.Net", 0.9),
            ScoredLabel::new("area-Meta", 0.1),
        ])
        .unwrap();
        let context = IssueContext::new(repo.clone(), issue);
        let decision = decide(&suggestion, &context, RECORDING_THRESHOLD);

        self.calls.lock().unwrap().push((repo.clone(), issue));
        self.decisions.lock().unwrap().push(decision);
    }
}

/// Collects formatted log output written through a `fmt` subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buf: self.buf.clone(),
        }
    }
}

pub struct LogCaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber at `TRACE` level and returns the
/// formatted output.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.contents()
}
