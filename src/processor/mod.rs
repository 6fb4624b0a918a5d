//! Processing of a single notification envelope.
//!
//! This is the entry point that ties the pipeline together:
//!
//! 1. Short-circuit the placeholder body
//! 2. Decode the `headers` entry to learn the event type
//! 3. Decode the `content` entry, dispatch it on the event type, and
//!    evaluate the trigger
//! 4. On a trigger match, hand the issue to the [`Labeler`]
//!
//! Headers are always decoded before content, whatever order the envelope
//! lists them in. A failure in one entry is recorded in that entry's report
//! and never stops the others from being processed.

pub mod report;

use serde_json::Value;

use crate::config::ConfigLookup;
use crate::envelope::{
    CONTENT_KEY, Envelope, HEADERS_KEY, decode_content, decode_headers, is_placeholder,
};
use crate::labeler::{Decide, Labeler};
use crate::trigger::{self, TriggerDecision};
use crate::types::EventType;
use crate::webhooks::{GitHubEvent, IssuesEvent, parse_webhook};

pub use report::{
    EntryError, EntryOutcome, EntryReport, EntrySummary, ProcessReport, ReportSummary, Stage,
};

/// Runs envelopes through the decode, dispatch and trigger pipeline.
///
/// Holds no mutable state, so one processor can serve concurrent deliveries
/// when its collaborators are `Sync`.
#[derive(Debug, Clone)]
pub struct EventProcessor<L, C> {
    labeler: L,
    config: C,
    decide: Decide,
}

impl<L: Labeler, C: ConfigLookup> EventProcessor<L, C> {
    /// Creates a processor that passes `decide` to the labeler on every
    /// trigger match.
    pub fn new(labeler: L, config: C, decide: Decide) -> Self {
        EventProcessor {
            labeler,
            config,
            decide,
        }
    }

    /// Returns the labeler that receives trigger matches.
    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    /// Returns the configuration used to resolve trigger labels.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Processes one envelope body.
    ///
    /// Never fails: every problem is recorded in the returned report.
    pub fn process(&self, body: &str) -> ProcessReport {
        if is_placeholder(body) {
            return ProcessReport::Placeholder;
        }

        let envelope = match Envelope::parse(body) {
            Ok(envelope) => envelope,
            Err(err) => return ProcessReport::Rejected(err.into()),
        };

        let mut entries = Vec::with_capacity(envelope.len());

        // Phase 1: headers. Content cannot be dispatched without them.
        let mut event_type = None;
        if let Some(headers) = envelope.headers() {
            let outcome = decode_headers(headers).map_err(EntryError::from);
            if let Ok(t) = &outcome {
                event_type = Some(t.clone());
            }
            entries.push(EntryReport::new(
                HEADERS_KEY,
                outcome.map(EntryOutcome::EventType),
                None,
            ));
        }

        // Phase 2: content.
        if let Some(content) = envelope.content() {
            entries.push(self.process_content(content, event_type.as_ref()));
        }

        for key in envelope.other_keys() {
            entries.push(EntryReport::new(key, Ok(EntryOutcome::Ignored), None));
        }

        ProcessReport::Processed(entries)
    }

    fn process_content(&self, content: &Value, event_type: Option<&EventType>) -> EntryReport {
        let decoded = match decode_content(content) {
            Ok(decoded) => decoded,
            Err(err) => return EntryReport::new(CONTENT_KEY, Err(err.into()), None),
        };
        let outcome = self.dispatch(&decoded, event_type);
        EntryReport::new(CONTENT_KEY, outcome, Some(decoded))
    }

    fn dispatch(
        &self,
        decoded: &str,
        event_type: Option<&EventType>,
    ) -> Result<EntryOutcome, EntryError> {
        match parse_webhook(event_type, decoded.as_bytes())? {
            GitHubEvent::Issues(event) => self.handle_issues(&event),
        }
    }

    fn handle_issues(&self, event: &IssuesEvent) -> Result<EntryOutcome, EntryError> {
        match trigger::evaluate(event, &self.config)? {
            TriggerDecision::Fire { repo, issue } => {
                self.labeler.apply_label_prediction(&repo, issue, self.decide);
                Ok(EntryOutcome::Invoked { repo, issue })
            }
            TriggerDecision::Ignore { repo, reason } => {
                Ok(EntryOutcome::NotTriggered { repo, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::labeler::select;
    use crate::test_utils::{RecordingLabeler, envelope, issues_payload};
    use crate::trigger::IgnoreReason;
    use crate::types::{IssueNumber, RepoId};
    use serde_json::json;

    fn processor(config: MapConfig) -> EventProcessor<RecordingLabeler, MapConfig> {
        EventProcessor::new(RecordingLabeler::new(), config, select)
    }

    fn labeled(label: &str, full_name: &str) -> serde_json::Value {
        issues_payload("labeled", Some(label), 1234, full_name)
    }

    // ========================================================================
    // Trigger matching end to end
    // ========================================================================

    #[test]
    fn default_trigger_invokes_labeler_once() {
        let p = processor(MapConfig::new());
        let body = envelope(
            Some("issues"),
            &labeled("customer-reported", "dotnet/runtime"),
        );

        let report = p.process(&body);

        assert_eq!(
            p.labeler().calls(),
            vec![(RepoId::new("dotnet", "runtime"), IssueNumber(1234))]
        );
        assert_eq!(report.invocations(), 1);
        assert!(report.errors().is_empty());
    }

    #[test]
    fn labeler_receives_selection_function() {
        let p = processor(MapConfig::new());
        let body = envelope(
            Some("issues"),
            &labeled("customer-reported", "dotnet/runtime"),
        );

        p.process(&body);

        // RecordingLabeler runs the decide fn against its canned suggestion.
        assert_eq!(p.labeler().decisions(), vec![true]);
    }

    #[test]
    fn configured_trigger_is_used() {
        let config = MapConfig::new().with("IssueModel:runtime:TriggerLabel", "untriaged");
        let p = processor(config);

        p.process(&envelope(
            Some("issues"),
            &labeled("customer-reported", "dotnet/runtime"),
        ));
        assert!(p.labeler().calls().is_empty());

        p.process(&envelope(Some("issues"), &labeled("untriaged", "dotnet/runtime")));
        assert_eq!(p.labeler().calls().len(), 1);
    }

    #[test]
    fn different_label_does_not_invoke_labeler() {
        let p = processor(MapConfig::new());
        let report = p.process(&envelope(
            Some("issues"),
            &labeled("area-System.Net", "dotnet/runtime"),
        ));

        assert!(p.labeler().calls().is_empty());
        let content = &report.entries()[1];
        assert_eq!(
            content.outcome.as_ref().unwrap(),
            &EntryOutcome::NotTriggered {
                repo: RepoId::new("dotnet", "runtime"),
                reason: IgnoreReason::LabelMismatch {
                    label: Some("area-System.Net".to_string()),
                    trigger: "customer-reported".to_string(),
                },
            }
        );
    }

    #[test]
    fn unlabeled_action_does_not_invoke_labeler() {
        let p = processor(MapConfig::new());
        let payload = issues_payload("unlabeled", Some("customer-reported"), 1, "o/r");

        p.process(&envelope(Some("issues"), &payload));

        assert!(p.labeler().calls().is_empty());
    }

    // ========================================================================
    // Envelope shape
    // ========================================================================

    #[test]
    fn empty_envelope_completes_without_invocation() {
        let p = processor(MapConfig::new());
        let report = p.process(r#"{"id": "1", "topic": "webhooks"}"#);

        assert!(p.labeler().calls().is_empty());
        assert!(report.errors().is_empty());
        assert!(
            report
                .entries()
                .iter()
                .all(|e| matches!(e.outcome, Ok(EntryOutcome::Ignored)))
        );
    }

    #[test]
    fn content_before_headers_in_body_still_dispatches() {
        let p = processor(MapConfig::new());
        let payload = labeled("customer-reported", "dotnet/runtime");
        let encoded = crate::test_utils::encode(&payload);
        // Content is listed first in the body.
        let body = format!(
            r#"{{"content": "{encoded}", "headers": {{"X-GitHub-Event": ["issues"]}}}}"#
        );

        let report = p.process(&body);

        assert_eq!(p.labeler().calls().len(), 1);
        let keys: Vec<_> = report.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["headers", "content"]);
    }

    #[test]
    fn content_without_headers_is_unrecognized() {
        let p = processor(MapConfig::new());
        let body = envelope(None, &labeled("customer-reported", "dotnet/runtime"));

        let report = p.process(&body);

        assert!(p.labeler().calls().is_empty());
        let errors = report.errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], EntryError::UnrecognizedEventType(None)));
    }

    #[test]
    fn headers_without_event_header_then_content_is_unrecognized() {
        let p = processor(MapConfig::new());
        let encoded = crate::test_utils::encode(&labeled("customer-reported", "o/r"));
        let body = json!({
            "headers": { "X-GitHub-Delivery": ["abc"] },
            "content": encoded,
        })
        .to_string();

        let report = p.process(&body);

        let errors = report.errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], EntryError::MissingHeader(_)));
        assert!(matches!(errors[1], EntryError::UnrecognizedEventType(None)));
        assert!(p.labeler().calls().is_empty());
    }

    #[test]
    fn unsupported_event_type_is_one_error_and_no_call() {
        let p = processor(MapConfig::new());
        let body = envelope(
            Some("pull_request"),
            &labeled("customer-reported", "dotnet/runtime"),
        );

        let report = p.process(&body);

        assert!(p.labeler().calls().is_empty());
        let errors = report.errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            EntryError::UnrecognizedEventType(Some(t)) if t.as_str() == "pull_request"
        ));
    }

    // ========================================================================
    // Error isolation
    // ========================================================================

    #[test]
    fn malformed_repository_name_is_caught() {
        let p = processor(MapConfig::new());
        let body = json!({
            "headers": { "X-GitHub-Event": ["issues"] },
            "content": crate::test_utils::encode(&labeled("customer-reported", "runtime")),
            "metadata": { "attempt": 1 },
        })
        .to_string();

        let report = p.process(&body);

        assert!(p.labeler().calls().is_empty());
        let entries = report.entries();
        assert_eq!(entries.len(), 3);
        assert!(matches!(
            entries[0].outcome,
            Ok(EntryOutcome::EventType(_))
        ));
        let err = entries[1].error().unwrap();
        assert!(matches!(err, EntryError::MalformedRepositoryName(_)));
        assert_eq!(err.stage(), Stage::Matching);
        // The decoded text is kept for diagnostics.
        assert!(entries[1].decoded.as_deref().unwrap().contains("runtime"));
        assert!(matches!(entries[2].outcome, Ok(EntryOutcome::Ignored)));
    }

    #[test]
    fn invalid_base64_is_malformed_envelope() {
        let p = processor(MapConfig::new());
        let body = json!({
            "headers": { "X-GitHub-Event": ["issues"] },
            "content": "!!! not base64 !!!",
        })
        .to_string();

        let report = p.process(&body);

        let content = &report.entries()[1];
        assert!(matches!(
            content.error(),
            Some(EntryError::MalformedEnvelope(_))
        ));
        assert!(content.decoded.is_none());
        assert!(p.labeler().calls().is_empty());
    }

    #[test]
    fn line_wrapped_content_still_triggers() {
        let p = processor(MapConfig::new());
        let encoded = crate::test_utils::encode(&labeled("customer-reported", "dotnet/runtime"));
        let wrapped = encoded
            .as_bytes()
            .chunks(40)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        let body = json!({
            "headers": { "X-GitHub-Event": ["issues"] },
            "content": wrapped,
        })
        .to_string();

        let report = p.process(&body);

        assert!(report.errors().is_empty());
        assert_eq!(
            p.labeler().calls(),
            vec![(RepoId::new("dotnet", "runtime"), IssueNumber(1234))]
        );
    }

    #[test]
    fn label_without_name_is_not_triggered() {
        let p = processor(MapConfig::new());
        for label in [json!({ "name": null }), json!({})] {
            let payload = json!({
                "action": "labeled",
                "label": label,
                "issue": { "number": 7 },
                "repository": { "full_name": "dotnet/runtime" },
            });

            let report = p.process(&envelope(Some("issues"), &payload));

            assert!(report.errors().is_empty(), "{label}");
            assert!(matches!(
                report.entries()[1].outcome,
                Ok(EntryOutcome::NotTriggered {
                    reason: IgnoreReason::LabelMismatch { label: None, .. },
                    ..
                })
            ));
        }
        assert!(p.labeler().calls().is_empty());
    }

    #[test]
    fn payload_missing_fields_is_deserialization_failure() {
        let p = processor(MapConfig::new());
        let body = envelope(Some("issues"), &json!({ "action": "labeled" }));

        let report = p.process(&body);

        let content = &report.entries()[1];
        assert!(matches!(
            content.error(),
            Some(EntryError::DeserializationFailure(_))
        ));
        assert_eq!(content.decoded.as_deref(), Some(r#"{"action":"labeled"}"#));
    }

    // ========================================================================
    // Whole-body handling
    // ========================================================================

    #[test]
    fn placeholder_body_short_circuits() {
        let p = processor(MapConfig::new());
        let report = p.process("This is an event body");

        assert!(matches!(report, ProcessReport::Placeholder));
        assert!(p.labeler().calls().is_empty());
    }

    #[test]
    fn non_object_body_is_rejected_not_panicking() {
        let p = processor(MapConfig::new());
        let report = p.process("[]");

        assert!(matches!(
            report,
            ProcessReport::Rejected(EntryError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn processor_is_reusable_across_deliveries() {
        let p = processor(MapConfig::new());
        for n in 1..=3 {
            let payload = issues_payload("labeled", Some("customer-reported"), n, "o/r");
            p.process(&envelope(Some("issues"), &payload));
        }
        let issues: Vec<_> = p.labeler().calls().into_iter().map(|(_, i)| i).collect();
        assert_eq!(issues, vec![IssueNumber(1), IssueNumber(2), IssueNumber(3)]);
    }
}
