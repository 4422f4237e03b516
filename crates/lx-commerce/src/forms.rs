//! Newsletter, contact and giveaway-entry forms.

use lx_api_types::{ContactRequest, Envelope};
use lx_client::{ApiError, Notice, Notifier, Transport, calls};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    /// The server accepted the submission; the form should be reset.
    Accepted,
    /// Refused by validation or the server; inputs stay as typed.
    Rejected,
    /// Network or decoding failure.
    Failed,
}

impl FormOutcome {
    pub fn should_reset(self) -> bool {
        self == FormOutcome::Accepted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn submit_newsletter(
    transport: &dyn Transport,
    notifier: &dyn Notifier,
    email: &str,
) -> FormOutcome {
    let email = email.trim();
    if email.is_empty() {
        notifier.notify(Notice::error("Email is required"));
        return FormOutcome::Rejected;
    }
    finish(calls::subscribe(transport, email).await, notifier)
}

pub async fn submit_contact(
    transport: &dyn Transport,
    notifier: &dyn Notifier,
    input: &ContactInput,
) -> FormOutcome {
    let request = ContactRequest {
        name: input.name.trim().to_owned(),
        email: input.email.trim().to_owned(),
        message: input.message.trim().to_owned(),
    };
    if request.name.is_empty() || request.email.is_empty() || request.message.is_empty() {
        notifier.notify(Notice::error("All fields are required"));
        return FormOutcome::Rejected;
    }
    finish(calls::contact(transport, &request).await, notifier)
}

pub async fn submit_giveaway_entry(
    transport: &dyn Transport,
    notifier: &dyn Notifier,
    email: &str,
) -> FormOutcome {
    let email = email.trim();
    if email.is_empty() {
        notifier.notify(Notice::error("Email is required"));
        return FormOutcome::Rejected;
    }
    finish(calls::enter_giveaway(transport, email).await, notifier)
}

fn finish(result: Result<Envelope, ApiError>, notifier: &dyn Notifier) -> FormOutcome {
    match result {
        Ok(envelope) => {
            notifier.notify(Notice::success(envelope.display_message()));
            FormOutcome::Accepted
        }
        Err(err @ (ApiError::Rejected(_) | ApiError::Status { .. })) => {
            notifier.notify(Notice::error(err.user_message()));
            FormOutcome::Rejected
        }
        Err(err) => {
            warn!(error = %err, "form submission failed");
            notifier.notify(Notice::error(err.user_message()));
            FormOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lx_api_types::HttpMethod;
    use lx_client::testing::{NoticeLog, ScriptedTransport};
    use lx_client::{GENERIC_FAILURE, NoticeKind, paths};
    use serde_json::json;

    #[tokio::test]
    async fn newsletter_success_resets_form() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        let notices = NoticeLog::new();
        transport.respond(
            HttpMethod::Post,
            paths::SUBSCRIBE,
            200,
            json!({"success": true, "message": "Successfully subscribed!"}),
        );

        let outcome = submit_newsletter(&transport, &notices, "  ana@example.com ").await;
        assert!(outcome.should_reset());
        let sent = transport.requests_to(HttpMethod::Post, paths::SUBSCRIBE);
        assert_eq!(sent[0].json_body(), Some(&json!({"email": "ana@example.com"})));
        let notice = notices.last().expect("notice shown");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, "Successfully subscribed!");
        Ok(())
    }

    #[tokio::test]
    async fn server_rejection_keeps_form() {
        let transport = ScriptedTransport::new();
        let notices = NoticeLog::new();
        transport.respond(
            HttpMethod::Post,
            paths::ENTER_GIVEAWAY,
            400,
            json!({"success": false, "message": "Already entered"}),
        );

        let outcome = submit_giveaway_entry(&transport, &notices, "ana@example.com").await;
        assert_eq!(outcome, FormOutcome::Rejected);
        assert_eq!(notices.last().map(|n| n.message), Some("Already entered".into()));
    }

    #[tokio::test]
    async fn network_failure_shows_generic_message() {
        let transport = ScriptedTransport::new();
        let notices = NoticeLog::new();
        transport.fail(HttpMethod::Post, paths::CONTACT, ApiError::Transport("offline".into()));

        let input = ContactInput {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "Do you ship abroad?".into(),
        };
        assert_eq!(submit_contact(&transport, &notices, &input).await, FormOutcome::Failed);
        let notice = notices.last().expect("notice shown");
        assert_eq!((notice.kind, notice.message.as_str()), (NoticeKind::Error, GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_server() {
        let transport = ScriptedTransport::new();
        let notices = NoticeLog::new();
        let input = ContactInput {
            name: "Ana".into(),
            ..ContactInput::default()
        };
        assert_eq!(submit_contact(&transport, &notices, &input).await, FormOutcome::Rejected);
        assert_eq!(submit_newsletter(&transport, &notices, "   ").await, FormOutcome::Rejected);
        assert!(transport.requests().is_empty());
        assert_eq!(notices.notices().len(), 2);
    }
}
