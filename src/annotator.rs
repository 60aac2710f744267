//! Conversation banner injection for flagged sessions.

use crate::session::SessionStatus;
use crate::store::SessionStore;
use tracing::debug;

/// Banner prepended once a session's circuit is open.
pub const HARD_LIMIT_BANNER: &str = "[guardrail] A resource limit was reached for this session. \
Do not call any more tools. Summarize the work completed so far and finish.";

/// Banner prepended while a session is in the warned state.
pub const WARNING_BANNER: &str = "[guardrail] This session is approaching its resource limits. \
Wrap up the current task and avoid unnecessary tool calls.";

/// One outgoing conversation message as seen by the annotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Session the message belongs to, when the host attributed it.
    pub session_id: Option<String>,
    /// Text segment, if the message carries one.
    pub text: Option<String>,
}

impl OutboundMessage {
    /// Message attributed to a session.
    #[must_use]
    pub fn attributed(session_id: &str, text: &str) -> Self {
        Self {
            session_id: Some(session_id.to_string()),
            text: Some(text.to_string()),
        }
    }

    /// Message with a text segment but no session attribution.
    #[must_use]
    pub fn unattributed(text: &str) -> Self {
        Self {
            session_id: None,
            text: Some(text.to_string()),
        }
    }
}

/// Prepend the relevant banner to the newest message of a batch.
///
/// The relevant session is the one attached to the newest message; messages
/// without attribution fall back to the most recently flagged session, which
/// covers ordering gaps between the tool hooks and the message hook. A batch
/// whose session is not flagged, or whose newest message has no text
/// segment, is left untouched. Original content is only ever prefixed.
pub(crate) fn annotate(store: &SessionStore, messages: &mut [OutboundMessage]) {
    let Some(newest) = messages.last_mut() else {
        return;
    };

    let status = match newest.session_id.as_deref() {
        Some(id) => store.status_of(id),
        None => store.most_recent_flagged(),
    };

    let banner = match status {
        Some(SessionStatus::Blocked(_)) => HARD_LIMIT_BANNER,
        Some(SessionStatus::Warned) => WARNING_BANNER,
        Some(SessionStatus::Normal) | None => return,
    };

    if let Some(text) = newest.text.as_mut() {
        debug!(
            session_id = newest.session_id.as_deref().unwrap_or("<fallback>"),
            "guardrail annotator: banner injected"
        );
        *text = format!("{banner}\n\n{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::{annotate, OutboundMessage, HARD_LIMIT_BANNER, WARNING_BANNER};
    use crate::error::TrippedLimit;
    use crate::store::SessionStore;
    use chrono::Utc;

    fn flagged_store(id: &str, blocked: bool) -> SessionStore {
        let store = SessionStore::new();
        store.upsert_with(id, "coder", |session| {
            if blocked {
                session.block(TrippedLimit::ToolCalls { current: 5, max: 5 }, Utc::now());
            } else {
                session.warn(Utc::now());
            }
        });
        store
    }

    #[test]
    fn blocked_session_gets_the_hard_banner() {
        let store = flagged_store("s1", true);
        let mut batch = vec![OutboundMessage::attributed("s1", "original")];
        annotate(&store, &mut batch);
        let text = batch[0].text.as_deref().expect("text segment");
        assert!(text.starts_with(HARD_LIMIT_BANNER));
        assert!(text.ends_with("original"));
    }

    #[test]
    fn warned_session_gets_the_warning_banner() {
        let store = flagged_store("s1", false);
        let mut batch = vec![OutboundMessage::attributed("s1", "original")];
        annotate(&store, &mut batch);
        let text = batch[0].text.as_deref().expect("text segment");
        assert!(text.starts_with(WARNING_BANNER));
    }

    #[test]
    fn unattributed_message_falls_back_to_the_flagged_session() {
        let store = flagged_store("s1", true);
        let mut batch = vec![OutboundMessage::unattributed("original")];
        annotate(&store, &mut batch);
        let text = batch[0].text.as_deref().expect("text segment");
        assert!(text.starts_with(HARD_LIMIT_BANNER));
    }

    #[test]
    fn normal_session_is_left_untouched_twice() {
        let store = SessionStore::new();
        store.upsert_with("s1", "coder", |_| {});
        let original = vec![OutboundMessage::attributed("s1", "original")];

        let mut batch = original.clone();
        annotate(&store, &mut batch);
        annotate(&store, &mut batch);
        assert_eq!(batch, original);
    }

    #[test]
    fn message_without_text_segment_is_skipped() {
        let store = flagged_store("s1", true);
        let mut batch = vec![OutboundMessage {
            session_id: Some("s1".to_string()),
            text: None,
        }];
        annotate(&store, &mut batch);
        assert_eq!(batch[0].text, None);
    }

    #[test]
    fn only_the_newest_message_is_annotated() {
        let store = flagged_store("s1", true);
        let mut batch = vec![
            OutboundMessage::attributed("s1", "older"),
            OutboundMessage::attributed("s1", "newest"),
        ];
        annotate(&store, &mut batch);
        assert_eq!(batch[0].text.as_deref(), Some("older"));
        assert!(batch[1]
            .text
            .as_deref()
            .expect("text segment")
            .starts_with(HARD_LIMIT_BANNER));
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let store = flagged_store("s1", true);
        let mut batch: Vec<OutboundMessage> = Vec::new();
        annotate(&store, &mut batch);
        assert!(batch.is_empty());
    }
}
