//! Session state: the append-only conversation and the readiness flag

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Explicit session value owned by the controller. Lives for one session,
/// never persisted.
#[derive(Debug, Default)]
pub struct SessionState {
    pub messages: Vec<ChatMessage>,
    pub ready: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            ready: false,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Readiness is derived, never cached: true iff a document is present
    /// and the job description is non-empty after trimming.
    pub fn recompute_readiness(&mut self, has_resume: bool, job_text: &str) {
        self.ready = has_resume && !job_text.trim().is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty_and_not_ready() {
        let session = SessionState::new();
        assert!(session.messages.is_empty());
        assert!(!session.ready);
    }

    #[test]
    fn test_readiness_requires_both_inputs() {
        let mut session = SessionState::new();

        session.recompute_readiness(false, "");
        assert!(!session.ready);

        session.recompute_readiness(true, "");
        assert!(!session.ready);

        session.recompute_readiness(true, "   \n\t ");
        assert!(!session.ready);

        session.recompute_readiness(false, "Senior Rust Engineer");
        assert!(!session.ready);

        session.recompute_readiness(true, "Senior Rust Engineer");
        assert!(session.ready);
    }

    #[test]
    fn test_messages_append_in_order() {
        let mut session = SessionState::new();
        session.push_user("review my resume");
        session.push_assistant("Looks solid overall.");

        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(session.messages[0].content, "review my resume");
    }
}
