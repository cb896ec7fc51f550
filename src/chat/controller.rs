//! Conversation controller: orchestrates the per-turn pipeline
//!
//! One turn is one `handle_turn` call: the user message is appended first,
//! then extract -> compress -> build prompt -> generate runs, and exactly
//! one assistant message is appended whatever happens. `&mut self` keeps
//! turns strictly sequential, so the transcript stays append-only and
//! ordered without any locking.

use crate::chat::session::SessionState;
use crate::compress::ContextCompressor;
use crate::error::{Result, ResumeCoachError};
use crate::input::manager::InputManager;
use crate::llm::client::CompletionModel;
use crate::llm::prompts::{build_prompt, Mode};
use log::warn;
use std::path::{Path, PathBuf};

/// Fixed assistant reply when the session is not ready.
pub const NOT_READY_REPLY: &str = "Please upload a resume and Job Description first.";

pub struct ChatController<M, C> {
    session: SessionState,
    inputs: InputManager,
    model: M,
    compressor: C,
    mode: Mode,
    resume_path: Option<PathBuf>,
    job_text: String,
}

impl<M: CompletionModel, C: ContextCompressor> ChatController<M, C> {
    pub fn new(model: M, compressor: C) -> Self {
        Self {
            session: SessionState::new(),
            // Cache off: the document is re-extracted on every turn, the
            // same way the upload is re-read per submission.
            inputs: InputManager::new().with_cache(false),
            model,
            compressor,
            mode: Mode::default(),
            resume_path: None,
            job_text: String::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn resume_path(&self) -> Option<&Path> {
        self.resume_path.as_deref()
    }

    pub fn set_resume(&mut self, path: PathBuf) {
        self.resume_path = Some(path);
        self.refresh_readiness();
    }

    pub fn set_job_description(&mut self, text: String) {
        self.job_text = text;
        self.refresh_readiness();
    }

    pub fn is_ready(&self) -> bool {
        self.session.ready
    }

    fn refresh_readiness(&mut self) {
        let has_resume = self.resume_path.is_some();
        self.session.recompute_readiness(has_resume, &self.job_text);
    }

    /// Run one turn and return the assistant reply text. The conversation
    /// always grows by exactly two messages: user, then assistant.
    pub async fn handle_turn(&mut self, input: &str) -> String {
        self.session.push_user(input);

        // Gate on freshly derived readiness, never a stale flag.
        self.refresh_readiness();
        let reply = if !self.session.ready {
            NOT_READY_REPLY.to_string()
        } else {
            match self.run_pipeline(input).await {
                Ok(text) => text,
                Err(e) => render_turn_error(&e),
            }
        };

        self.session.push_assistant(reply.clone());
        reply
    }

    async fn run_pipeline(&mut self, input: &str) -> Result<String> {
        // The required credential gates everything: fail before any
        // extraction or compression work is attempted.
        self.model.ensure_configured()?;

        let resume_path = self
            .resume_path
            .clone()
            .ok_or_else(|| ResumeCoachError::Extraction("no resume document set".to_string()))?;

        let resume_text = self
            .inputs
            .extract_text(&resume_path)
            .await
            .map_err(|e| {
                warn!("Resume extraction failed: {}", e);
                ResumeCoachError::Extraction(e.to_string())
            })?;
        // A document where every page yields nothing is as unusable as an
        // unreadable one.
        if resume_text.trim().is_empty() {
            return Err(ResumeCoachError::Extraction(
                "resume document yielded no text".to_string(),
            ));
        }

        let compressed = self.compressor.compress(&self.job_text).await;
        let prompt = build_prompt(self.mode, &compressed.text, &resume_text, input);
        let completion = self.model.complete(&prompt).await?;

        Ok(format!("> *{}*\n\n{}", compressed.status, completion))
    }
}

/// Every turn ends with exactly one assistant message; failed turns get a
/// formatted error string in its place.
fn render_turn_error(err: &ResumeCoachError) -> String {
    match err {
        ResumeCoachError::Configuration(msg) => format!("Error: {}", msg),
        ResumeCoachError::Extraction(_) | ResumeCoachError::PdfExtraction(_) => {
            "Error: Could not read resume PDF.".to_string()
        }
        ResumeCoachError::EmptyCompletion => "Gemini returned no text.".to_string(),
        ResumeCoachError::Generation(msg) => format!("Gemini Error: {}", msg),
        other => format!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::session::Role;
    use crate::compress::{CompressionOutcome, CompressionStatus};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FakeModel {
        configured: bool,
        reply: Option<String>,
        calls: Arc<AtomicUsize>,
        last_prompt: Arc<Mutex<String>>,
    }

    impl FakeModel {
        fn new(reply: Option<&str>) -> Self {
            Self {
                configured: true,
                reply: reply.map(str::to_string),
                calls: Arc::new(AtomicUsize::new(0)),
                last_prompt: Arc::new(Mutex::new(String::new())),
            }
        }

        fn unconfigured() -> Self {
            let mut model = Self::new(Some("unused"));
            model.configured = false;
            model
        }
    }

    impl CompletionModel for FakeModel {
        fn ensure_configured(&self) -> Result<()> {
            if self.configured {
                Ok(())
            } else {
                Err(ResumeCoachError::Configuration(
                    "GEMINI_API_KEY is missing from the environment".to_string(),
                ))
            }
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.ensure_configured()?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(ResumeCoachError::EmptyCompletion),
            }
        }
    }

    struct FakeCompressor {
        calls: Arc<AtomicUsize>,
    }

    impl FakeCompressor {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ContextCompressor for FakeCompressor {
        async fn compress(&self, text: &str) -> CompressionOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CompressionOutcome {
                text: text.to_string(),
                status: CompressionStatus::SkippedMissingCredential {
                    key_env: "SCALEDOWN_API_KEY".to_string(),
                },
            }
        }
    }

    fn write_temp_resume(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_not_ready_turn_appends_fixed_reply_without_pipeline() {
        let model = FakeModel::new(Some("never seen"));
        let model_calls = model.calls.clone();
        let compressor = FakeCompressor::new();
        let compressor_calls = compressor.calls.clone();

        let mut controller = ChatController::new(model, compressor);
        let reply = controller.handle_turn("Hi").await;

        assert_eq!(reply, NOT_READY_REPLY);
        assert_eq!(controller.session().messages.len(), 2);
        assert_eq!(controller.session().messages[0].role, Role::User);
        assert_eq!(controller.session().messages[1].role, Role::Assistant);
        assert_eq!(model_calls.load(Ordering::SeqCst), 0);
        assert_eq!(compressor_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_turn_prefixes_compression_status() {
        let resume = write_temp_resume("Jane Doe, Rust engineer since 2018.");
        let model = FakeModel::new(Some("Strong fit overall."));
        let mut controller = ChatController::new(model, FakeCompressor::new());
        controller.set_resume(resume.path().to_path_buf());
        controller.set_job_description("Senior Rust Engineer, async services".to_string());

        let reply = controller.handle_turn("Review my resume").await;

        assert_eq!(
            reply,
            "> *Skipped (Missing SCALEDOWN_API_KEY)*\n\nStrong fit overall."
        );
        assert_eq!(controller.session().messages.len(), 2);
        assert_eq!(controller.session().messages[1].content, reply);
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits_before_extraction() {
        let compressor = FakeCompressor::new();
        let compressor_calls = compressor.calls.clone();
        let mut controller = ChatController::new(FakeModel::unconfigured(), compressor);
        // A path that does not exist: if extraction ran, the reply would be
        // the extraction error instead of the configuration one.
        controller.set_resume(PathBuf::from("/nonexistent/resume.txt"));
        controller.set_job_description("Any role".to_string());

        let reply = controller.handle_turn("Hello").await;

        assert_eq!(
            reply,
            "Error: GEMINI_API_KEY is missing from the environment"
        );
        assert_eq!(compressor_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_resume_aborts_before_compression() {
        let resume = write_temp_resume("   \n\t  ");
        let model = FakeModel::new(Some("never seen"));
        let model_calls = model.calls.clone();
        let compressor = FakeCompressor::new();
        let compressor_calls = compressor.calls.clone();

        let mut controller = ChatController::new(model, compressor);
        controller.set_resume(resume.path().to_path_buf());
        controller.set_job_description("Backend role".to_string());

        let reply = controller.handle_turn("Review my resume").await;

        assert_eq!(reply, "Error: Could not read resume PDF.");
        assert_eq!(controller.session().messages.len(), 2);
        assert_eq!(model_calls.load(Ordering::SeqCst), 0);
        assert_eq!(compressor_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_completion_is_reported_as_no_text() {
        let resume = write_temp_resume("Jane Doe, Rust engineer.");
        let mut controller = ChatController::new(FakeModel::new(None), FakeCompressor::new());
        controller.set_resume(resume.path().to_path_buf());
        controller.set_job_description("Backend role".to_string());

        let reply = controller.handle_turn("Review my resume").await;

        assert_eq!(reply, "Gemini returned no text.");
    }

    #[tokio::test]
    async fn test_interviewer_mode_shapes_the_prompt() {
        let resume = write_temp_resume("Jane Doe, Rust engineer.");
        let model = FakeModel::new(Some("What is a pinned future?"));
        let last_prompt = model.last_prompt.clone();

        let mut controller = ChatController::new(model, FakeCompressor::new());
        controller.set_resume(resume.path().to_path_buf());
        controller.set_job_description("Senior Rust Engineer".to_string());
        controller.set_mode(Mode::HiringManager);

        controller.handle_turn("Hi").await;

        let prompt = last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("ask exactly one challenging technical question"));
        assert!(prompt.contains("Do not provide help or coaching."));
        assert!(prompt.contains("USER INPUT: \"Hi\""));
    }

    #[tokio::test]
    async fn test_session_survives_a_failed_turn() {
        let resume = write_temp_resume("Jane Doe, Rust engineer.");
        let model = FakeModel::new(Some("Strong fit."));
        let mut controller = ChatController::new(model, FakeCompressor::new());
        controller.set_job_description("Backend role".to_string());

        // First turn fails readiness (no resume yet), second succeeds.
        let first = controller.handle_turn("Review my resume").await;
        assert_eq!(first, NOT_READY_REPLY);

        controller.set_resume(resume.path().to_path_buf());
        let second = controller.handle_turn("Review my resume").await;
        assert!(second.ends_with("Strong fit."));
        assert_eq!(controller.session().messages.len(), 4);
    }
}
