// ABOUTME: In-memory fakes for the text generator, rating sink, and token provider traits
// ABOUTME: Record every call so tests can assert on what the actions sent to the backends

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use startup_idea_generator::credentials::AccessTokenProvider;
use startup_idea_generator::llm::TextGenerator;
use startup_idea_generator::ratings::{RatingEvent, RatingSink};
use startup_idea_generator::{AppError, AppResult, ErrorCode};
use tokio::time::sleep;

/// Markdown with two top-level idea headers, as the model returns for a count of two
pub const TWO_FINTECH_IDEAS: &str = "# Idea 1: LedgerLoop\n\
**One-sentence pitch:** Autonomous bookkeeping for Bay Area seed-stage startups.\n\n\
# Idea 2: PayRail\n\
**One-sentence pitch:** Instant payroll rails for gig platforms.\n";

/// One recorded `generate` call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

enum Reply {
    Text(String),
    Fail(ErrorCode, String),
}

/// Text generator returning a fixed reply
pub struct FakeGenerator {
    reply: Mutex<Reply>,
    delay: Duration,
    calls: Mutex<Vec<GenerateCall>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::slow(text, Duration::ZERO)
    }

    /// Generator that takes `delay` before every reply, like a real model call
    pub fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Reply::Text(text.to_owned())),
            delay,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_next(&self, code: ErrorCode, message: &str) {
        *self.reply.lock().unwrap() = Reply::Fail(code, message.to_owned());
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn display_name(&self) -> &'static str {
        "Vertex AI"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> AppResult<String> {
        self.calls.lock().unwrap().push(GenerateCall {
            prompt: prompt.to_owned(),
            temperature,
            max_output_tokens,
        });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match &*self.reply.lock().unwrap() {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(code, message) => Err(AppError::new(*code, message.clone())),
        }
    }
}

/// Rating sink that keeps rows in memory
#[derive(Default)]
pub struct FakeRatingSink {
    fail: AtomicBool,
    events: Mutex<Vec<RatingEvent>>,
}

impl FakeRatingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Sink whose every append fails, as when the sheet is not shared
    pub fn unshared() -> Arc<Self> {
        let sink = Self::default();
        sink.fail.store(true, Ordering::SeqCst);
        Arc::new(sink)
    }

    /// Number of append attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<RatingEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl RatingSink for FakeRatingSink {
    async fn log_rating(&self, event: &RatingEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::new(
                ErrorCode::ResourceNotFound,
                "Spreadsheet 'Idea Generator Ratings' not found",
            ));
        }
        Ok(())
    }
}

/// Token provider with a fixed bearer token
pub struct StaticToken(pub &'static str);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.0.to_owned())
    }
}
