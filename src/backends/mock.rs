use super::{LlmBackend, LlmError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Echo the task back as a canned greeting.
    Echo,
    Text(String),
    Fail(LlmError),
}

/// Offline backend used by `--backend mock` and by tests.
pub struct MockBackend {
    reply: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_reply(MockReply::Echo)
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::with_reply(MockReply::Fail(error))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The (instructions, task) pair of the most recent call.
    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.last_prompt
            .lock()
            .ok()
            .and_then(|prompt| prompt.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn generate(&self, instructions: &str, task: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some((instructions.to_string(), task.to_string()));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Echo => Ok(format!("Mock greeting: {} ✨", task)),
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(error) => Err(error.clone()),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_reply_mentions_task() {
        let backend = MockBackend::new();

        let reply = backend.generate("be nice", "Greet Ali").await.unwrap();

        assert!(reply.contains("Greet Ali"));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn records_last_prompt() {
        let backend = MockBackend::replying("hi");
        assert!(backend.last_prompt().is_none());

        backend.generate("first", "one").await.unwrap();
        backend.generate("second", "two").await.unwrap();

        assert_eq!(
            backend.last_prompt(),
            Some(("second".to_string(), "two".to_string()))
        );
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_reply_returns_error() {
        let backend = MockBackend::failing(LlmError::NetworkError {
            message: "down".to_string(),
        });

        let error = backend.generate("i", "t").await.unwrap_err();

        match error {
            LlmError::NetworkError { message } => assert_eq!(message, "down"),
            other => panic!("expected the scripted network error, got {:?}", other),
        }
    }
}
