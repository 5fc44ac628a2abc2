use super::{
    Clock, DayBoundaries, GreetingCategory, GreetingError, GreetingRequest, Languages, LocalClock,
    prompt,
};
use crate::backends::{LlmBackend, LlmError};
use crate::console::console;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A generated greeting and the category it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub category: GreetingCategory,
    pub text: String,
}

/// Composes greeting prompts and sends them to a generation backend.
///
/// The backend is created once at startup and shared; every call issues
/// exactly one request, bounded by `timeout`, with no retries.
pub struct GreetingService {
    backend: Arc<dyn LlmBackend>,
    clock: Arc<dyn Clock>,
    boundaries: DayBoundaries,
    languages: Languages,
    timeout: Duration,
}

impl GreetingService {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            clock: Arc::new(LocalClock),
            boundaries: DayBoundaries::default(),
            languages: Languages::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_boundaries(mut self, boundaries: DayBoundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_languages(mut self, languages: Languages) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    /// Category for the current local hour.
    pub fn current_category(&self) -> GreetingCategory {
        let reading = self.clock.now();
        let category = self.boundaries.classify(reading.hour());
        console().verbose(&format!(
            "Local hour {} classified as {}",
            reading.hour(),
            category
        ));
        category
    }

    /// Read the clock, classify it and request a greeting for `name`.
    pub async fn greet_now(&self, name: &str) -> Result<Greeting, GreetingError> {
        let request = GreetingRequest::new(name, self.current_category())?;
        let text = self.send(&request).await?;
        Ok(Greeting {
            category: request.category(),
            text,
        })
    }

    pub async fn request_greeting(
        &self,
        name: &str,
        category: GreetingCategory,
    ) -> Result<String, GreetingError> {
        let request = GreetingRequest::new(name, category)?;
        self.send(&request).await
    }

    async fn send(&self, request: &GreetingRequest) -> Result<String, GreetingError> {
        let instructions = prompt::instructions(request, &self.languages);
        let task = prompt::task(request);
        console().debug(&format!("Instructions: {}", instructions));
        console().debug(&format!("Task: {}", task));

        let started = Instant::now();
        let outcome =
            tokio::time::timeout(self.timeout, self.backend.generate(&instructions, &task)).await;
        console().verbose(&format!(
            "{} ({}) answered in {:.2?}",
            self.backend.backend_name(),
            self.backend.model_name(),
            started.elapsed()
        ));

        match outcome {
            Ok(result) => result.map_err(GreetingError::from),
            Err(_) => Err(GreetingError::Service(LlmError::Timeout {
                after: self.timeout,
            })),
        }
    }
}
