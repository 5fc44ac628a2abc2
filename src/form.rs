use crate::console::{Console, console};
use crate::greeting::{Greeting, GreetingError, GreetingService};
use crate::terminal_spinner::TerminalSpinner;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Outcome of pressing submit once.
#[derive(Debug)]
pub enum Submission {
    Greeting(Greeting),
    /// Rejected before any request was made.
    Invalid(GreetingError),
    Failed(GreetingError),
}

impl Submission {
    pub fn is_success(&self) -> bool {
        matches!(self, Submission::Greeting(_))
    }
}

/// A single-field terminal form: enter a name, get a greeting.
pub struct Form {
    service: GreetingService,
    console: Arc<Console>,
}

impl Form {
    pub fn new(service: GreetingService) -> Self {
        Self {
            service,
            console: console(),
        }
    }

    pub fn with_console(mut self, console: Arc<Console>) -> Self {
        self.console = console;
        self
    }

    pub fn service(&self) -> &GreetingService {
        &self.service
    }

    pub async fn submit(&self, name: &str) -> Submission {
        if name.trim().is_empty() {
            return Submission::Invalid(GreetingError::EmptyName);
        }

        let mut spinner = TerminalSpinner::new("Generating your greeting...");
        spinner.start();
        let result = self.service.greet_now(name).await;
        spinner.stop().await;

        match result {
            Ok(greeting) => Submission::Greeting(greeting),
            Err(e) if e.is_validation() => Submission::Invalid(e),
            Err(e) => Submission::Failed(e),
        }
    }

    pub fn render(&self, submission: &Submission) {
        match submission {
            Submission::Greeting(greeting) => {
                self.console.verbose(&format!("Category: {}", greeting.category));
                self.console.greeting(&greeting.text);
            }
            Submission::Invalid(e) => self.console.warning(&e.to_string()),
            Submission::Failed(e) => self.console.error(&format!("An error occurred: {}", e)),
        }
    }

    /// Read names line by line until EOF or an exit word, submitting each one.
    /// Returns the number of submissions made.
    pub async fn run<R>(&self, mut reader: R) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = String::new();
        let mut submissions = 0;

        loop {
            self.console.prompt("Enter your name:")?;

            line.clear();
            let read = reader
                .read_line(&mut line)
                .await
                .context("Error reading input")?;
            if read == 0 {
                break;
            }

            let input = line.trim();
            if matches!(input, "exit" | "quit" | "q") {
                self.console.goodbye();
                break;
            }

            let submission = self.submit(input).await;
            self.render(&submission);
            self.console.newline();
            submissions += 1;
        }

        Ok(submissions)
    }
}
