pub mod backends;
pub mod cli;
pub mod config;
pub mod console;
pub mod form;
pub mod greeting;
pub mod terminal_spinner;

pub use backends::{LlmBackend, LlmError, MockBackend, create_backend};
pub use config::{AppConfig, BackendConfig, ConfigError};
pub use console::{Console, VerbosityLevel, console, init_console};
pub use form::{Form, Submission};
pub use greeting::{
    Clock, ClockReading, DayBoundaries, FixedClock, Greeting, GreetingCategory, GreetingError,
    GreetingRequest, GreetingService, Languages, LocalClock, classify,
};
