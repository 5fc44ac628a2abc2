use colored::Colorize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock};

/// Verbosity levels for console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    /// Only errors, warnings and the greeting itself
    Quiet = 0,
    /// Normal output (default)
    #[default]
    Normal = 1,
    /// Verbose output with additional info
    Verbose = 2,
    /// Debug output with detailed information
    Debug = 3,
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerbosityLevel::Quiet => write!(f, "quiet"),
            VerbosityLevel::Normal => write!(f, "normal"),
            VerbosityLevel::Verbose => write!(f, "verbose"),
            VerbosityLevel::Debug => write!(f, "debug"),
        }
    }
}

impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(VerbosityLevel::Quiet),
            "normal" => Ok(VerbosityLevel::Normal),
            "verbose" => Ok(VerbosityLevel::Verbose),
            "debug" => Ok(VerbosityLevel::Debug),
            _ => Err(format!(
                "Invalid verbosity level '{}'. Valid options: quiet, normal, verbose, debug",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Console {
    verbosity: VerbosityLevel,
    capture: Option<Arc<Mutex<String>>>,
}

impl Console {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            capture: None,
        }
    }

    /// A console that appends everything it would print to the returned buffer.
    pub fn capturing(verbosity: VerbosityLevel) -> (Self, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        let console = Self {
            verbosity,
            capture: Some(Arc::clone(&buffer)),
        };
        (console, buffer)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    fn should_show(&self, level: VerbosityLevel) -> bool {
        self.verbosity >= level
    }

    fn emit(&self, text: &str, newline: bool, to_stderr: bool) {
        if let Some(ref capture) = self.capture {
            if let Ok(mut buffer) = capture.lock() {
                buffer.push_str(text);
                if newline {
                    buffer.push('\n');
                }
            }
            return;
        }

        match (to_stderr, newline) {
            (true, true) => eprintln!("{}", text),
            (true, false) => eprint!("{}", text),
            (false, true) => println!("{}", text),
            (false, false) => print!("{}", text),
        }
    }

    fn out(&self, text: &str) {
        self.emit(text, true, false);
    }

    /// Shown at every verbosity, on stderr.
    pub fn error(&self, message: &str) {
        self.emit(&format!("❌ {}", message.red()), true, true);
    }

    /// Shown at every verbosity, on stderr: warnings report rejected input.
    pub fn warning(&self, message: &str) {
        self.emit(&format!("⚠️  {}", message.yellow()), true, true);
    }

    pub fn success(&self, message: &str) {
        if self.should_show(VerbosityLevel::Normal) {
            self.out(&format!("✅ {}", message.green()));
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.should_show(VerbosityLevel::Verbose) {
            self.out(&message.dimmed().to_string());
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show(VerbosityLevel::Debug) {
            self.out(&format!("🐛 DEBUG: {}", message));
        }
    }

    pub fn plain(&self, message: &str) {
        if self.should_show(VerbosityLevel::Normal) {
            self.out(message);
        }
    }

    pub fn newline(&self) {
        if self.should_show(VerbosityLevel::Normal) {
            self.out("");
        }
    }

    /// Prints a field label without a newline and flushes stdout.
    pub fn prompt(&self, label: &str) -> io::Result<()> {
        if self.should_show(VerbosityLevel::Normal) {
            self.emit(&format!("{} ", label.bold()), false, false);
            if self.capture.is_none() {
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    pub fn banner(&self, backend_name: &str) {
        if self.should_show(VerbosityLevel::Normal) {
            self.out(&"🕰️  Time-Based Greeting Agent".magenta().bold().to_string());
            self.out("Get a warm greeting based on your local time 🌞🌙");
            self.out(&format!("Using backend: {}", backend_name).dimmed().to_string());
            self.out(
                &"Press Enter to submit. Type 'exit', 'quit', or Ctrl+C to quit."
                    .dimmed()
                    .to_string(),
            );
            self.out("");
        }
    }

    /// The generated greeting always prints, even in quiet mode: it is the
    /// program's output.
    pub fn greeting(&self, text: &str) {
        if self.should_show(VerbosityLevel::Normal) {
            self.out(&"Here is your time-based greeting:".green().to_string());
            self.out(&format!("📨 {}", text.bold()));
        } else {
            self.out(text);
        }
    }

    pub fn goodbye(&self) {
        if self.should_show(VerbosityLevel::Normal) {
            self.out("👋 Goodbye!");
        }
    }
}

static GLOBAL_CONSOLE: OnceLock<Arc<Console>> = OnceLock::new();

pub fn init_console(verbosity: VerbosityLevel) {
    let _ = GLOBAL_CONSOLE.set(Arc::new(Console::new(verbosity)));
}

/// The process-wide console. Falls back to normal verbosity when
/// `init_console` has not run, as in library tests.
pub fn console() -> Arc<Console> {
    GLOBAL_CONSOLE
        .get_or_init(|| Arc::new(Console::default()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert!(VerbosityLevel::Quiet < VerbosityLevel::Normal);
        assert!(VerbosityLevel::Normal < VerbosityLevel::Verbose);
        assert!(VerbosityLevel::Verbose < VerbosityLevel::Debug);
    }

    #[test]
    fn test_console_should_show() {
        let console = Console::new(VerbosityLevel::Normal);

        assert!(!console.should_show(VerbosityLevel::Verbose));
        assert!(console.should_show(VerbosityLevel::Normal));
        assert!(!console.should_show(VerbosityLevel::Debug));
    }

    #[test]
    fn test_quiet_console_hides_normal_output() {
        let console = Console::new(VerbosityLevel::Quiet);

        assert!(!console.should_show(VerbosityLevel::Normal));
        assert!(console.should_show(VerbosityLevel::Quiet));
    }

    #[test]
    fn test_quiet_console_still_reports_warnings_and_errors() {
        let (console, captured) = Console::capturing(VerbosityLevel::Quiet);

        console.plain("hidden");
        console.warning("Please enter your name.");
        console.error("An error occurred: boom");

        let text = captured.lock().unwrap().clone();
        assert!(!text.contains("hidden"));
        assert!(text.contains("Please enter your name."));
        assert!(text.contains("An error occurred: boom"));
    }

    #[test]
    fn test_quiet_console_prints_bare_greeting() {
        let (console, captured) = Console::capturing(VerbosityLevel::Quiet);

        console.greeting("Salam, Ali!");

        assert_eq!(captured.lock().unwrap().as_str(), "Salam, Ali!\n");
    }

    #[test]
    fn test_verbosity_display() {
        assert_eq!(VerbosityLevel::Quiet.to_string(), "quiet");
        assert_eq!(VerbosityLevel::Normal.to_string(), "normal");
        assert_eq!(VerbosityLevel::Verbose.to_string(), "verbose");
        assert_eq!(VerbosityLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_verbosity_from_str() {
        assert_eq!("DEBUG".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Debug));
        assert_eq!("quiet".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Quiet));
        assert!("loud".parse::<VerbosityLevel>().is_err());
    }
}
