use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time;

const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const CLEAR_LINE: &str = "\r\x1b[2K";

pub struct TerminalSpinner {
    message: String,
    stop_signal: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl TerminalSpinner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stop_signal: Arc::new(Notify::new()),
            task: None,
        }
    }

    pub fn start(&mut self) {
        // Only animate on a terminal; piped stderr would collect the frames
        if !io::stderr().is_terminal() {
            return;
        }
        self.start_on(io::stderr());
    }

    fn start_on<W>(&mut self, mut out: W)
    where
        W: Write + Send + 'static,
    {
        if self.task.is_some() {
            return;
        }

        let message = self.message.clone();
        let stop_signal = Arc::clone(&self.stop_signal);

        self.task = Some(tokio::spawn(async move {
            let mut frame = 0;
            loop {
                let spinner_char = BRAILLE_SPINNER[frame % BRAILLE_SPINNER.len()];
                let _ = write!(out, "\r{} {}", spinner_char, message);
                let _ = out.flush();
                frame += 1;

                tokio::select! {
                    _ = stop_signal.notified() => break,
                    _ = time::sleep(Duration::from_millis(80)) => {}
                }
            }

            let _ = write!(out, "{}", CLEAR_LINE);
            let _ = out.flush();
        }));
    }

    /// Stops the animation and waits until its line has been cleared, so
    /// nothing is drawn over output printed afterwards.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            self.stop_signal.notify_one();
            let _ = task.await;
        }
    }
}

impl Drop for TerminalSpinner {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.stop_signal.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let mut spinner = TerminalSpinner::new("Generating your greeting...");

        spinner.stop().await;

        assert!(spinner.task.is_none());
    }

    #[tokio::test]
    async fn nothing_is_drawn_after_stop_returns() {
        let buffer = SharedBuffer::default();
        let mut spinner = TerminalSpinner::new("Generating your greeting...");

        spinner.start_on(buffer.clone());
        time::sleep(Duration::from_millis(20)).await;
        spinner.stop().await;

        let after_stop = buffer.contents();
        assert!(after_stop.contains("Generating your greeting..."));
        assert!(after_stop.ends_with(CLEAR_LINE));

        // Longer than one animation frame
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(buffer.contents(), after_stop);
    }
}
