use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// Where a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Loop,
    Telemetry,
    System,
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSource::Loop => write!(f, "LOOP"),
            LogSource::Telemetry => write!(f, "TELEMETRY"),
            LogSource::System => write!(f, "SYSTEM"),
        }
    }
}

// Shared diagnostic log, bounded ring of tagged lines
#[derive(Clone)]
pub struct DiagnosticLog {
    entries: Arc<RwLock<VecDeque<String>>>,
    max_size: usize,
    echo: bool,
    started: Instant,
}

impl DiagnosticLog {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_size))),
            max_size: max_size.max(1),
            echo: false,
            started: Instant::now(),
        }
    }

    /// Also print every line to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn log(&self, source: LogSource, message: impl AsRef<str>) {
        let line = format!(
            "[{:7.3}s] [{}] {}",
            self.started.elapsed().as_secs_f64(),
            source,
            message.as_ref()
        );
        if self.echo {
            println!("{}", line);
        }
        self.write(line);
    }

    pub fn write(&self, message: String) {
        let mut log = self.entries.write();
        log.push_back(message);
        if log.len() > self.max_size {
            log.pop_front();
        }
    }

    pub fn read_all(&self) -> Vec<String> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.read().iter().any(|line| line.contains(needle))
    }
}
