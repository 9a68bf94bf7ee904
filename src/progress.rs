// src/progress.rs
/// Lightweight progress reporting for an update run.
/// Frontends implement this to surface status to users; the log file gets
/// the details either way.
pub trait Progress {
    /// Called at the start of a phase with the number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One unit finished (a page fetched, an event resolved).
    fn item_done(&mut self, _label: &str) {}

    /// One unit came back empty; it will be retried next run.
    fn item_failed(&mut self, _label: &str) {}

    /// Called at the end of a phase, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Prints to stdout, one line per event.
pub struct ConsoleProgress {
    pub verbose: bool,
    total: usize,
    done: usize,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, total: 0, done: 0 }
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, label: &str) {
        self.done += 1;
        if self.verbose {
            println!("  [{}/{}] {label}", self.done, self.total);
        }
    }

    fn item_failed(&mut self, label: &str) {
        self.done += 1;
        if self.verbose {
            println!("  [{}/{}] {label}: nothing yet", self.done, self.total);
        }
    }
}
