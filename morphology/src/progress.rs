//! Observer interface for reporting one-time construction progress.
//!
//! The dictionary, index and TF-IDF builders only see the [`Progress`] trait;
//! how (and whether) progress is rendered is the caller's concern. The
//! builders invoke [`Progress::advance`] at bounded intervals, never per item
//! of a tight inner loop.

use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress notifications from a long-running build step.
pub trait Progress {
    /// A build step starts. `total` is the number of expected units, when known.
    fn begin(&mut self, task: &str, total: Option<u64>);

    /// `delta` more units are done.
    fn advance(&mut self, delta: u64);

    /// The current build step is complete.
    fn finish(&mut self);
}

/// Discards all notifications. The default for tests and embedding callers.
#[derive(Debug, Default)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn begin(&mut self, _task: &str, _total: Option<u64>) {}
    fn advance(&mut self, _delta: u64) {}
    fn finish(&mut self) {}
}

/// Renders progress as a console bar (or a spinner when the total is unknown).
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for BarProgress {
    fn begin(&mut self, task: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
                    )
                    .unwrap()
                    .progress_chars("##-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.green} {msg} {pos}").unwrap(),
                );
                pb
            }
        };
        bar.set_message(task.to_string());
        self.bar = Some(bar);
    }

    fn advance(&mut self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
