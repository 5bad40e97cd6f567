use indicatif::style::TemplateError;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Batch progress: companies processed, successes and failures.
///
/// Hidden bars are used when logging is verbose, so every call here is always safe to make.
#[derive(Clone, Debug)]
pub struct BatchProgress {
    total: ProgressBar,
    success: ProgressBar,
    fails: ProgressBar,
}

impl BatchProgress {
    pub fn new(multi: &MultiProgress, len: usize) -> Result<Self, TemplateError> {
        // total number of companies to process
        let total = multi.add(
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.magenta} {wide_msg}\n \
                        {prefix:>9.white} |{bar:57.white/grey}| {pos:<2} / {human_len} \
                        ({percent}%) [Time: {elapsed}, ETA: {eta}]",
                    )?
                    .progress_chars("## "),
            ),
        );
        total.set_prefix("total");
        total.enable_steady_tick(Duration::from_millis(100));

        // companies that went through the whole lookup
        let success = multi.insert_after(
            &total,
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(" {prefix:>9.green} |{bar:57.green}| {pos:<2.green}")?
                    .progress_chars("## "),
            ),
        );
        success.set_prefix("successes");

        // companies that failed at some stage
        let fails = multi.insert_after(
            &success,
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(" {prefix:>9.red} |{bar:57.red}| {pos:<2.red}")?
                    .progress_chars("## "),
            ),
        );
        fails.set_prefix("failures");

        Ok(Self {
            total,
            success,
            fails,
        })
    }

    pub fn hidden() -> Self {
        Self {
            total: ProgressBar::hidden(),
            success: ProgressBar::hidden(),
            fails: ProgressBar::hidden(),
        }
    }

    pub(crate) fn start(&self, company: &str) {
        self.total.set_message(format!("processing {company} ..."));
    }

    pub(crate) fn succeeded(&self) {
        self.success.inc(1);
        self.total.inc(1);
    }

    pub(crate) fn failed(&self) {
        self.fails.inc(1);
        self.total.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.total.finish_and_clear();
        self.success.finish_and_clear();
        self.fails.finish_and_clear();
    }

    /// Counts so far: (processed, successes, failures).
    pub fn counts(&self) -> (u64, u64, u64) {
        (
            self.total.position(),
            self.success.position(),
            self.fails.position(),
        )
    }
}
