//! Outcome reporting.

use crate::events::{BuildEvent, EventSink};
use jerkins_core::BuildOutcome;
use std::sync::Arc;

/// Turns a finished build into user-facing status lines.
pub struct OutcomeReporter {
    sink: Arc<dyn EventSink>,
}

impl OutcomeReporter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Report the result of `outcome`.
    ///
    /// Only a `FAILURE` comes with a link to the console log under
    /// `base_url`, which is also returned. Unstable or aborted builds get no
    /// link.
    pub fn report(&self, outcome: &BuildOutcome, base_url: &str) -> Option<String> {
        self.sink.emit(BuildEvent::Finished {
            job: outcome.job_name.clone(),
            build_number: outcome.build_number,
            result: outcome.result.clone(),
        });

        if !outcome.result.is_failure() {
            return None;
        }

        let url = outcome.console_url(base_url);
        self.sink.emit(BuildEvent::ConsoleLink { url: url.clone() });
        Some(url)
    }
}
