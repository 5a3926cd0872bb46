// ── ML analysis page state ──

use std::fmt;

use crate::model::{AnalysisOutcome, AnalysisParams};
use crate::report::AnalysisReport;

/// Form selection, the request in flight, and the last result or error.
#[derive(Debug, Clone, Default)]
pub struct AnalysisView {
    params: AnalysisParams,
    in_flight: bool,
    report: Option<AnalysisReport>,
    error: Option<String>,
}

impl AnalysisView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: AnalysisParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> AnalysisParams {
        self.params
    }

    /// Edit the form. Ignored while a request is in flight.
    pub fn update_params(&mut self, edit: impl FnOnce(&mut AnalysisParams)) {
        if !self.in_flight {
            edit(&mut self.params);
        }
    }

    /// Start a submission. Returns the parameters to send, or `None` if
    /// one is already in flight. Clears the previous result and error.
    pub fn submit(&mut self) -> Option<AnalysisParams> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.report = None;
        self.error = None;
        Some(self.params)
    }

    /// Record the response for the in-flight submission.
    pub fn finish<E: fmt::Display>(&mut self, result: Result<AnalysisOutcome, E>) {
        self.in_flight = false;
        match result {
            Ok(outcome) => {
                self.report = Some(AnalysisReport::from_outcome(&outcome));
                self.error = None;
            }
            Err(e) => {
                self.report = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
