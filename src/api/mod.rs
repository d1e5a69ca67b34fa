//! High-level library API: read a CSV file, map its rows to cases, render the
//! case form and submit it to the receiver. Prefer these entrypoints over the
//! lower-level `core` and `io` modules when integrating hqsubmit.
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::mapper::CaseMapper;
use crate::core::settings::SubmissionSettings;
use crate::error::{Error, Result};
use crate::io::form::{FormRenderer, RenderedForm};
use crate::io::records::RecordReader;
use crate::io::response::interpret_response;
use crate::io::transport::{HttpTransport, Transport, reason_phrase, receiver_url};
use crate::types::{Case, SubmissionOutcome};

/// How cases are grouped into forms
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum SubmitMode {
    /// All cases in one form, one request
    #[default]
    Batch,
    /// One form and one request per case
    PerRecord,
}

/// Outcomes of every request made in one run, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub cases: usize,
    pub outcomes: Vec<SubmissionOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when at least one request was made and all of them succeeded.
    pub fn success(&self) -> bool {
        !self.outcomes.is_empty() && self.failed() == 0
    }
}

/// Read all rows of `csv_path` and map them to cases, in file order.
///
/// The file is closed before this returns, whether or not mapping succeeded.
pub fn read_cases<P: AsRef<Path>>(csv_path: P, mapper: &CaseMapper) -> Result<Vec<Case>> {
    let cases = mapper.map_all(RecordReader::open(csv_path)?)?;
    if cases.is_empty() {
        return Err(Error::Input {
            row: 0,
            message: "input contains no data rows".to_string(),
        });
    }
    info!("Mapped {} case(s)", cases.len());
    Ok(cases)
}

pub struct SubmissionPipeline<T: Transport> {
    settings: SubmissionSettings,
    mapper: CaseMapper,
    renderer: FormRenderer,
    transport: T,
}

impl SubmissionPipeline<HttpTransport> {
    /// Load the configured template and build the HTTP client.
    pub fn from_settings(settings: SubmissionSettings) -> Result<Self> {
        let renderer = FormRenderer::from_path(&settings.template_path)?;
        let transport = HttpTransport::new(settings.timeout)?;
        Ok(Self::new(settings, renderer, transport))
    }
}

impl<T: Transport> SubmissionPipeline<T> {
    pub fn new(settings: SubmissionSettings, renderer: FormRenderer, transport: T) -> Self {
        let mapper = CaseMapper::new(settings.case.clone());
        Self {
            settings,
            mapper,
            renderer,
            transport,
        }
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }

    pub fn receiver_url(&self) -> String {
        receiver_url(&self.settings.base_url, &self.settings.project_space)
    }

    pub fn read_cases<P: AsRef<Path>>(&self, csv_path: P) -> Result<Vec<Case>> {
        read_cases(csv_path, &self.mapper)
    }

    /// Render the forms for `cases`. Each form gets its own submission id, so a
    /// retried request must be rendered again rather than resent.
    pub fn render(&self, cases: &[Case], mode: SubmitMode) -> Result<Vec<RenderedForm>> {
        match mode {
            SubmitMode::Batch => Ok(vec![self.renderer.render(&self.settings.form, cases)?]),
            SubmitMode::PerRecord => cases
                .iter()
                .map(|case| {
                    self.renderer
                        .render(&self.settings.form, std::slice::from_ref(case))
                })
                .collect(),
        }
    }

    /// POST one rendered form and interpret the reply.
    ///
    /// Transport failures, non-2xx statuses, unparseable bodies and refusals
    /// by the remote service are all returned as errors.
    pub fn try_submit(&self, xform: &str) -> Result<SubmissionOutcome> {
        let reply = self
            .transport
            .post(&self.receiver_url(), xform, &self.settings.credentials)?;

        if !reply.is_success() {
            return Err(Error::RemoteRejection {
                status: reply.status,
                reason: reason_phrase(reply.status),
            });
        }

        let outcome = interpret_response(&reply.body)?;
        if outcome.success {
            Ok(outcome)
        } else {
            Err(Error::RemoteFailure(outcome.message))
        }
    }

    /// POST one rendered form; every failure is folded into the outcome.
    pub fn submit(&self, xform: &str) -> SubmissionOutcome {
        match self.try_submit(xform) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Submission failed: {}", e);
                e.outcome()
            }
        }
    }

    /// Read, map and render everything first, then submit the forms in order.
    ///
    /// Input and render errors abort before any request is made. Once
    /// submitting, a failed form does not stop the ones after it.
    pub fn run<P: AsRef<Path>>(&self, csv_path: P, mode: SubmitMode) -> Result<BatchReport> {
        let cases = self.read_cases(csv_path)?;
        let forms = self.render(&cases, mode)?;

        let mut report = BatchReport {
            cases: cases.len(),
            outcomes: Vec::with_capacity(forms.len()),
        };
        for form in &forms {
            info!("Submitting form {}", form.submission_id);
            report.outcomes.push(self.submit(&form.xml));
        }

        info!(
            "Submission complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    /// Read, map and render without contacting the receiver.
    pub fn dry_run<P: AsRef<Path>>(&self, csv_path: P, mode: SubmitMode) -> Result<Vec<RenderedForm>> {
        let cases = self.read_cases(csv_path)?;
        self.render(&cases, mode)
    }
}
