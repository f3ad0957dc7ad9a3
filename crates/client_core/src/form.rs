use shared::domain::{Identity, ReportDraft, SubmissionOutcome};
use thiserror::Error;

use crate::submit::SubmissionWorkflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormSubmitError {
    #[error("a submission is already in flight for this form")]
    AlreadyInFlight,
    #[error("all required fields must be filled in")]
    IncompleteDraft,
}

/// One submission form's state: the single mutable [`ReportDraft`] owned for
/// the form lifetime, the single-flight guard, and the last outcome message
/// shown to the user.
pub struct DraftForm {
    draft: ReportDraft,
    collect_office_time: bool,
    in_flight: bool,
    message: Option<String>,
}

impl DraftForm {
    pub fn new(collect_office_time: bool) -> Self {
        Self {
            draft: ReportDraft::new_today(),
            collect_office_time,
            in_flight: false,
            message: None,
        }
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    /// Field-by-field edits from user input.
    pub fn draft_mut(&mut self) -> &mut ReportDraft {
        &mut self.draft
    }

    /// Whether the UI should disable the submit control.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// The rendered text of the last submission outcome, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.draft.is_complete(self.collect_office_time)
    }

    /// Validates the draft and arms the single-flight guard, handing back a
    /// snapshot for the workflow. Callers that share the form across an
    /// await point release the borrow between this and [`finish_submit`];
    /// a second `begin_submit` while one is outstanding is refused.
    pub fn begin_submit(&mut self) -> Result<ReportDraft, FormSubmitError> {
        if self.in_flight {
            return Err(FormSubmitError::AlreadyInFlight);
        }
        if !self.draft.is_complete(self.collect_office_time) {
            return Err(FormSubmitError::IncompleteDraft);
        }
        self.in_flight = true;
        Ok(self.draft.clone())
    }

    /// Applies one submission's outcome: content fields are cleared whenever
    /// the report was durably saved (full or partial success) and kept as
    /// typed on a persistence failure so the user can retry.
    pub fn finish_submit(&mut self, outcome: SubmissionOutcome) {
        self.in_flight = false;
        if outcome.report_saved() {
            self.draft.clear_content();
        }
        self.message = Some(outcome.user_message().to_string());
    }

    /// Validates and submits the current draft in one call.
    pub async fn submit(
        &mut self,
        workflow: &SubmissionWorkflow,
        identity: &Identity,
    ) -> Result<SubmissionOutcome, FormSubmitError> {
        let draft = self.begin_submit()?;
        let outcome = workflow.submit(&draft, identity).await;
        self.finish_submit(outcome);
        Ok(outcome)
    }
}
