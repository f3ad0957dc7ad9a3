use std::sync::Arc;

use notify::Notifier;
use shared::domain::{
    FailureReason, Identity, PartialFailureReason, ReportDraft, ReportFields, SubmissionOutcome,
};
use tracing::{error, warn};

use crate::store::ReportStore;

/// Orchestrates one report submission: a durable write chained with a
/// best-effort notification, reduced to a single [`SubmissionOutcome`].
pub struct SubmissionWorkflow {
    store: Arc<dyn ReportStore>,
    notifier: Arc<dyn Notifier>,
    /// Operator-configured notification recipient. Absence degrades the
    /// notification step, never the durable write.
    recipient: Option<String>,
}

impl SubmissionWorkflow {
    pub fn new(
        store: Arc<dyn ReportStore>,
        notifier: Arc<dyn Notifier>,
        recipient: Option<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            recipient,
        }
    }

    /// Persists a report built from `draft` for `identity`, then dispatches
    /// the notification. Exactly one store write, at most one send, a single
    /// attempt at each; invoking twice creates two reports.
    ///
    /// The caller validates the draft and authenticates the identity before
    /// calling; an incomplete draft here is a logic error, not an outcome.
    pub async fn submit(&self, draft: &ReportDraft, identity: &Identity) -> SubmissionOutcome {
        debug_assert!(
            draft.is_complete(false),
            "caller must validate the draft before submitting"
        );

        let fields = draft.fields();
        let report_id = match self.store.create(&identity.id, &fields).await {
            Ok(id) => id,
            Err(e) => {
                // Fail fast: notifying about a report that does not exist
                // would be incorrect.
                error!(%e, owner = %identity.id.as_str(), "report persistence failed");
                return SubmissionOutcome::Failure(FailureReason::PersistenceFailed);
            }
        };

        let Some(recipient) = self.recipient.as_deref() else {
            warn!(
                report_id = %report_id.as_str(),
                "no notification recipient configured; report saved without notification"
            );
            return SubmissionOutcome::PartialFailure(PartialFailureReason::NotificationFailed);
        };

        let (subject, text, html) = compose_email(&fields);
        match self.notifier.send(recipient, &subject, &text, &html).await {
            Ok(()) => SubmissionOutcome::Success,
            Err(e) => {
                warn!(
                    %e,
                    report_id = %report_id.as_str(),
                    "notification failed after durable save"
                );
                SubmissionOutcome::PartialFailure(PartialFailureReason::NotificationFailed)
            }
        }
    }
}

/// Deterministic notification content for one report. The subject carries
/// the report date; the body lists technician, office time when present,
/// date, and description.
pub fn compose_email(fields: &ReportFields) -> (String, String, String) {
    let subject = format!("New service report - {}", fields.date);

    let text = format!(
        "New service report filed by {} on {}.\n\nDescription: {}",
        fields.technician, fields.date, fields.description
    );

    let mut html = String::from("<h1>New service report</h1>\n");
    html.push_str(&format!(
        "<p><strong>Technician:</strong> {}</p>\n",
        fields.technician
    ));
    if let Some(office_time) = fields.office_time.as_deref() {
        html.push_str(&format!(
            "<p><strong>Office time:</strong> {office_time}</p>\n"
        ));
    }
    html.push_str(&format!("<p><strong>Date:</strong> {}</p>\n", fields.date));
    html.push_str(&format!(
        "<p><strong>Description:</strong></p>\n<p>{}</p>",
        fields.description
    ));

    (subject, text, html)
}
