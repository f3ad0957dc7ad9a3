use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(OwnerId);
id_newtype!(ReportId);

/// The authenticated caller. Opaque outside the identity provider: the core
/// only ever reads the id and the display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: OwnerId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Unknown,
    Authenticated(Identity),
    Unauthenticated,
}

impl SessionStatus {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionStatus::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// The four content fields of a report, as written to and read from the
/// store. Edits rewrite all of them in a single store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFields {
    pub technician: String,
    pub office_time: Option<String>,
    pub date: String,
    pub description: String,
}

/// Client-local, unsaved report content under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub technician: String,
    pub office_time: Option<String>,
    pub date: String,
    pub description: String,
}

impl ReportDraft {
    /// Empty draft with the date defaulted to today, matching the state a
    /// freshly mounted submission form starts from.
    pub fn new_today() -> Self {
        Self {
            technician: String::new(),
            office_time: None,
            date: Utc::now().date_naive().to_string(),
            description: String::new(),
        }
    }

    pub fn fields(&self) -> ReportFields {
        ReportFields {
            technician: self.technician.clone(),
            office_time: self.office_time.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
        }
    }

    /// All required fields non-empty. `office_time` participates only when
    /// the deployment collects it.
    pub fn is_complete(&self, collect_office_time: bool) -> bool {
        let office_time_ok = !collect_office_time
            || self
                .office_time
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty());
        !self.technician.trim().is_empty()
            && !self.date.trim().is_empty()
            && !self.description.trim().is_empty()
            && office_time_ok
    }

    /// Clears the content fields after a durable save; the date keeps its
    /// value so back-to-back reports for the same day need no re-entry.
    pub fn clear_content(&mut self) {
        self.technician.clear();
        self.office_time = None;
        self.description.clear();
    }
}

/// A persisted, owned record derived from a draft. `owner_id` is immutable
/// after creation and always equals the identity that created the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub owner_id: OwnerId,
    #[serde(flatten)]
    pub fields: ReportFields,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFailureReason {
    NotificationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    PersistenceFailed,
}

/// Result of one submission, distinguishing a durable-write failure from a
/// best-effort-notification failure. Never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Success,
    PartialFailure(PartialFailureReason),
    Failure(FailureReason),
}

impl SubmissionOutcome {
    /// The report was durably saved (even if the notification was not).
    pub fn report_saved(&self) -> bool {
        !matches!(self, SubmissionOutcome::Failure(_))
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionOutcome::Success => "Report submitted. Notification email sent.",
            SubmissionOutcome::PartialFailure(PartialFailureReason::NotificationFailed) => {
                "Report saved, but the notification email could not be sent."
            }
            SubmissionOutcome::Failure(FailureReason::PersistenceFailed) => {
                "Could not submit the report. Please try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> ReportDraft {
        ReportDraft {
            technician: "Ana".into(),
            office_time: Some("09:00 - 18:00".into()),
            date: "2024-05-01".into(),
            description: "Restarted service X".into(),
        }
    }

    #[test]
    fn fresh_draft_defaults_date_to_today() {
        let draft = ReportDraft::new_today();
        assert_eq!(draft.date, Utc::now().date_naive().to_string());
        assert!(!draft.is_complete(false));
    }

    #[test]
    fn complete_draft_requires_office_time_only_when_collected() {
        let mut draft = filled_draft();
        draft.office_time = None;
        assert!(draft.is_complete(false));
        assert!(!draft.is_complete(true));
    }

    #[test]
    fn blank_office_time_counts_as_missing() {
        let mut draft = filled_draft();
        draft.office_time = Some("   ".into());
        assert!(!draft.is_complete(true));
    }

    #[test]
    fn clear_content_keeps_the_date() {
        let mut draft = filled_draft();
        draft.clear_content();
        assert!(draft.technician.is_empty());
        assert!(draft.office_time.is_none());
        assert!(draft.description.is_empty());
        assert_eq!(draft.date, "2024-05-01");
    }

    #[test]
    fn outcome_reports_saved_state() {
        assert!(SubmissionOutcome::Success.report_saved());
        assert!(
            SubmissionOutcome::PartialFailure(PartialFailureReason::NotificationFailed)
                .report_saved()
        );
        assert!(!SubmissionOutcome::Failure(FailureReason::PersistenceFailed).report_saved());
    }
}
