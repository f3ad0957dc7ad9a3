pub mod collection;
pub mod form;
pub mod identity;
pub mod session;
pub mod store;
pub mod submit;

pub use collection::ReportCollection;
pub use form::{DraftForm, FormSubmitError};
pub use identity::{
    HttpIdentityProvider, IdentityProvider, MissingIdentityProvider, SessionEvent,
};
pub use session::{nav_decision, NavDecision, SessionGate};
pub use store::{MissingReportStore, ReportStore};
pub use submit::{compose_email, SubmissionWorkflow};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
