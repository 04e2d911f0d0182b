mod handler;
mod model;

pub use handler::{list_submissions, upsert_submission};
pub use model::{SubmissionQuery, UpsertSubmissionRequest};
