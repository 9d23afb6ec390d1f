pub mod issue;
pub mod metrics;
pub mod project;
pub mod qa_check;
pub mod user;
pub mod validation;
