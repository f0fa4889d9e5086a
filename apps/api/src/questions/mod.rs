//! Question bank: submission, PDF extraction, plagiarism checks and listing.

pub mod extraction;
pub mod handlers;
pub mod ingest;
pub mod pos;
pub mod store;
