// Lokal Jobs shared type definitions
// Postings, view state, settings and the error taxonomy.

pub mod errors;
pub mod job;
pub mod settings;
pub mod view;
