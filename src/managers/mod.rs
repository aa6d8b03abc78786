// Lokal Jobs state managers
// Managers own persistent or screen state: the bookmark store and the job board.

pub mod bookmark_store;
pub mod job_board;
