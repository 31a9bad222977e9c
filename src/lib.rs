// Game logic, persistence and input plumbing shared by the binary and tests.
pub mod app_dirs;
pub mod config;
pub mod digits;
pub mod feedback;
pub mod game;
pub mod report;
pub mod runtime;
pub mod scores;
pub mod session;
