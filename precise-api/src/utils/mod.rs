pub mod auth;
pub mod misc;
pub mod ssh;
