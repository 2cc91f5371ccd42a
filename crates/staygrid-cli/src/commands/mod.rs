pub mod available;
pub mod board;
pub mod config;
pub mod input;
pub mod triage;
