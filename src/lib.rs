pub mod anki;
pub mod cli;
pub mod core;
pub mod review;
