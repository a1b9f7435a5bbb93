//! Data models shared by the pipeline and its collaborators.

pub mod config;
pub mod record;
