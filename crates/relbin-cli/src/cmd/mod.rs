//! Command modules - one file per CLI command

pub mod install;
pub mod latest;
pub mod list;
pub mod path;
pub mod remove;
