//! CLI module graph.

pub mod command;
pub mod list;
pub mod output;
pub mod paths;
pub mod select;
pub mod show;
