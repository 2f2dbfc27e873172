//! Infrastructure configuration modules.

pub mod custom;
pub mod logging;
pub mod settings;
