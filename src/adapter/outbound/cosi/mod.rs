//! COSI default broker service adapter.

mod defaults;

pub use defaults::CosiDefaults;
