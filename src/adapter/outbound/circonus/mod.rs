//! Circonus monitoring API adapter.

mod client;

pub use client::CirconusApi;
