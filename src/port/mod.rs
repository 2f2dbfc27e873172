//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where broker selection meets the outside world.
//! Adapters implement them; the application layer only sees the traits.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │   Broker selection      │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌──────────┐          ┌──────────────┐               ┌────────────┐
//! │ Circonus │          │ COSI default │               │ TCP probe  │
//! │   API    │          │   service    │               │            │
//! └──────────┘          └──────────────┘               └────────────┘
//! ```

pub mod outbound;
