//! Ferrous Finalize Infrastructure Layer
pub mod dns;
pub mod metrics;
