//! Shared helpers for unit tests.

pub mod fixtures;
pub mod mock_store;
pub mod socket_guard;
