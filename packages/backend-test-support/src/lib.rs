//! Test utilities shared by the backend's unit and integration tests:
//! one-time logging initialization and unique test data.

pub mod logging;
pub mod unique_helpers;
