//! Shared test utilities

mod mock_adapters;

#[allow(unused_imports)]
pub use mock_adapters::*;
