//! Service layer providing business-oriented query/save/purge operations on
//! top of `models`.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod db;
pub mod errors;
pub mod order_set;
#[cfg(test)]
pub mod test_support;
