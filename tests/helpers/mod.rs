//! Shared test infrastructure
//!
//! Helpers for building mock gateway servers, generating test data, and
//! provisioning a database-backed test context.

pub mod database_helper;
pub mod gateway_mock;
pub mod test_data;

#[allow(unused_imports)]
pub use database_helper::TestContext;
#[allow(unused_imports)]
pub use gateway_mock::GatewayMockServer;
#[allow(unused_imports)]
pub use test_data::*;
