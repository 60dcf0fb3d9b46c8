//! WalkTalk walk capacity and confirmation engine.
//!
//! The [`domain`] owns walks, admission and lifecycle rules. [`inbound`] and
//! [`outbound`] hold the adapters that reach it through ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
