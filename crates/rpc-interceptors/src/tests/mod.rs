//! Test module for rpc-interceptors
//!
//! Property-based and async tests covering the fields container, the
//! severity policy, configuration, the logging reporter and the unary
//! interceptor end to end.

#[cfg(test)]
pub mod fields_tests;

#[cfg(test)]
pub mod policy_tests;


#[cfg(test)]
pub mod reporter_tests;
