//! Integration tests for synthgen

mod builtin_tools;
mod failure_isolation;
mod orchestrator_concurrency;
mod registry_contract;
mod test_utils;
