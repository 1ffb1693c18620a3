//! Integration layers for the two things `branchguard` talks to.
//!
//! - [`git`]: the git CLI, as an executor taking an argument list
//! - [`prompt`]: the operator, as a source of confirmations and free text
//!
//! Both are trait-based so the workflows can run against mocks in tests.

pub mod git;
pub mod prompt;
