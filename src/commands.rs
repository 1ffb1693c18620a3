//! Operator-facing commands, each an `impl` block on [`crate::App`].
//!
//! - [`delete`]: delete a branch locally and/or on the remote
//! - [`promote`]: merge staging into main and push it
//! - [`sync`]: pull and merge
//! - [`view`]: read-only status, branch and history views
//! - [`menu`]: the interactive menu tying them together

pub mod delete;
pub mod menu;
pub mod promote;
pub mod sync;
pub mod view;
