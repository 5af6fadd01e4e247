//! # Commands
//!
//! One function per subcommand. Each takes the [`AppContext`] and prints to
//! stdout; logs go to stderr.
//!
//! [`AppContext`]: crate::context::AppContext

pub mod auth;
pub mod bill;
pub mod reports;
