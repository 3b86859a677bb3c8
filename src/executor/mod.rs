//! Command checking for translated queries
//!
//! Nothing here talks to a server. A [`Session`] holds the state a shell
//! carries between commands (the selected database and the read-only flag)
//! and decides, using the classifier, whether a translated command may be
//! handed to a dispatcher.

mod result;
mod session;

pub use result::CheckResult;
pub use session::{Session, is_valid_db_name};
