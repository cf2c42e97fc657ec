//! Builders for the commands that manage data sources on the
//! metadata service.
//!
//! Each operation is a pure translation from a UI-level request into
//! the `{ type, args }` command object the metadata API accepts.

mod commands;
pub use commands::*;
mod sources;
pub use sources::*;
