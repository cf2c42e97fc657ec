//! Error handling for the querydeck crates

pub use anyhow::{anyhow, bail, ensure, Context, Error, Result};
