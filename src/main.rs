//! Binary entry point for `forte-client`.
//!
//! All behaviour lives in `forte_client::cli`; this binary only delegates.

use anyhow::Result;

fn main() -> Result<()> { forte_client::cli::run() }
