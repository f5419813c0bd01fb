//! # Reset-Transient Command Implementation
//!
//! Strips per-deployment state (the transient section and any pinned
//! commit) so the origin can seed a fresh deployment.

use anyhow::Result;

use super::Context;

/// Execute the `reset-transient` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;
    let before = origin.to_data();
    origin.remove_transient_state();
    let changed = origin.to_data() != before;
    ctx.commit(&origin, changed, "Removed transient state")
}
