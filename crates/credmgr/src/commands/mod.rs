//! Command dispatch: bridges CLI args -> entity stores -> output formatting.

pub mod config_cmd;
pub mod credentials;
pub mod entity;
pub mod identity_providers;
pub mod service_providers;
pub mod util;

use credmgr_core::StoreRegistry;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Per-invocation settings every handler needs.
pub struct Ctx<'a> {
    pub global: &'a GlobalOpts,
    /// Page size when `--size` is not given.
    pub page_size: u32,
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    registry: &StoreRegistry,
    ctx: &Ctx<'_>,
) -> Result<(), CliError> {
    match cmd {
        Command::Credentials(args) => {
            entity::handle(registry.credentials(), args.command, ctx).await
        }
        Command::IdentityProviders(args) => {
            entity::handle(registry.identity_providers(), args.command, ctx).await
        }
        Command::ServiceProviders(args) => {
            entity::handle(registry.service_providers(), args.command, ctx).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
