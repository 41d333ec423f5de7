//! Clap derive structures for the `credmgr` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man pages, so it must depend on clap only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// credmgr -- administer credentials, identity providers, and service providers
#[derive(Debug, Parser)]
#[command(
    name = "credmgr",
    version,
    about = "Manage credentials, identity providers, and service providers",
    long_about = "Command-line administration for a credential management server.\n\n\
        Every entity type supports list, search, get, create, update, patch,\n\
        and delete against the server's REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "CREDMGR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "CREDMGR_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides profile auth)
    #[arg(long, env = "CREDMGR_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CREDMGR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CREDMGR_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CREDMGR_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage credentials
    #[command(alias = "cred", alias = "c")]
    Credentials(CredentialsArgs),

    /// Manage identity providers
    #[command(alias = "idp")]
    IdentityProviders(IdentityProvidersArgs),

    /// Manage service providers
    #[command(alias = "sp")]
    ServiceProviders(ServiceProvidersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Paging and sorting for list and search.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size (defaults to the configured page_size)
    #[arg(long)]
    pub size: Option<u32>,

    /// Sort expression, e.g. "id,asc"
    #[arg(long)]
    pub sort: Option<String>,

    /// Eagerly load many-valued relationships
    #[arg(long)]
    pub eagerload: bool,
}

/// Subcommands shared by every entity type; `F` is the type's field flags.
#[derive(Debug, Subcommand)]
pub enum EntityCommand<F: Args> {
    /// List records
    #[command(alias = "ls")]
    List(PageArgs),

    /// Full-text search
    Search {
        /// Search query
        query: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one record
    Get {
        /// Record id
        id: String,
    },

    /// Create a record
    Create(F),

    /// Replace a record (unset fields keep their current value)
    Update {
        /// Record id
        id: String,

        #[command(flatten)]
        fields: F,
    },

    /// Send only the given fields as a merge patch
    Patch {
        /// Record id
        id: String,

        #[command(flatten)]
        fields: F,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CREDENTIALS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CredentialsArgs {
    #[command(subcommand)]
    pub command: EntityCommand<CredentialFields>,
}

#[derive(Args)]
pub struct CredentialFields {
    /// Read the record from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["profile_name", "username", "password", "ask_password", "enabled", "identity_provider", "service_provider"])]
    pub from_file: Option<PathBuf>,

    /// Credential profile name
    #[arg(long, value_name = "NAME")]
    pub profile_name: Option<String>,

    /// Login username
    #[arg(long)]
    pub username: Option<String>,

    /// Login password (prefer --ask-password)
    #[arg(long, conflicts_with = "ask_password")]
    pub password: Option<String>,

    /// Prompt for the password without echo
    #[arg(long)]
    pub ask_password: bool,

    /// Enable or disable the credential
    #[arg(long, action = clap::ArgAction::Set)]
    pub enabled: Option<bool>,

    /// Identity provider id
    #[arg(long, value_name = "ID")]
    pub identity_provider: Option<String>,

    /// Service provider id (repeatable)
    #[arg(long, value_name = "ID")]
    pub service_provider: Vec<String>,
}

// Password flags end up in `-vv` command logs; mask them.
impl std::fmt::Debug for CredentialFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialFields")
            .field("from_file", &self.from_file)
            .field("profile_name", &self.profile_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("ask_password", &self.ask_password)
            .field("enabled", &self.enabled)
            .field("identity_provider", &self.identity_provider)
            .field("service_provider", &self.service_provider)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IDENTITY PROVIDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IdentityProvidersArgs {
    #[command(subcommand)]
    pub command: EntityCommand<IdentityProviderFields>,
}

#[derive(Debug, Args)]
pub struct IdentityProviderFields {
    /// Read the record from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with = "name")]
    pub from_file: Option<PathBuf>,

    /// Provider name
    #[arg(long)]
    pub name: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVICE PROVIDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServiceProvidersArgs {
    #[command(subcommand)]
    pub command: EntityCommand<ServiceProviderFields>,
}

#[derive(Debug, Args)]
pub struct ServiceProviderFields {
    /// Read the record from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["name", "credential"])]
    pub from_file: Option<PathBuf>,

    /// Provider name
    #[arg(long)]
    pub name: Option<String>,

    /// Credential id to link
    #[arg(long, value_name = "ID")]
    pub credential: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a profile value
    Set {
        /// Profile key (server, auth_mode, token_env, username, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the profile's token or password in the system keyring
    SetSecret,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
