//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde::de::DeserializeOwned;

use credmgr_core::ListQuery;

use crate::cli::PageArgs;
use crate::error::CliError;

/// Build a `ListQuery` from paging flags, defaulting the page size.
pub fn list_query(page: &PageArgs, default_size: u32) -> ListQuery {
    ListQuery {
        page: page.page,
        size: Some(page.size.unwrap_or(default_size)),
        sort: page.sort.clone(),
        eagerload: page.eagerload,
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` becomes mandatory.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a JSON file for `--from-file` flags into a record.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Prompt for a secret without echo, rejecting empty input.
pub fn prompt_secret(prompt: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use credmgr_core::Credential;

    use super::*;

    #[test]
    fn list_query_fills_default_size() {
        let page = PageArgs {
            page: Some(1),
            size: None,
            sort: Some("id,desc".into()),
            eagerload: false,
        };
        let query = list_query(&page, 20);
        assert_eq!(query.page, Some(1));
        assert_eq!(query.size, Some(20));
        assert_eq!(query.sort.as_deref(), Some("id,desc"));
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", "delete", true).unwrap());
    }

    #[test]
    fn json_file_parses_into_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"profile": "p1", "enabled": true}}"#).unwrap();

        let cred: Credential = read_json_file(file.path()).unwrap();
        assert_eq!(cred.profile.as_deref(), Some("p1"));
        assert_eq!(cred.enabled, Some(true));
    }

    #[test]
    fn malformed_json_file_is_a_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = read_json_file::<Credential>(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
