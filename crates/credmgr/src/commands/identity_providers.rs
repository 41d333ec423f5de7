//! Identity provider rows, detail view, and flag mapping.

use std::path::Path;

use tabled::Tabled;

use credmgr_core::{EntityId, IdentityProvider};

use super::entity::{EntityView, FieldArgs};
use crate::cli::IdentityProviderFields;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub struct IdentityProviderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl EntityView for IdentityProvider {
    type Row = IdentityProviderRow;
    const LABEL: &'static str = "identity provider";

    fn row(&self) -> IdentityProviderRow {
        IdentityProviderRow {
            id: self.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: output::or_dash(self.name.as_deref()),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.as_ref().map_or_else(|| "-".into(), ToString::to_string)),
            ("Name", output::or_dash(self.name.as_deref())),
        ])
    }

    fn patch_base(id: EntityId) -> Self {
        Self::reference(id)
    }
}

impl FieldArgs<IdentityProvider> for IdentityProviderFields {
    fn from_file(&self) -> Option<&Path> {
        self.from_file.as_deref()
    }

    fn apply(self, record: &mut IdentityProvider) -> Result<(), CliError> {
        if let Some(name) = self.name {
            record.name = Some(name);
        }
        Ok(())
    }
}
