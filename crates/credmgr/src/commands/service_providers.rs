//! Service provider rows, detail view, and flag mapping.

use std::path::Path;

use tabled::Tabled;

use credmgr_core::{Credential, EntityId, ServiceProvider};

use super::entity::{EntityView, FieldArgs};
use crate::cli::ServiceProviderFields;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub struct ServiceProviderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Credential")]
    credential: String,
}

fn credential_label(cred: &Credential) -> String {
    cred.profile
        .clone()
        .or_else(|| cred.id.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "-".into())
}

impl EntityView for ServiceProvider {
    type Row = ServiceProviderRow;
    const LABEL: &'static str = "service provider";

    fn row(&self) -> ServiceProviderRow {
        ServiceProviderRow {
            id: self.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: output::or_dash(self.name.as_deref()),
            credential: self
                .credential
                .as_deref()
                .map_or_else(|| "-".into(), credential_label),
        }
    }

    fn detail(&self) -> String {
        output::detail_lines(&[
            ("ID", self.id.as_ref().map_or_else(|| "-".into(), ToString::to_string)),
            ("Name", output::or_dash(self.name.as_deref())),
            (
                "Credential",
                self.credential
                    .as_deref()
                    .map_or_else(|| "-".into(), credential_label),
            ),
        ])
    }

    fn patch_base(id: EntityId) -> Self {
        Self::reference(id)
    }
}

impl FieldArgs<ServiceProvider> for ServiceProviderFields {
    fn from_file(&self) -> Option<&Path> {
        self.from_file.as_deref()
    }

    fn apply(self, record: &mut ServiceProvider) -> Result<(), CliError> {
        if let Some(name) = self.name {
            record.name = Some(name);
        }
        if let Some(cred) = self.credential {
            record.credential = Some(Box::new(Credential::reference(cred.as_str())));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn credential_flag_links_by_reference() {
        let mut sp = ServiceProvider::patch_base(EntityId::from(2_i64));
        ServiceProviderFields {
            from_file: None,
            name: None,
            credential: Some("5".into()),
        }
        .apply(&mut sp)
        .unwrap();

        assert_eq!(
            serde_json::to_value(&sp).unwrap(),
            serde_json::json!({ "id": 2, "credential": { "id": 5 } })
        );
    }

    #[test]
    fn row_prefers_credential_profile() {
        let sp = ServiceProvider {
            id: Some(EntityId::from(1_i64)),
            name: Some("sp1".into()),
            credential: Some(Box::new(Credential {
                profile: Some("p1".into()),
                ..Credential::reference(5_i64)
            })),
        };
        assert_eq!(sp.row().credential, "p1");
    }
}
