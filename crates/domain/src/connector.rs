//! Outbound provisioning connector reference data.

use warden_core::TenantDomain;

/// Metadata of one outbound provisioning connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundConnector {
    /// Connector identifier, the unpadded URL-safe base64 of `name`.
    pub connector_id: &'static str,
    /// Connector name.
    pub name: &'static str,
    /// Human-readable connector name.
    pub display_name: &'static str,
}

impl OutboundConnector {
    /// Returns the tenant-scoped metadata resource path of this connector.
    #[must_use]
    pub fn self_path(&self, tenant: &TenantDomain) -> String {
        format!(
            "{}/api/server/v1/identity-providers/meta/outbound-provisioning-connectors/{}",
            tenant.path_prefix(),
            self.connector_id
        )
    }
}

/// Outbound provisioning connectors shipped with the identity server.
pub const OUTBOUND_CONNECTORS: &[OutboundConnector] = &[
    OutboundConnector {
        connector_id: "Z29vZ2xlYXBwcw",
        name: "googleapps",
        display_name: "Google",
    },
    OutboundConnector {
        connector_id: "c2FsZXNmb3JjZQ",
        name: "salesforce",
        display_name: "Salesforce",
    },
    OutboundConnector {
        connector_id: "c2NpbQ",
        name: "scim",
        display_name: "SCIM",
    },
];

/// Finds a connector by name, ignoring case.
#[must_use]
pub fn find_outbound_connector(name: &str) -> Option<&'static OutboundConnector> {
    OUTBOUND_CONNECTORS
        .iter()
        .find(|connector| connector.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use warden_core::TenantDomain;

    use super::find_outbound_connector;

    #[test]
    fn scim_connector_path_is_tenant_scoped() {
        let path = find_outbound_connector("SCIM")
            .map(|connector| connector.self_path(&TenantDomain::super_tenant()));
        assert_eq!(
            path.as_deref(),
            Some(
                "/t/carbon.super/api/server/v1/identity-providers/meta/outbound-provisioning-connectors/c2NpbQ"
            )
        );
    }

    #[test]
    fn unknown_connector_is_absent() {
        assert!(find_outbound_connector("ldap").is_none());
    }
}
