//! Operator input for a gNMI Set.

use anyhow::{bail, Context};
use clap::Args;

use mgmtgw_client::proto::SetRequest;

/// Changes to send, in the order the gateway applies them.
#[derive(Args, Debug, Clone, Default)]
pub struct SetOps {
    /// Xpath to delete; repeatable
    #[arg(long, value_name = "XPATH")]
    pub delete: Vec<String>,

    /// xpath:value to replace; repeatable. A value of @file reads JSON from file
    #[arg(long, value_name = "XPATH:VALUE")]
    pub replace: Vec<String>,

    /// xpath:value to update; repeatable. A value of @file reads JSON from file
    #[arg(long, value_name = "XPATH:VALUE")]
    pub update: Vec<String>,

    /// Bundle version to attach as an extension
    #[arg(long)]
    pub bundle_ver: Option<String>,

    /// Target name placed in the request prefix
    #[arg(long)]
    pub xpath_target: Option<String>,
}

impl SetOps {
    /// Build the request.
    pub fn request(&self) -> anyhow::Result<SetRequest> {
        let mut request = SetRequest::from_xpaths(&self.delete, &self.replace, &self.update)
            .context("invalid path")?;
        if request.is_empty() {
            bail!("nothing to set; pass --delete, --replace or --update");
        }
        if let Some(target) = &self.xpath_target {
            request = request.with_target(target);
        }
        if let Some(version) = &self.bundle_ver {
            request = request
                .with_bundle_version(version)
                .context("invalid bundle version")?;
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgmtgw_client::proto::TypedValue;

    #[test]
    fn test_request() {
        let ops = SetOps {
            delete: vec!["/openconfig-acl:acl/acl-sets".into()],
            update: vec!["/openconfig-vlan:vlans/vlan[vlan-id=10]/config/mtu:9100".into()],
            bundle_ver: Some("1.2.0".into()),
            xpath_target: Some("OC_YANG".into()),
            ..Default::default()
        };
        let request = ops.request().unwrap();

        assert_eq!(request.delete.len(), 1);
        assert!(request.replace.is_empty());
        assert_eq!(request.update[0].val, Some(TypedValue::from(9100i64)));
        assert_eq!(
            request.prefix.as_ref().map(|p| p.target.as_str()),
            Some("OC_YANG")
        );
        assert_eq!(request.bundle_version().unwrap().unwrap().version, "1.2.0");
    }

    #[test]
    fn test_empty_request() {
        assert!(SetOps::default().request().is_err());
    }

    #[test]
    fn test_bad_path() {
        let ops = SetOps {
            delete: vec!["/a/b[unterminated".into()],
            ..Default::default()
        };
        assert!(ops.request().is_err());
    }
}
