use crate::error::BankError;

use std::collections::BTreeSet;
use tracing::info;

/// Trust-on-first-use peer bookkeeping. The first registrant is admitted
/// unconditionally and thereby controls all future admission; afterwards
/// only a registered member may authorize new nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn register(&mut self, authorizer: &str, address: &str) -> Result<(), BankError> {
        if authorizer.is_empty() {
            return Err(BankError::EmptyAuthorizer);
        }
        if !self.nodes.is_empty() && !self.nodes.contains(authorizer) {
            return Err(BankError::NotAuthorized(authorizer.to_owned()));
        }

        let netloc = parse_netloc(address)?;
        info!(node = %netloc, "node registered");
        self.nodes.insert(netloc);
        Ok(())
    }
}

/// Accepts a scheme-qualified URL (authority extracted) or a bare
/// `host:port` string.
fn parse_netloc(address: &str) -> Result<String, BankError> {
    let invalid = || BankError::InvalidAddress(address.to_owned());

    let rest = match address.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() => rest,
        Some(_) => return Err(invalid()),
        None => address,
    };

    // Authority ends at the first path/query/fragment delimiter.
    let netloc = rest
        .split(['/', '?', '#'])
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(invalid)?;

    let (host, port) = netloc.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    Ok(netloc.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_is_unconditional() {
        let mut registry = NodeRegistry::new();
        registry.register("anyone", "http://192.168.0.5:5000").unwrap();
        assert!(registry.contains("192.168.0.5:5000"));
    }

    #[test]
    fn later_registrations_need_a_known_authorizer() {
        let mut registry = NodeRegistry::new();
        registry.register("boot", "10.0.0.1:5000").unwrap();

        let err = registry.register("stranger", "10.0.0.2:5000").unwrap_err();
        assert!(matches!(err, BankError::NotAuthorized(_)));

        registry.register("10.0.0.1:5000", "10.0.0.2:5000").unwrap();
        assert!(registry.contains("10.0.0.2:5000"));
    }

    #[test]
    fn empty_authorizer_is_a_validation_error() {
        let mut registry = NodeRegistry::new();
        let err = registry.register("", "10.0.0.1:5000").unwrap_err();
        assert!(matches!(err, BankError::EmptyAuthorizer));
    }

    #[test]
    fn scheme_urls_keep_only_the_authority() {
        let mut registry = NodeRegistry::new();
        registry
            .register("boot", "https://peer.example.com:8443/chain?full=1")
            .unwrap();
        assert!(registry.contains("peer.example.com:8443"));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let mut registry = NodeRegistry::new();
        for bad in ["", "no-port-here", "://5000", "host:", ":9", "host:port"] {
            let err = registry.register("boot", bad).unwrap_err();
            assert!(matches!(err, BankError::InvalidAddress(_)), "{bad}");
        }
    }
}
