//! Composite import IDs of the form `<scope>/<resource-id>`

use std::fmt;
use std::str::FromStr;

use crate::provider::ProviderError;

/// A parsed `<scope>/<resource-id>` import identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    /// Scope of the remote resource (e.g., a Cloudflare account ID)
    pub scope: String,
    /// Remote identifier of the resource inside the scope
    pub identifier: String,
}

impl ImportId {
    pub const SEPARATOR: char = '/';

    pub fn new(scope: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            identifier: identifier.into(),
        }
    }
}

impl FromStr for ImportId {
    type Err = ProviderError;

    /// Exactly one separator with a non-empty component on each side
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(Self::SEPARATOR).collect();
        match parts.as_slice() {
            [scope, identifier] if !scope.is_empty() && !identifier.is_empty() => {
                Ok(Self::new(*scope, *identifier))
            }
            _ => Err(ProviderError::malformed_id(format!(
                "invalid id (\"{}\") specified, should be in format \"<scope>/<resource-id>\"",
                s
            ))),
        }
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scope, Self::SEPARATOR, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderErrorKind;

    #[test]
    fn parse_scope_and_identifier() {
        let id: ImportId = "acct123/res456".parse().unwrap();
        assert_eq!(id.scope, "acct123");
        assert_eq!(id.identifier, "res456");
        assert_eq!(id.to_string(), "acct123/res456");
    }

    #[test]
    fn reject_malformed() {
        for input in ["malformed", "", "/", "acct/", "/res", "a/b/c"] {
            let err = input.parse::<ImportId>().unwrap_err();
            assert_eq!(err.kind, ProviderErrorKind::MalformedId, "input {:?}", input);
        }
    }

    #[test]
    fn error_names_expected_format() {
        let err = "malformed".parse::<ImportId>().unwrap_err();
        assert!(err.to_string().contains("<scope>/<resource-id>"));
    }
}
