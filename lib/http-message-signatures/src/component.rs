//!
//! Components a signature can cover
//!

use crate::{Error, Result};

/// Component of the signature base
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureComponent<'a> {
    /// Request method (`@method`)
    Method,

    /// Request path (`@path`)
    Path,

    /// Host the request targets (`@authority`)
    Authority,

    /// Literal header of the message
    Header(&'a str),
}

impl<'a> SignatureComponent<'a> {
    /// Parse a component name
    ///
    /// Names starting with `@` are derived components, everything else names a header
    pub fn parse(raw: &'a str) -> Result<Self> {
        match raw {
            "@method" => Ok(Self::Method),
            "@path" => Ok(Self::Path),
            "@authority" => Ok(Self::Authority),
            derived if derived.starts_with('@') => Err(Error::UnknownComponent(derived.to_owned())),
            header => Ok(Self::Header(header)),
        }
    }

    /// Name of the component as it appears in the `signature-input` header
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Method => "@method",
            Self::Path => "@path",
            Self::Authority => "@authority",
            Self::Header(header) => header,
        }
    }
}

#[cfg(test)]
mod test {
    use super::SignatureComponent;
    use crate::Error;

    #[test]
    fn parse_components() {
        assert_eq!(
            SignatureComponent::parse("@method").unwrap(),
            SignatureComponent::Method
        );
        assert_eq!(
            SignatureComponent::parse("@path").unwrap(),
            SignatureComponent::Path
        );
        assert_eq!(
            SignatureComponent::parse("@authority").unwrap(),
            SignatureComponent::Authority
        );
        assert_eq!(
            SignatureComponent::parse("x-sig-key").unwrap(),
            SignatureComponent::Header("x-sig-key")
        );
        assert!(matches!(
            SignatureComponent::parse("@query"),
            Err(Error::UnknownComponent(name)) if name == "@query"
        ));
    }

    #[test]
    fn names_round_trip() {
        for name in ["@method", "@path", "@authority", "content-digest"] {
            assert_eq!(SignatureComponent::parse(name).unwrap().as_str(), name);
        }
    }
}
