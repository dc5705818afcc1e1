use std::convert::Infallible;
use std::str::FromStr;
use zeroize::Zeroize;

/// SNMP community string.
///
/// Shows up as "[REDACTED]" in `Debug` and `Display` so the `-v` options dump
/// never prints it, and is wiped from memory when dropped.
#[derive(Clone)]
pub struct Community(String);

impl Community {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw bytes for the wire. Never log the result.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for Community {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl std::fmt::Debug for Community {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for Community {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for Community {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_community_bytes() {
        let community = Community::new("s3cret");
        assert_eq!(community.as_bytes(), b"s3cret");
    }

    #[test]
    fn test_community_is_redacted() {
        let community: Community = "s3cret".parse().unwrap();
        assert_eq!(format!("{:?}", community), "[REDACTED]");
        assert_eq!(format!("{}", community), "[REDACTED]");
    }

    #[test]
    fn test_community_clone() {
        let community = Community::new("public");
        let cloned = community.clone();
        drop(community);
        assert_eq!(cloned.as_bytes(), b"public");
    }
}
