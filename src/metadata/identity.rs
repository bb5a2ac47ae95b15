//! Assembly identities and their display names.
//!
//! An [`AssemblyIdentity`] is built from the `Assembly` row of a module or from one of its
//! `AssemblyRef` rows. Its [`fmt::Display`] form is the familiar
//! `Name, Version=1.2.3.4, Culture=neutral, PublicKeyToken=b77a5c561934e089`.
//!
//! # Example
//! ```rust
//! use dllexporter::metadata::identity::{AssemblyIdentity, AssemblyVersion};
//!
//! let identity = AssemblyIdentity::new("Contoso.Tools", AssemblyVersion::new(1, 2, 0, 0));
//! assert_eq!(
//!     identity.to_string(),
//!     "Contoso.Tools, Version=1.2.0.0, Culture=neutral, PublicKeyToken=null"
//! );
//! ```

use std::fmt;

use sha1::{Digest, Sha1};

/// Four-part assembly version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyVersion {
    /// Creates a version from its four parts.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Name, version, culture and strong-name token of an assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyIdentity {
    /// Simple name, e.g. `System.Runtime`
    pub name: String,
    /// Version
    pub version: AssemblyVersion,
    /// Culture, `None` for culture-neutral assemblies
    pub culture: Option<String>,
    /// Public key token, `None` for assemblies without a strong name
    pub public_key_token: Option<[u8; 8]>,
}

impl AssemblyIdentity {
    /// Creates a culture-neutral identity without a strong name.
    #[must_use]
    pub fn new(name: impl Into<String>, version: AssemblyVersion) -> Self {
        AssemblyIdentity {
            name: name.into(),
            version,
            culture: None,
            public_key_token: None,
        }
    }

    /// Sets the culture; an empty string is treated as neutral.
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = (!culture.is_empty()).then(|| culture.to_string());
        self
    }

    /// Sets the strong-name token from a key blob.
    ///
    /// `is_public_key` says whether `key` is a full public key (hashed into its token) or
    /// already the 8-byte token. Empty or odd-sized tokens leave the identity unsigned.
    #[must_use]
    pub fn with_key(mut self, key: &[u8], is_public_key: bool) -> Self {
        self.public_key_token = if key.is_empty() {
            None
        } else if is_public_key {
            Some(public_key_token(key))
        } else {
            <[u8; 8]>::try_from(key).ok()
        };
        self
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Version={}, Culture={}, PublicKeyToken=",
            self.name,
            self.version,
            self.culture.as_deref().unwrap_or("neutral")
        )?;

        match &self.public_key_token {
            Some(token) => token.iter().try_for_each(|byte| write!(f, "{byte:02x}")),
            None => f.write_str("null"),
        }
    }
}

/// Token of a public key: the last 8 bytes of its SHA-1 hash, in reverse order.
#[must_use]
pub fn public_key_token(public_key: &[u8]) -> [u8; 8] {
    let mut hasher = Sha1::new();
    hasher.update(public_key);
    let hash = hasher.finalize();

    let mut token = [0u8; 8];
    for (slot, byte) in token.iter_mut().zip(hash.iter().rev()) {
        *slot = *byte;
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecma_key_token() {
        // the 16-byte "neutral" key used by the core framework assemblies
        let key = [0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            public_key_token(&key),
            [0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89]
        );

        let identity = AssemblyIdentity::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0))
            .with_key(&key, true);
        assert_eq!(
            identity.to_string(),
            "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
        );
    }

    #[test]
    fn token_blob() {
        let identity = AssemblyIdentity::new("Helper", AssemblyVersion::default())
            .with_key(&[0x31, 0xbf, 0x38, 0x56, 0xad, 0x36, 0x4e, 0x35], false)
            .with_culture("de-DE");
        assert_eq!(
            identity.to_string(),
            "Helper, Version=0.0.0.0, Culture=de-DE, PublicKeyToken=31bf3856ad364e35"
        );

        let odd =
            AssemblyIdentity::new("Helper", AssemblyVersion::default()).with_key(&[1, 2, 3], false);
        assert_eq!(odd.public_key_token, None);

        let neutral = AssemblyIdentity::new("Helper", AssemblyVersion::default()).with_culture("");
        assert_eq!(neutral.culture, None);
    }

    #[test]
    fn version_order() {
        assert!(AssemblyVersion::new(1, 2, 0, 0) < AssemblyVersion::new(1, 10, 0, 0));
        assert_eq!(AssemblyVersion::new(8, 0, 1, 2).to_string(), "8.0.1.2");
    }
}
