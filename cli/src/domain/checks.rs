//! Validation engine identities and check-file naming.

/// The two validation engines run after deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Generic getter output compared against declarative expectations.
    Declarative,
    /// Vendor-specific imperative checks (peer state).
    Imperative,
}

impl Engine {
    /// Suffix of the per-host check file: `<hostname>_<suffix>.yaml`.
    #[must_use]
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Declarative => "state",
            Self::Imperative => "peers",
        }
    }

    /// Human label used in progress output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Declarative => "declarative",
            Self::Imperative => "imperative",
        }
    }
}
