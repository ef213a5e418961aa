//! The fixed set of inspection document kinds.

use serde::{Deserialize, Serialize};

/// Kind of document produced for one inspection record.
///
/// Every report request attempts both kinds independently; a failure in
/// one must never block the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// The inspection act.
    Act,
    /// The inspection protocol.
    Protocol,
}

impl ReportKind {
    /// Both kinds, in the order they are rendered.
    pub const ALL: [Self; 2] = [Self::Act, Self::Protocol];

    /// Filename prefix for the generated document.
    #[must_use]
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Act => "Act",
            Self::Protocol => "Protocol",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_prefix() {
        assert_eq!(ReportKind::Act.file_prefix(), "Act");
        assert_eq!(ReportKind::Protocol.file_prefix(), "Protocol");
    }

    #[test]
    fn test_all_covers_both_kinds() {
        assert_eq!(ReportKind::ALL.len(), 2);
        assert_ne!(ReportKind::ALL[0], ReportKind::ALL[1]);
    }
}
