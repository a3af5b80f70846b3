//! Static skin-condition catalog and backend label mapping.
//!
//! The catalog is a closed enumeration: every lookup is total, so an
//! unrecognized backend label can never render blank content.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseKind {
    Melanoma,
    BasalCell,
    SquamousCell,
    Benign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Low,
}

/// Display metadata for one catalog entry. Process-wide static, never mutated.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DiseaseEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub causes: &'static str,
    pub action: &'static str,
}

/// Catalog order matches the educational tab order.
pub const ALL_DISEASES: [DiseaseKind; 4] = [
    DiseaseKind::Melanoma,
    DiseaseKind::BasalCell,
    DiseaseKind::SquamousCell,
    DiseaseKind::Benign,
];

impl DiseaseKind {
    pub fn entry(self) -> &'static DiseaseEntry {
        match self {
            Self::Melanoma => &MELANOMA,
            Self::BasalCell => &BASAL_CELL,
            Self::SquamousCell => &SQUAMOUS_CELL,
            Self::Benign => &BENIGN,
        }
    }

    pub fn key(self) -> &'static str {
        self.entry().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "melanoma" => Some(Self::Melanoma),
            "basal_cell" => Some(Self::BasalCell),
            "squamous_cell" => Some(Self::SquamousCell),
            "benign" => Some(Self::Benign),
            _ => None,
        }
    }

    /// Maps a backend multiclass label code to a catalog entry.
    ///
    /// Pure and total: any code outside the fixed three-entry table yields
    /// the supplied default.
    pub fn from_label_code(code: &str, default: Self) -> Self {
        match code {
            "MEL" => Self::Melanoma,
            "BCC" => Self::BasalCell,
            "AKIEC" => Self::SquamousCell,
            _ => default,
        }
    }
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Display decoration for raw multiclass label codes; unknown codes pass
/// through verbatim.
pub fn decorate_label_code(code: &str) -> &str {
    match code {
        "MEL" => "Melanoma",
        "BCC" => "Basal Cell Carcinoma",
        "AKIEC" => "Actinic Keratosis",
        other => other,
    }
}

static MELANOMA: DiseaseEntry = DiseaseEntry {
    key: "melanoma",
    name: "Melanoma",
    severity: Severity::Critical,
    description: "Most dangerous form of skin cancer that develops in melanocytes. \
                  Can spread to other organs if not treated early.",
    causes: "UV exposure, genetic factors, and numerous moles increase risk.",
    action: "SEE DOCTOR IMMEDIATELY for biopsy and treatment planning.",
};

static BASAL_CELL: DiseaseEntry = DiseaseEntry {
    key: "basal_cell",
    name: "Basal Cell Carcinoma",
    severity: Severity::High,
    description: "Most common and least dangerous form of skin cancer. Grows slowly \
                  and rarely spreads.",
    causes: "Long-term sun exposure, fair skin, and age are primary risk factors.",
    action: "Surgical removal is typically recommended. Schedule a dermatology appointment.",
};

static SQUAMOUS_CELL: DiseaseEntry = DiseaseEntry {
    key: "squamous_cell",
    name: "Squamous Cell Carcinoma",
    severity: Severity::High,
    description: "A type of skin cancer that can grow deep into the skin and spread \
                  to other parts of the body.",
    causes: "Cumulative UV exposure, fair skin, and weakened immune system.",
    action: "Biopsy needed. Early treatment is crucial to prevent spreading.",
};

static BENIGN: DiseaseEntry = DiseaseEntry {
    key: "benign",
    name: "Benign",
    severity: Severity::Low,
    description: "Non-cancerous skin lesion. No immediate medical treatment required.",
    causes: "Natural skin variations, sun exposure, or minor skin damage.",
    action: "Self-monitor monthly for any changes in size, shape, or color.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_codes_map_to_documented_entries() {
        assert_eq!(
            DiseaseKind::from_label_code("MEL", DiseaseKind::Benign),
            DiseaseKind::Melanoma
        );
        assert_eq!(
            DiseaseKind::from_label_code("BCC", DiseaseKind::Benign),
            DiseaseKind::BasalCell
        );
        assert_eq!(
            DiseaseKind::from_label_code("AKIEC", DiseaseKind::Benign),
            DiseaseKind::SquamousCell
        );
    }

    #[test]
    fn unknown_label_code_yields_supplied_default() {
        assert_eq!(
            DiseaseKind::from_label_code("NV", DiseaseKind::Melanoma),
            DiseaseKind::Melanoma
        );
        assert_eq!(
            DiseaseKind::from_label_code("", DiseaseKind::Benign),
            DiseaseKind::Benign
        );
        // Case-sensitive: backend emits uppercase codes only.
        assert_eq!(
            DiseaseKind::from_label_code("mel", DiseaseKind::Benign),
            DiseaseKind::Benign
        );
    }

    #[test]
    fn keys_round_trip_through_from_key() {
        for kind in ALL_DISEASES {
            assert_eq!(DiseaseKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(DiseaseKind::from_key("eczema"), None);
    }

    #[test]
    fn entries_are_internally_consistent() {
        assert_eq!(DiseaseKind::Melanoma.entry().severity, Severity::Critical);
        assert_eq!(DiseaseKind::Benign.entry().severity, Severity::Low);
        assert!(
            DiseaseKind::Melanoma
                .entry()
                .action
                .contains("SEE DOCTOR IMMEDIATELY")
        );
    }

    #[test]
    fn decorates_known_codes_and_passes_through_unknown() {
        assert_eq!(decorate_label_code("MEL"), "Melanoma");
        assert_eq!(decorate_label_code("BCC"), "Basal Cell Carcinoma");
        assert_eq!(decorate_label_code("AKIEC"), "Actinic Keratosis");
        assert_eq!(decorate_label_code("NV"), "NV");
    }
}
