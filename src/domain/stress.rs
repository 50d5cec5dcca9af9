use serde::{Deserialize, Serialize};

/// Financial stress level assigned to a worker record by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    /// Map a class label from the model artifact to a stress level.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Self::Low),
            "Moderate" => Some(Self::Moderate),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trip() {
        for level in [StressLevel::Low, StressLevel::Moderate, StressLevel::High] {
            assert_eq!(StressLevel::from_label(level.as_str()), Some(level));
        }
        assert_eq!(StressLevel::from_label("Severe"), None);
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_string(&StressLevel::Moderate).unwrap();
        assert_eq!(json, "\"Moderate\"");
    }
}
