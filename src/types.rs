//! Shared types used across hqsubmit.
//! Includes the `Case` entity with its `CaseProperty` overflow list, and the
//! `SubmissionOutcome` returned by every submission attempt.
use serde::{Deserialize, Serialize};

/// One non-reserved input column carried into a case's update block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseProperty {
    pub name: String,
    pub value: String,
}

impl CaseProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single case update, built from one input row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub case_type: String,
    pub owner_id: String,
    pub modified_on: String,
    pub server_modified_on: Option<String>,
    pub properties: Vec<CaseProperty>,
}

impl Case {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Success flag plus the message reported for one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmissionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
