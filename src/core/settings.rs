use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.commcarehq.org/";
pub const DEFAULT_DEVICE_ID: &str = "submission_api_example";
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/xform.xml.j2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Values stamped onto every case of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDefaults {
    pub case_type: String,
    pub owner_id: String,
}

/// Form-level metadata rendered into the `<meta>` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    pub xmlns: String,
    pub device_id: String,
    pub username: String,
    pub user_id: String,
}

/// HTTP basic auth pair. `Debug` never shows the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Fully validated settings for one run
#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    pub base_url: String,
    pub project_space: String,
    pub case: CaseDefaults,
    pub form: FormSettings,
    pub credentials: Credentials,
    pub template_path: PathBuf,
    pub timeout: Duration,
}

/// Settings as collected from flags and environment, before validation.
/// Empty strings count as missing.
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub base_url: Option<String>,
    pub project_space: Option<String>,
    pub case_type: Option<String>,
    pub owner_id: Option<String>,
    pub xmlns: Option<String>,
    pub device_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_id: Option<String>,
    pub template_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RawSettings {
    /// Check every required value at once and report all missing names together.
    pub fn validate(self) -> Result<SubmissionSettings> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            let value = present(value);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let project_space = require(self.project_space, "CCHQ_PROJECT_SPACE");
        let case_type = require(self.case_type, "CCHQ_CASE_TYPE");
        let owner_id = require(self.owner_id, "CCHQ_OWNER_ID");
        let xmlns = require(self.xmlns, "CCHQ_FORM_XMLNS");
        let username = require(self.username, "CCHQ_USERNAME");
        let password = require(self.password, "CCHQ_PASSWORD");
        let user_id = require(self.user_id, "CCHQ_USER_ID");

        if !missing.is_empty() {
            return Err(Error::Configuration { missing });
        }

        Ok(SubmissionSettings {
            base_url: present(self.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            project_space,
            case: CaseDefaults { case_type, owner_id },
            form: FormSettings {
                xmlns,
                device_id: present(self.device_id)
                    .unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string()),
                username: username.clone(),
                user_id,
            },
            credentials: Credentials { username, password },
            template_path: self
                .template_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}
