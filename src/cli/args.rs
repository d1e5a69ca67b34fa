use clap::Parser;
use std::path::PathBuf;

use hqsubmit::core::settings::{
    DEFAULT_BASE_URL, DEFAULT_DEVICE_ID, DEFAULT_TEMPLATE_PATH, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(
    name = "hqsubmit",
    version,
    about = "Send CSV rows to CommCare HQ as case updates using the Submission API"
)]
pub struct CliArgs {
    /// CSV file with a header row; each data row becomes one case.
    /// Anything other than exactly one file prints this help.
    #[arg(num_args = 0..)]
    pub csv: Vec<PathBuf>,

    /// Project space the receiver belongs to
    #[arg(long, env = "CCHQ_PROJECT_SPACE")]
    pub project_space: Option<String>,

    /// Case type stamped on every case
    #[arg(long, env = "CCHQ_CASE_TYPE")]
    pub case_type: Option<String>,

    /// Owner id stamped on every case
    #[arg(long, env = "CCHQ_OWNER_ID")]
    pub owner_id: Option<String>,

    /// XML namespace of the form
    #[arg(long, env = "CCHQ_FORM_XMLNS")]
    pub xmlns: Option<String>,

    /// String identifying the origin of the data
    #[arg(long, env = "CCHQ_DEVICE_ID", default_value = DEFAULT_DEVICE_ID)]
    pub device_id: String,

    /// Web user or mobile worker username
    #[arg(long, env = "CCHQ_USERNAME")]
    pub username: Option<String>,

    /// Password for basic auth
    #[arg(long, env = "CCHQ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// User id recorded in the form metadata
    #[arg(long, env = "CCHQ_USER_ID")]
    pub user_id: Option<String>,

    /// CommCare HQ base URL
    #[arg(long, env = "CCHQ_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Form template (Jinja syntax)
    #[arg(long, env = "CCHQ_TEMPLATE", default_value = DEFAULT_TEMPLATE_PATH)]
    pub template: PathBuf,

    /// Request timeout in seconds
    #[arg(long, env = "CCHQ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Submit one form per row instead of one form for the whole file
    #[arg(long, default_value_t = false)]
    pub per_record: bool,

    /// Render and print the form(s) without submitting
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print outcomes as JSON lines
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
