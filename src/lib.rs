#![doc = r##"
hqsubmit — send CSV data to CommCare HQ through the Submission API.

Each CSV row becomes a case update. The cases are rendered into an OpenRosa
case form from a Jinja-syntax template, POSTed to the project space's receiver
endpoint, and the receiver's OpenRosa response is turned into a success flag
plus the message it carried. The same pipeline powers the `hqsubmit` CLI and
can be embedded in your own Rust applications.

Quick start: submit a CSV file
------------------------------
```rust,no_run
use hqsubmit::{RawSettings, SubmissionPipeline, SubmitMode};

fn main() -> hqsubmit::Result<()> {
    let settings = RawSettings {
        project_space: Some("demo".to_string()),
        case_type: Some("patient".to_string()),
        owner_id: Some("0f4f8e3a".to_string()),
        xmlns: Some("http://example.com/case-import".to_string()),
        username: Some("user@example.com".to_string()),
        password: Some("secret".to_string()),
        user_id: Some("0f4f8e3a".to_string()),
        ..Default::default()
    }
    .validate()?;

    let pipeline = SubmissionPipeline::from_settings(settings)?;
    let report = pipeline.run("cases.csv", SubmitMode::Batch)?;
    for outcome in &report.outcomes {
        println!("{}", outcome.message);
    }
    Ok(())
}
```

Mapping rows without submitting
-------------------------------
```rust
use hqsubmit::{CaseDefaults, CaseMapper, Record};

let mapper = CaseMapper::new(CaseDefaults {
    case_type: "patient".to_string(),
    owner_id: "owner-1".to_string(),
});
let record = Record::new()
    .with_field("name", "Alice")
    .with_field("other_test", "42");
let case = mapper.map(1, &record).unwrap();
assert_eq!(case.name, "Alice");
assert_eq!(case.property("other_test"), Some("42"));
assert!(case.server_modified_on.is_none());
```

Interpreting a receiver response
--------------------------------
```rust
let body = r#"<OpenRosaResponse xmlns="http://openrosa.org/http/response">
    <message nature="submit_success">   √   </message>
</OpenRosaResponse>"#;
let outcome = hqsubmit::interpret_response(body).unwrap();
assert!(outcome.success);
assert_eq!(outcome.message, "   √   ");
```

Error handling
--------------
Fallible functions return `hqsubmit::Result<T>`; match on `hqsubmit::Error`
to tell local problems (configuration, input rows, templates) from transport
failures and the remote service's verdict. `SubmissionPipeline::submit` folds
every failure into a `SubmissionOutcome` instead.

Useful modules
--------------
- [`api`] — the submission pipeline.
- [`core`] — row-to-case mapping, settings, timestamp and URL helpers.
- [`io`] — CSV records, form rendering, HTTP transport, response parsing.
- [`types`] — `Case`, `CaseProperty`, `SubmissionOutcome`.
- [`error`] — crate-level `Error` and `Result`.
"##]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::mapper::{CaseMapper, RESERVED_FIELDS, is_element_name, is_reserved};
pub use crate::core::settings::{CaseDefaults, Credentials, FormSettings, RawSettings, SubmissionSettings};
pub use crate::core::timestamp::now_utc;
pub use crate::core::url::join_url;
pub use error::{Error, Result};
pub use types::{Case, CaseProperty, SubmissionOutcome};

pub use io::form::{FormRenderer, RenderedForm, SubmissionContext};
pub use io::records::{Record, RecordReader};
pub use io::response::interpret_response;
pub use io::transport::{HttpReply, HttpTransport, Transport};

pub use api::{BatchReport, SubmissionPipeline, SubmitMode, read_cases};
