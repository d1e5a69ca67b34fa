//! Form rendering: binds cases and form metadata into the OpenRosa case form
//! template. Every substituted value is XML-escaped, undefined variables are
//! errors, and the output is checked for well-formedness before it is returned.
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use minijinja::{Environment, Output, State, UndefinedBehavior, Value};
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::id::new_identifier;
use crate::core::mapper::is_element_name;
use crate::core::settings::FormSettings;
use crate::core::timestamp::now_utc;
use crate::error::{Error, Result};
use crate::types::Case;

/// Template shipped with the crate: one `<case>` block per case.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/xform.xml.j2");

const BUNDLED_NAME: &str = "xform.xml.j2";

/// Everything the template sees for one render.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionContext<'a> {
    pub xmlns: &'a str,
    pub device_id: &'a str,
    pub now_utc: String,
    pub username: &'a str,
    pub user_id: &'a str,
    pub submission_id: String,
    pub cases: &'a [Case],
}

impl<'a> SubmissionContext<'a> {
    /// Stamp the current time and mint a new submission id.
    pub fn new(form: &'a FormSettings, cases: &'a [Case]) -> Self {
        Self {
            xmlns: &form.xmlns,
            device_id: &form.device_id,
            now_utc: now_utc(),
            username: &form.username,
            user_id: &form.user_id,
            submission_id: new_identifier(),
            cases,
        }
    }
}

/// A rendered form and the submission id it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedForm {
    pub submission_id: String,
    pub xml: String,
}

pub struct FormRenderer {
    env: Environment<'static>,
    name: String,
}

impl std::fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRenderer")
            .field("name", &self.name)
            .finish()
    }
}

fn xml_formatter(out: &mut Output<'_>, _state: &State<'_, '_>, value: &Value) -> std::result::Result<(), minijinja::Error> {
    if value.is_safe() {
        write!(out, "{value}")?;
    } else {
        write!(out, "{}", escape(value.to_string().as_str()))?;
    }
    Ok(())
}

impl FormRenderer {
    /// Load and parse the template at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::TemplateLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| BUNDLED_NAME.to_string());
        debug!("Loaded form template {:?} ({} bytes)", path, source.len());
        Self::from_source(name, source).map_err(|e| match e {
            Error::TemplateLoad { reason, .. } => Error::TemplateLoad {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_formatter(xml_formatter);
        env.add_template_owned(name.clone(), source.into())
            .map_err(|e| Error::TemplateLoad {
                path: name.clone().into(),
                reason: e.to_string(),
            })?;
        Ok(Self { env, name })
    }

    pub fn bundled() -> Result<Self> {
        Self::from_source(BUNDLED_NAME, BUNDLED_TEMPLATE)
    }

    /// Render `cases` into one form under a freshly minted submission id.
    pub fn render(&self, form: &FormSettings, cases: &[Case]) -> Result<RenderedForm> {
        let context = SubmissionContext::new(form, cases);
        let xml = self.render_context(&context)?;
        info!(
            "Rendered form {} with {} case(s)",
            context.submission_id,
            cases.len()
        );
        Ok(RenderedForm {
            submission_id: context.submission_id,
            xml,
        })
    }

    pub fn render_context(&self, context: &SubmissionContext<'_>) -> Result<String> {
        // Property names are emitted as element names and are never escaped.
        for case in context.cases {
            if let Some(bad) = case.properties.iter().find(|p| !is_element_name(&p.name)) {
                return Err(Error::Render(format!(
                    "property `{}` of case {} is not a valid XML element name",
                    bad.name, case.id
                )));
            }
        }
        let template = self
            .env
            .get_template(&self.name)
            .map_err(|e| Error::Render(e.to_string()))?;
        let xml = template
            .render(context)
            .map_err(|e| Error::Render(e.to_string()))?;
        check_well_formed(&xml)?;
        Ok(xml)
    }
}

/// Reject documents with unbalanced or mismatched tags, broken attributes,
/// or no root element.
fn check_well_formed(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut depth: usize = 0;
    let mut roots = 0;
    let malformed = |reason: String| Error::Render(format!("rendered form is not well-formed XML: {reason}"));

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(e) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
                for attr in e.attributes() {
                    attr.map_err(|e| malformed(e.to_string()))?;
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    roots += 1;
                }
                for attr in e.attributes() {
                    attr.map_err(|e| malformed(e.to_string()))?;
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("unexpected closing tag".to_string()))?;
            }
            Event::Text(e) if depth == 0 => {
                let text = e.unescape().map_err(|e| malformed(e.to_string()))?;
                if !text.trim().is_empty() {
                    return Err(malformed("text outside the root element".to_string()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (depth, roots) {
        (0, 1) => Ok(()),
        (0, 0) => Err(malformed("no root element".to_string())),
        (0, _) => Err(malformed("more than one root element".to_string())),
        _ => Err(malformed("unclosed element".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseProperty;

    fn form() -> FormSettings {
        FormSettings {
            xmlns: "http://example.com/form".to_string(),
            device_id: "device-1".to_string(),
            username: "user@example.com".to_string(),
            user_id: "user-1".to_string(),
        }
    }

    fn case(id: &str, properties: Vec<CaseProperty>) -> Case {
        Case {
            id: id.to_string(),
            name: format!("name of {id}"),
            case_type: "patient".to_string(),
            owner_id: "owner-1".to_string(),
            modified_on: "2020-06-08T18:41:33.207Z".to_string(),
            server_modified_on: None,
            properties,
        }
    }

    #[test]
    fn bundled_template_renders_one_block_per_case() {
        let renderer = FormRenderer::bundled().unwrap();
        let cases = vec![
            case("c1", vec![CaseProperty::new("other_test", "42")]),
            case("c2", vec![]),
        ];
        let rendered = renderer.render(&form(), &cases).unwrap();

        assert_eq!(rendered.xml.matches("<case case_id=").count(), 2);
        assert!(rendered.xml.contains(r#"case_id="c1""#));
        assert!(rendered.xml.contains("<other_test>42</other_test>"));
        assert!(rendered.xml.contains("<case_type>patient</case_type>"));
        assert!(rendered.xml.contains("<owner_id>owner-1</owner_id>"));
        assert!(rendered.xml.contains(&format!(
            "<instanceID>{}</instanceID>",
            rendered.submission_id
        )));
        assert!(!rendered.xml.contains("server_modified_on"));
    }

    #[test]
    fn server_modified_on_only_when_present() {
        let renderer = FormRenderer::bundled().unwrap();
        let mut with = case("c1", vec![]);
        with.server_modified_on = Some("2020-01-01T00:00:00.000Z".to_string());
        let rendered = renderer.render(&form(), &[with]).unwrap();
        assert!(rendered.xml.contains(
            "<server_modified_on>2020-01-01T00:00:00.000Z</server_modified_on>"
        ));
    }

    #[test]
    fn each_render_mints_a_new_submission_id() {
        let renderer = FormRenderer::bundled().unwrap();
        let cases = vec![case("c1", vec![])];
        let first = renderer.render(&form(), &cases).unwrap();
        let second = renderer.render(&form(), &cases).unwrap();
        assert_ne!(first.submission_id, second.submission_id);
        assert_eq!(first.submission_id.len(), 32);
    }

    #[test]
    fn values_are_xml_escaped() {
        let renderer = FormRenderer::bundled().unwrap();
        let cases = vec![case("c1", vec![CaseProperty::new("note", "a < b & \"c\"")])];
        let rendered = renderer.render(&form(), &cases).unwrap();
        assert!(rendered.xml.contains("<note>a &lt; b &amp; &quot;c&quot;</note>"));
    }

    #[test]
    fn unusable_property_name_is_a_render_error() {
        let renderer = FormRenderer::bundled().unwrap();
        for name in ["bad name", "1st_visit", "a&b", "x?y", "weight(kg)"] {
            let cases = vec![case("c1", vec![CaseProperty::new(name, "v")])];
            match renderer.render(&form(), &cases) {
                Err(Error::Render(message)) => assert!(message.contains(name), "{message}"),
                other => panic!("expected render error for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn undefined_variable_is_a_render_error() {
        let renderer =
            FormRenderer::from_source("t.xml", "<data>{{ missing_field }}</data>").unwrap();
        match renderer.render(&form(), &[]) {
            Err(Error::Render(_)) => {}
            other => panic!("expected render error, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_template_is_a_load_error() {
        assert!(matches!(
            FormRenderer::from_source("t.xml", "<data>{% for %}</data>"),
            Err(Error::TemplateLoad { .. })
        ));
    }

    #[test]
    fn missing_template_file_is_a_load_error() {
        match FormRenderer::from_path("/definitely/not/here.xml.j2") {
            Err(Error::TemplateLoad { path, .. }) => {
                assert_eq!(path, Path::new("/definitely/not/here.xml.j2"));
            }
            other => panic!("expected template load error, got {other:?}"),
        }
    }

    #[test]
    fn well_formedness_check() {
        assert!(check_well_formed("<?xml version=\"1.0\"?><a><b/></a>").is_ok());
        assert!(check_well_formed("<a><b></a>").is_err());
        assert!(check_well_formed("<a>").is_err());
        assert!(check_well_formed("").is_err());
        assert!(check_well_formed("<a/><b/>").is_err());
    }
}
