//! Row-to-case mapping. Reserved columns fill the typed `Case` fields; every
//! other column becomes a `CaseProperty`, in input order.
use crate::core::id::new_identifier;
use crate::core::settings::CaseDefaults;
use crate::core::timestamp::now_utc;
use crate::error::{Error, Result};
use crate::io::records::Record;
use crate::types::{Case, CaseProperty};

/// Columns with dedicated mapping; never copied into the property list.
pub const RESERVED_FIELDS: [&str; 6] = [
    "id",
    "name",
    "case_type",
    "type",
    "modified_on",
    "server_modified_on",
];

pub fn is_reserved(column: &str) -> bool {
    RESERVED_FIELDS.contains(&column)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// True if `column` can be used verbatim as an unprefixed XML element name
/// (the XML `Name` production without `:`).
pub fn is_element_name(column: &str) -> bool {
    let mut chars = column.chars();
    match chars.next() {
        Some(first) => is_name_start_char(first) && chars.all(is_name_char),
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct CaseMapper {
    defaults: CaseDefaults,
}

impl CaseMapper {
    pub fn new(defaults: CaseDefaults) -> Self {
        Self { defaults }
    }

    /// Map one record. `row` is only used for error reporting.
    ///
    /// Property columns become element names in the form, so a column whose
    /// name is not a valid XML element name is rejected.
    pub fn map(&self, row: usize, record: &Record) -> Result<Case> {
        let name = record
            .get("name")
            .ok_or(Error::MissingField { field: "name", row })?;

        let id = match record.get("id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_identifier(),
        };

        let modified_on = record
            .get("modified_on")
            .map(str::to_string)
            .unwrap_or_else(now_utc);

        let mut properties = Vec::with_capacity(record.len());
        for (column, value) in record.iter().filter(|(column, _)| !is_reserved(column)) {
            if !is_element_name(column) {
                return Err(Error::Input {
                    row,
                    message: format!("column `{column}` is not a valid XML element name"),
                });
            }
            properties.push(CaseProperty::new(column, value));
        }

        Ok(Case {
            id,
            name: name.to_string(),
            case_type: self.defaults.case_type.clone(),
            owner_id: self.defaults.owner_id.clone(),
            modified_on,
            server_modified_on: record.get("server_modified_on").map(str::to_string),
            properties,
        })
    }

    /// Map a whole record stream in order, stopping at the first failure.
    pub fn map_all<I>(&self, records: I) -> Result<Vec<Case>>
    where
        I: IntoIterator<Item = Result<(usize, Record)>>,
    {
        records
            .into_iter()
            .map(|item| item.and_then(|(row, record)| self.map(row, &record)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn mapper() -> CaseMapper {
        CaseMapper::new(CaseDefaults {
            case_type: "patient".to_string(),
            owner_id: "owner-1".to_string(),
        })
    }

    #[test]
    fn maps_name_and_generic_columns() {
        let record = Record::new()
            .with_field("name", "Alice")
            .with_field("other_test", "42");
        let case = mapper().map(1, &record).unwrap();

        assert_eq!(case.name, "Alice");
        assert_eq!(case.case_type, "patient");
        assert_eq!(case.owner_id, "owner-1");
        assert_eq!(case.properties, vec![CaseProperty::new("other_test", "42")]);
        assert_eq!(case.id.len(), 32);
        assert!(case.id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(case.modified_on.ends_with('Z'));
        assert_eq!(case.server_modified_on, None);
    }

    #[test]
    fn supplied_values_win_over_defaults() {
        let record = Record::new()
            .with_field("id", "case-7")
            .with_field("name", "Bob")
            .with_field("modified_on", "2020-01-01T00:00:00.000Z")
            .with_field("server_modified_on", "2020-01-02T00:00:00.000Z");
        let case = mapper().map(1, &record).unwrap();

        assert_eq!(case.id, "case-7");
        assert_eq!(case.modified_on, "2020-01-01T00:00:00.000Z");
        assert_eq!(
            case.server_modified_on.as_deref(),
            Some("2020-01-02T00:00:00.000Z")
        );
        assert!(case.properties.is_empty());
    }

    #[test]
    fn empty_id_is_generated_but_empty_server_modified_on_is_kept() {
        let record = Record::new()
            .with_field("id", "")
            .with_field("name", "Carol")
            .with_field("server_modified_on", "");
        let case = mapper().map(1, &record).unwrap();
        assert!(!case.id.is_empty());
        assert_eq!(case.server_modified_on.as_deref(), Some(""));
    }

    #[test]
    fn reserved_columns_are_excluded_and_order_is_kept() {
        let record = Record::new()
            .with_field("zeta", "z")
            .with_field("type", "ignored")
            .with_field("name", "Dan")
            .with_field("case_type", "ignored")
            .with_field("alpha", "");
        let case = mapper().map(1, &record).unwrap();
        assert_eq!(case.case_type, "patient");
        assert_eq!(
            case.properties,
            vec![CaseProperty::new("zeta", "z"), CaseProperty::new("alpha", "")]
        );
    }

    #[test]
    fn element_names_follow_xml_name_rules() {
        for ok in ["other_test", "_x", "a-b.c", "visit2", "größe", "名前"] {
            assert!(is_element_name(ok), "rejected {ok:?}");
        }
        for bad in ["", "1st_visit", "a&b", "x?y", "weight(kg)", "bad name", "ns:tag", "-x", ".x"] {
            assert!(!is_element_name(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn invalid_column_name_is_an_input_error_naming_the_column() {
        for column in ["1st_visit", "weight(kg)"] {
            let record = Record::new()
                .with_field("name", "Eve")
                .with_field(column, "v");
            match mapper().map(5, &record) {
                Err(Error::Input { row, message }) => {
                    assert_eq!(row, 5);
                    assert!(message.contains(column), "{message}");
                }
                other => panic!("expected input error, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_name_reports_field_and_row() {
        let record = Record::new().with_field("other_test", "1");
        match mapper().map(4, &record) {
            Err(Error::MissingField { field, row }) => {
                assert_eq!(field, "name");
                assert_eq!(row, 4);
            }
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let mapper = mapper();
        let record = Record::new().with_field("name", "Same");
        let ids: HashSet<String> = (1..=10_000)
            .map(|row| mapper.map(row, &record).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn map_all_preserves_order_and_stops_on_error() {
        let rows = vec![
            Ok((1, Record::new().with_field("name", "first"))),
            Ok((2, Record::new().with_field("name", "second"))),
        ];
        let cases = mapper().map_all(rows).unwrap();
        let names: Vec<_> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);

        let rows = vec![
            Ok((1, Record::new().with_field("name", "first"))),
            Ok((2, Record::new().with_field("other", "x"))),
        ];
        assert!(matches!(
            mapper().map_all(rows),
            Err(Error::MissingField { row: 2, .. })
        ));
    }
}
