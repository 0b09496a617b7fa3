use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::Result;
use crate::model::{Calculation, Datasource, Member, RawColumn};

/// Reads every datasource and its column metadata from a workbook
/// definition file.
pub fn read_datasources(path: &Path) -> Result<Vec<Datasource>> {
    let source = fs::read_to_string(path)?;
    parse_datasources(&source)
}

/// Parses workbook XML from an in-memory string.
///
/// Only `datasource` subtrees are inspected; the worksheet/dashboard
/// sections of the document (including `datasource-dependencies` blocks)
/// are skipped. Malformed XML surfaces as [`crate::AuditError::Xml`].
pub fn parse_datasources(xml: &str) -> Result<Vec<Datasource>> {
    let mut reader = Reader::from_str(xml);

    let mut datasources: Vec<Datasource> = Vec::new();
    let mut current_datasource: Option<Datasource> = None;
    let mut current_column: Option<RawColumn> = None;
    // Depth of datasource elements nested inside the one being collected.
    let mut nested_datasources = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(event) => match event.name().as_ref() {
                b"datasource" => {
                    if current_datasource.is_some() {
                        nested_datasources += 1;
                    } else {
                        current_datasource = Some(datasource_from(&event));
                    }
                }
                b"column" => {
                    if current_datasource.is_some() && current_column.is_none() {
                        current_column = Some(column_from(&event));
                    }
                }
                b"calculation" => apply_calculation(current_column.as_mut(), &event),
                b"alias" => apply_member(current_column.as_mut(), &event),
                _ => {}
            },
            Event::Empty(event) => match event.name().as_ref() {
                b"datasource" => {
                    if current_datasource.is_none() {
                        datasources.push(datasource_from(&event));
                    }
                }
                b"column" => {
                    if let Some(datasource) = current_datasource.as_mut() {
                        if current_column.is_none() {
                            datasource.columns.push(column_from(&event));
                        }
                    }
                }
                b"calculation" => apply_calculation(current_column.as_mut(), &event),
                b"alias" => apply_member(current_column.as_mut(), &event),
                _ => {}
            },
            Event::End(event) => match event.name().as_ref() {
                b"datasource" => {
                    if nested_datasources > 0 {
                        nested_datasources -= 1;
                    } else if let Some(datasource) = current_datasource.take() {
                        datasources.push(datasource);
                    }
                }
                b"column" => {
                    if let (Some(datasource), Some(column)) =
                        (current_datasource.as_mut(), current_column.take())
                    {
                        datasource.columns.push(column);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(datasources)
}

fn datasource_from(event: &BytesStart<'_>) -> Datasource {
    Datasource {
        name: attribute(event, b"name").unwrap_or_default(),
        caption: attribute(event, b"caption"),
        columns: Vec::new(),
    }
}

fn column_from(event: &BytesStart<'_>) -> RawColumn {
    RawColumn {
        name: attribute(event, b"name").unwrap_or_default(),
        caption: attribute(event, b"caption"),
        alias: attribute(event, b"alias"),
        param_domain_type: attribute(event, b"param-domain-type"),
        datatype: attribute(event, b"type"),
        calculation: None,
        members: Vec::new(),
    }
}

fn apply_calculation(column: Option<&mut RawColumn>, event: &BytesStart<'_>) {
    if let Some(column) = column {
        column.calculation = Some(Calculation {
            formula: attribute(event, b"formula"),
        });
    }
}

fn apply_member(column: Option<&mut RawColumn>, event: &BytesStart<'_>) {
    let Some(column) = column else {
        return;
    };
    if let (Some(key), Some(value)) = (attribute(event, b"key"), attribute(event, b"value")) {
        column.members.push(Member { key, value });
    }
}

fn attribute(event: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    event
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
}
