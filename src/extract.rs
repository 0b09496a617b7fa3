use std::collections::HashSet;

use crate::catalog::{FieldCatalog, PARAMETER_MARKER};
use crate::error::{AuditError, Result};
use crate::model::{CalculatedField, Datasource, Parameter, RawColumn};
use crate::resolve::{resolve_formula, split_formula};

/// Extracts one record per calculated column with a formula, with the
/// formula resolved against the completed catalog. Duplicates by
/// (caption, identifier) collapse to the first occurrence.
pub fn calculated_fields(
    datasources: &[Datasource],
    catalog: &FieldCatalog,
) -> Vec<CalculatedField> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut fields = Vec::new();

    for column in datasources.iter().flat_map(|datasource| &datasource.columns) {
        let Some(caption) = column.caption.as_deref() else {
            continue;
        };
        let Some(calculation) = &column.calculation else {
            continue;
        };
        if column.name.is_empty() || column.name.contains(PARAMETER_MARKER) {
            continue;
        }
        let Some(raw) = calculation.formula.as_deref() else {
            continue;
        };

        let name = strip_brackets(caption).to_string();
        if !seen.insert((name.clone(), column.name.clone())) {
            continue;
        }

        let split = split_formula(raw);
        fields.push(CalculatedField {
            name,
            remote_name: column.name.clone(),
            formula: resolve_formula(&split.body, catalog),
            comment: split.comment,
        });
    }

    fields
}

/// Extracts one record per parameter-type column. Missing required
/// attributes surface as [`AuditError::MissingAttribute`] rather than being
/// silently defaulted.
pub fn parameters(datasources: &[Datasource]) -> Result<Vec<Parameter>> {
    let mut parameters = Vec::new();

    for column in datasources.iter().flat_map(|datasource| &datasource.columns) {
        if !column.name.contains(PARAMETER_MARKER) {
            continue;
        }
        let Some(calculation) = &column.calculation else {
            continue;
        };

        let caption = require_attribute(column, column.caption.as_deref(), "caption")?;
        let data_type = require_attribute(column, column.datatype.as_deref(), "type")?;

        let values = column
            .members
            .iter()
            .map(|member| format!("{}={}", member.key, member.value))
            .collect::<Vec<_>>()
            .join("\n");

        parameters.push(Parameter {
            alias: column.alias.clone().unwrap_or_default(),
            name: caption.to_string(),
            remote_name: column.name.clone(),
            display_type: column.param_domain_type.clone().unwrap_or_default(),
            data_type: data_type.to_string(),
            values,
            formula: calculation.formula.clone().unwrap_or_default(),
        });
    }

    Ok(parameters)
}

/// Strips the surrounding brackets a caption carries inside formula text.
pub fn strip_brackets(caption: &str) -> &str {
    caption.trim_matches(|ch| ch == '[' || ch == ']')
}

fn require_attribute<'a>(
    column: &RawColumn,
    value: Option<&'a str>,
    attribute: &str,
) -> Result<&'a str> {
    value.ok_or_else(|| AuditError::MissingAttribute {
        column: column.name.clone(),
        attribute: attribute.to_string(),
    })
}
