use serde::{Deserialize, Serialize};

/// A datasource extracted from the workbook definition together with every
/// column element found beneath it, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    /// Internal datasource name.
    pub name: String,
    /// Optional human-readable caption.
    pub caption: Option<String>,
    /// Columns in document order.
    pub columns: Vec<RawColumn>,
}

impl Datasource {
    /// Name shown in the report: the caption when present, otherwise the
    /// internal name.
    pub fn display_name(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.name)
    }
}

/// A `column` element exactly as it appears in the workbook XML. Selection
/// logic (catalog membership, parameter detection) lives downstream; the
/// reader records everything it finds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    /// Internal identifier, e.g. `[Calculation_543921049468141568]`.
    pub name: String,
    /// Human-readable caption, absent on plain data columns.
    pub caption: Option<String>,
    /// Column-level alias attribute.
    pub alias: Option<String>,
    /// Domain type of a parameter column (`list`, `range`, ...).
    pub param_domain_type: Option<String>,
    /// Raw `type` attribute.
    pub datatype: Option<String>,
    /// Nested calculation element, when the column is calculated.
    pub calculation: Option<Calculation>,
    /// Enumerated key/value members, in document order.
    pub members: Vec<Member>,
}

impl RawColumn {
    /// Name shown in the raw listing sheet: the caption when present,
    /// otherwise the internal identifier.
    pub fn display_name(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.name)
    }

    /// Raw formula text, empty when the column carries no calculation or the
    /// calculation carries no formula.
    pub fn formula(&self) -> &str {
        self.calculation
            .as_ref()
            .and_then(|calculation| calculation.formula.as_deref())
            .unwrap_or_default()
    }
}

/// The `calculation` child of a column element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    /// Raw formula attribute. Absent on calculations that only classify the
    /// column (bins, groups).
    pub formula: Option<String>,
}

/// One enumerated value of a parameter column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub key: String,
    pub value: String,
}

/// A calculated field ready for the report: caption resolved, formula
/// rewritten in terms of display captions, comments separated out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedField {
    /// Display caption with surrounding brackets stripped.
    pub name: String,
    /// Internal identifier as it appears in the workbook.
    pub remote_name: String,
    /// Formula text with internal identifiers substituted by captions.
    pub formula: String,
    /// Concatenated `//`-prefixed comment lines.
    pub comment: String,
}

/// A user-adjustable parameter extracted from the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Column-level alias attribute, empty when not set.
    pub alias: String,
    /// Display caption.
    pub name: String,
    /// Internal identifier.
    pub remote_name: String,
    /// Parameter domain type, empty when not set.
    pub display_type: String,
    /// Raw data type.
    pub data_type: String,
    /// Newline-joined `key=value` listing of the allowed members.
    pub values: String,
    /// Default/current value formula.
    pub formula: String,
}

/// Everything the report emitter needs to materialise the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookReport {
    pub fields: Vec<CalculatedField>,
    pub parameters: Vec<Parameter>,
    pub datasources: Vec<Datasource>,
}
