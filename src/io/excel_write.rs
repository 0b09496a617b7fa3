use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::model::{Datasource, WorkbookReport};

/// Sheet holding the deduplicated calculated-field table.
pub const CALCULATED_FIELDS_SHEET: &str = "Calculated Fields";
/// Sheet holding the parameter table.
pub const PARAMETERS_SHEET: &str = "Parameters";
/// Sheet holding the raw per-datasource column dump.
pub const INFORMATION_SHEET: &str = "Tableau Workbook Information";

const FIELD_HEADERS: [&str; 4] = ["Name", "Remote Name", "Formula", "Comment"];
const PARAMETER_HEADERS: [&str; 7] = [
    "Aliased Name",
    "Name",
    "Remote Name",
    "Display Type",
    "Data Type",
    "Value",
    "Formula",
];
const INFORMATION_HEADERS: [&str; 3] = ["Name", "Type", "Calculation"];

/// Writes the three report sheets to the given path.
pub fn write_report(path: &Path, report: &WorkbookReport) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let fields = workbook.add_worksheet();
    fields.set_name(CALCULATED_FIELDS_SHEET)?;
    write_rows(
        fields,
        &header,
        &FIELD_HEADERS,
        report.fields.iter().map(|field| {
            vec![
                field.name.as_str(),
                field.remote_name.as_str(),
                field.formula.as_str(),
                field.comment.as_str(),
            ]
        }),
    )?;

    let parameters = workbook.add_worksheet();
    parameters.set_name(PARAMETERS_SHEET)?;
    write_rows(
        parameters,
        &header,
        &PARAMETER_HEADERS,
        report.parameters.iter().map(|parameter| {
            vec![
                parameter.alias.as_str(),
                parameter.name.as_str(),
                parameter.remote_name.as_str(),
                parameter.display_type.as_str(),
                parameter.data_type.as_str(),
                parameter.values.as_str(),
                parameter.formula.as_str(),
            ]
        }),
    )?;

    let information = workbook.add_worksheet();
    information.set_name(INFORMATION_SHEET)?;
    write_information_sheet(information, &header, &report.datasources)?;

    workbook.save(path)?;
    Ok(())
}

fn write_rows<'a>(
    worksheet: &mut Worksheet,
    header: &Format,
    headers: &[&str],
    rows: impl IntoIterator<Item = Vec<&'a str>>,
) -> Result<()> {
    for (col_idx, title) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, *title, header)?;
    }
    for (row_idx, row) in rows.into_iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, *cell)?;
        }
    }
    worksheet.autofit();
    Ok(())
}

/// Writes the raw column dump: one group per datasource with a title row, a
/// header row, one row per column, and a blank separator row.
fn write_information_sheet(
    worksheet: &mut Worksheet,
    header: &Format,
    datasources: &[Datasource],
) -> Result<()> {
    let mut row: u32 = 0;
    for datasource in datasources {
        worksheet.write_string_with_format(row, 0, datasource.display_name(), header)?;
        row += 1;

        for (col_idx, title) in INFORMATION_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(row, col_idx as u16, *title, header)?;
        }
        row += 1;

        for column in &datasource.columns {
            worksheet.write_string(row, 0, column.display_name())?;
            worksheet.write_string(row, 1, column.datatype.as_deref().unwrap_or_default())?;
            worksheet.write_string(row, 2, column.formula())?;
            row += 1;
        }

        row += 1;
    }
    worksheet.autofit();
    Ok(())
}
