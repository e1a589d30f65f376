//! Employee table loading and validation.

use std::path::Path;

use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use tracing::{error, info};

use crate::error::DataError;
use crate::models::employee::EmployeeRecord;

/// Columns that must be present, and filled for every row.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Employee ID",
    "Name",
    "Email",
    "Basic Salary",
    "Allowances",
    "Deductions",
];

/// Load every employee record from the first sheet of the workbook at `path`.
///
/// The whole table is validated before any record is returned: a missing
/// required column or an empty required cell rejects the batch wholesale.
/// There is no partial-load mode.
pub fn load_employees(path: impl AsRef<Path>) -> Result<Vec<EmployeeRecord>, DataError> {
    let path = path.as_ref();
    info!("Reading employee data from {}", path.display());

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
        error!("Failed to open workbook {}: {}", path.display(), e);
        DataError::Workbook(e)
    })?;

    let table = match workbook.worksheet_range_at(0) {
        Some(Ok(table)) => table,
        Some(Err(e)) => {
            error!("Failed to parse sheet in {}: {}", path.display(), e);
            return Err(DataError::Workbook(e));
        }
        None => {
            error!("Workbook {} contains no sheets", path.display());
            return Err(DataError::NoSheet);
        }
    };

    let records = records_from_table(&table).inspect_err(|e| {
        error!("Employee table rejected: {}", e);
    })?;

    info!("Loaded {} employee record(s)", records.len());
    Ok(records)
}

/// Validate the table and convert its rows, preserving row order.
///
/// Column presence is checked before cell completeness, and completeness
/// over the full table before any cell is converted.
fn records_from_table(table: &Range<Data>) -> Result<Vec<EmployeeRecord>, DataError> {
    let mut rows = table.rows();
    let header = rows
        .next()
        .ok_or(DataError::MissingColumn(REQUIRED_COLUMNS[0]))?;

    let columns = required_column_indices(header)?;

    let data_rows: Vec<&[Data]> = rows.collect();
    scan_for_missing_cells(&data_rows, &columns)?;

    data_rows
        .iter()
        .enumerate()
        .map(|(i, row)| record_from_row(row, &columns, i + 2))
        .collect()
}

/// Map each required column name to its index in the header row.
/// Extra columns are ignored.
fn required_column_indices(header: &[Data]) -> Result<[usize; 6], DataError> {
    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = header
            .iter()
            .position(|cell| cell.as_string().as_deref() == Some(name))
            .ok_or(DataError::MissingColumn(name))?;
    }
    Ok(indices)
}

/// Full-table scan over exactly the required columns; the first empty cell
/// rejects the batch before a single record is built.
fn scan_for_missing_cells(rows: &[&[Data]], columns: &[usize; 6]) -> Result<(), DataError> {
    for (i, row) in rows.iter().enumerate() {
        for (&col, name) in columns.iter().zip(REQUIRED_COLUMNS) {
            if row.get(col).is_none_or(|cell| cell.is_empty()) {
                return Err(DataError::MissingCell {
                    row: i + 2,
                    column: name,
                });
            }
        }
    }
    Ok(())
}

fn record_from_row(
    row: &[Data],
    columns: &[usize; 6],
    row_number: usize,
) -> Result<EmployeeRecord, DataError> {
    // Empty cells were ruled out by the scan above.
    let text = |idx: usize| row[columns[idx]].as_string().unwrap_or_default();
    let money = |idx: usize| {
        let cell = &row[columns[idx]];
        cell.as_f64().ok_or_else(|| DataError::InvalidNumber {
            row: row_number,
            column: REQUIRED_COLUMNS[idx],
            value: cell.to_string(),
        })
    };

    Ok(EmployeeRecord::new(
        text(0),
        text(1),
        text(2),
        money(3)?,
        money(4)?,
        money(5)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    fn n(value: f64) -> Data {
        Data::Float(value)
    }

    fn header() -> Vec<Data> {
        REQUIRED_COLUMNS.iter().map(|c| s(c)).collect()
    }

    fn table(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn ann_row() -> Vec<Data> {
        vec![
            s("E1"),
            s("Ann Lee"),
            s("ann@x.com"),
            n(3000.0),
            n(200.0),
            n(150.0),
        ]
    }

    #[test]
    fn converts_rows_and_computes_net_salary() {
        let records = records_from_table(&table(vec![header(), ann_row()])).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.employee_id, "E1");
        assert_eq!(record.name, "Ann Lee");
        assert_eq!(record.email, "ann@x.com");
        assert_eq!(record.net_salary, 3050.0);
    }

    #[test]
    fn preserves_row_order() {
        let mut second = ann_row();
        second[0] = s("E2");
        let records = records_from_table(&table(vec![header(), ann_row(), second])).unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, ["E1", "E2"]);
    }

    #[test]
    fn ignores_columns_outside_the_required_set() {
        let mut head = header();
        head.insert(0, s("Department"));
        let mut row = ann_row();
        row.insert(0, s("Finance"));

        let records = records_from_table(&table(vec![head, row])).unwrap();
        assert_eq!(records[0].employee_id, "E1");
        assert_eq!(records[0].basic_salary, 3000.0);
    }

    #[test]
    fn rejects_table_missing_a_required_column() {
        let mut head = header();
        head.pop(); // drop "Deductions"
        let mut row = ann_row();
        row.pop();

        let err = records_from_table(&table(vec![head, row])).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("Deductions")));
    }

    #[test]
    fn rejects_whole_table_on_an_empty_required_cell() {
        let mut second = ann_row();
        second[0] = s("E2");
        second[5] = Data::Empty;

        let err = records_from_table(&table(vec![header(), ann_row(), second])).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingCell {
                row: 3,
                column: "Deductions"
            }
        ));
    }

    #[test]
    fn completeness_scan_runs_before_cell_conversion() {
        let mut first = ann_row();
        first[3] = s("lots"); // invalid number, but present
        let mut second = ann_row();
        second[0] = s("E2");
        second[4] = Data::Empty;

        let err = records_from_table(&table(vec![header(), first, second])).unwrap_err();
        assert!(matches!(err, DataError::MissingCell { row: 3, .. }));
    }

    #[test]
    fn rejects_non_numeric_money_cells() {
        let mut row = ann_row();
        row[3] = s("lots");

        let err = records_from_table(&table(vec![header(), row])).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidNumber {
                row: 2,
                column: "Basic Salary",
                ..
            }
        ));
    }

    #[test]
    fn accepts_numeric_employee_ids() {
        let mut row = ann_row();
        row[0] = n(101.0);

        let records = records_from_table(&table(vec![header(), row])).unwrap();
        assert_eq!(records[0].employee_id, "101");
    }
}
