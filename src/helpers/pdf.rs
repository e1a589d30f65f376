//! Payslip PDF rendering.
//!
//! Builds the fixed one-page layout from scratch: a centered bold title,
//! the employee identity lines, the three salary components and the
//! emphasized net salary line.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::info;

use crate::error::RenderError;
use crate::models::employee::EmployeeRecord;

// A4 portrait, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;

const TITLE: &str = "Monthly Payslip";
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 28.0;

/// Render the payslip for one employee and write it to
/// `<output_dir>/<employee_id>.pdf`.
///
/// The output directory is created if absent. Re-rendering the same
/// employee ID overwrites the previous file.
pub fn render_payslip(
    record: &EmployeeRecord,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, RenderError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let bytes = payslip_document(record)?;
    let path = output_dir.join(format!("{}.pdf", record.employee_id));
    fs::write(&path, &bytes)?;

    info!(
        "Wrote payslip for {} to {} ({} bytes)",
        record.employee_id,
        path.display(),
        bytes.len()
    );
    Ok(path)
}

/// Build the single-page document as raw PDF bytes.
fn payslip_document(record: &EmployeeRecord) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let content = Content {
        operations: payslip_operations(record),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn payslip_operations(record: &EmployeeRecord) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - 78.0;

    let title_x = (PAGE_WIDTH - text_width(TITLE, TITLE_SIZE)) / 2.0;
    push_line(&mut ops, "F2", TITLE_SIZE, title_x, y, TITLE.to_string());
    y -= LINE_HEIGHT + 10.0;

    for text in [
        format!("Employee ID: {}", record.employee_id),
        format!("Name: {}", record.name),
    ] {
        push_line(&mut ops, "F1", BODY_SIZE, MARGIN, y, text);
        y -= LINE_HEIGHT;
    }
    y -= 14.0;

    // Raw numeric values after the currency sign; no locale formatting.
    for text in [
        format!("Basic Salary: ${}", record.basic_salary),
        format!("Allowances: ${}", record.allowances),
        format!("Deductions: ${}", record.deductions),
    ] {
        push_line(&mut ops, "F1", BODY_SIZE, MARGIN, y, text);
        y -= LINE_HEIGHT;
    }
    y -= 14.0;

    push_line(
        &mut ops,
        "F2",
        BODY_SIZE,
        MARGIN,
        y,
        format!("Net Salary: ${}", record.net_salary),
    );

    ops
}

fn push_line(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: String) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

// Rough Helvetica advance; close enough to center a short title.
fn text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.5
}
