//! Integration tests: real xlsx files on disk through intake, the workbench views and export

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use sheetbench::services::decoder::decode_path;
use sheetbench::{
    CellValue, ColumnSelection, Config, ExportTarget, IntakeService, View, Workbench,
    WorkbenchError,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Cells of a fixture sheet
enum Cell {
    Text(&'static str),
    Number(f64),
    Empty,
}

fn write_fixture(dir: &Path, name: &str, rows: &[Vec<Cell>]) -> PathBuf {
    let path = dir.join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r as u32, c as u16, *s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r as u32, c as u16, *n).unwrap();
                }
                Cell::Empty => {}
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// people.xlsx: 3 rows with an Excel serial in the Joined column and one fully blank row
/// orders.xlsx: 1 row
fn create_fixtures() -> (TempDir, PathBuf, PathBuf) {
    use Cell::*;
    let dir = TempDir::new().unwrap();
    let people = write_fixture(
        dir.path(),
        "people.xlsx",
        &[
            vec![Text("Name"), Text("Email"), Text("Joined")],
            vec![Text("Alice Smith"), Text("alice@example.com"), Number(44197.0)],
            vec![Empty, Empty, Empty],
            vec![Text("Bob Johnson"), Text("bob@test.com"), Number(44197.5)],
            vec![Text("Charlie Brown"), Empty, Number(44562.25)],
        ],
    );
    let orders = write_fixture(
        dir.path(),
        "orders.xlsx",
        &[
            vec![Text("Email"), Text("Total")],
            vec![Text("bob@test.com"), Number(0.5)],
        ],
    );
    (dir, people, orders)
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let (dir, people, orders) = create_fixtures();
    let corrupt = dir.path().join("corrupt.xlsx");
    std::fs::write(&corrupt, b"definitely not a zip archive").unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"Name,Email").unwrap();

    let report =
        IntakeService::load_batch(&[people, corrupt, notes, orders, dir.path().join("gone.xlsx")])
            .await;

    let loaded: Vec<&str> = report.loaded.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(loaded, vec!["people.xlsx", "orders.xlsx"]);
    assert_eq!(report.failed.len(), 3);
    assert!(matches!(&report.failed[0], WorkbenchError::Decode { name, .. } if name == "corrupt.xlsx"));
    assert!(
        matches!(&report.failed[1], WorkbenchError::InvalidFileType { name, .. } if name == "notes.txt")
    );
    assert!(matches!(&report.failed[2], WorkbenchError::Io { name, .. } if name == "gone.xlsx"));
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_decoded_rows_skip_blank_lines() {
    let (_dir, people, _orders) = create_fixtures();
    let table = IntakeService::load(people).await.unwrap();

    assert_eq!(table.header_names(), vec!["Name", "Email", "Joined"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.value(2, "Email"), None);
    assert_eq!(table.value(1, "Joined"), Some(&CellValue::Number(44197.5)));
}

#[tokio::test]
async fn test_shared_columns_and_combined_view() {
    let (_dir, people, orders) = create_fixtures();
    let mut bench = Workbench::default();
    let failed = bench.apply_report(IntakeService::load_batch(&[people, orders]).await);
    assert!(failed.is_empty());

    assert_eq!(bench.shared_columns(), vec!["Email".to_string()]);

    bench.toggle_selection("people.xlsx", "Joined").unwrap();
    bench.toggle_selection("orders.xlsx", "Email").unwrap();
    bench.toggle_selection("people.xlsx", "Name").unwrap();
    assert_eq!(
        bench.selections(),
        &[
            ColumnSelection::new("people.xlsx", "Joined"),
            ColumnSelection::new("orders.xlsx", "Email"),
            ColumnSelection::new("people.xlsx", "Name"),
        ]
    );

    let combined = bench.combined();
    assert_eq!(combined.header_names(), vec!["Joined", "Email", "Name"]);
    assert_eq!(combined.row_count(), 3);
    assert_eq!(
        combined.rows[0].cells,
        vec![
            Some(CellValue::from("01/01/2021 00:00:00")),
            Some(CellValue::from("bob@test.com")),
            Some(CellValue::from("Alice Smith")),
        ]
    );
    assert_eq!(combined.value(1, "Joined"), Some(&CellValue::from("01/01/2021 12:00:00")));
    assert_eq!(combined.value(1, "Email"), None);
    assert_eq!(combined.value(2, "Joined"), Some(&CellValue::from("01/01/2022 06:00:00")));
}

#[tokio::test]
async fn test_filtered_export_round_trip() {
    let (dir, people, _orders) = create_fixtures();
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();
    let config = Config {
        output_dir: out.clone(),
        ..Config::default()
    };
    let mut bench = Workbench::new(config);
    bench.apply_report(IntakeService::load_batch(&[people]).await);

    bench.set_filter("Email", "EXAMPLE");
    let path = bench.export(View::Filtered).unwrap();
    assert_eq!(path, out.join(ExportTarget::Filtered.file_name()));

    let exported = decode_path(&path).unwrap();
    assert_eq!(exported.header_names(), vec!["Name", "Email", "Joined"]);
    assert_eq!(exported.row_count(), 1);
    assert_eq!(exported.value(0, "Name"), Some(&CellValue::from("Alice Smith")));
    assert_eq!(exported.value(0, "Joined"), Some(&CellValue::Number(44197.0)));
}

#[tokio::test]
async fn test_combined_export_after_file_delete() {
    let (dir, people, orders) = create_fixtures();
    let mut bench = Workbench::new(Config {
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    });
    bench.apply_report(IntakeService::load_batch(&[people, orders]).await);
    bench.toggle_selection("orders.xlsx", "Total").unwrap();
    bench.toggle_selection("people.xlsx", "Name").unwrap();
    bench.delete_file("orders.xlsx").unwrap();
    bench.toggle_selection("people.xlsx", "Email").unwrap();

    let path = bench.export(View::Combined).unwrap();
    assert_eq!(path.file_name().unwrap(), "combined_data.xlsx");

    let exported = decode_path(&path).unwrap();
    assert_eq!(exported.header_names(), vec!["Name", "Email"]);
    assert_eq!(exported.row_count(), 3);
    assert_eq!(exported.value(2, "Email"), None);
}

#[tokio::test]
async fn test_pages_cover_every_row_once() {
    let dir = TempDir::new().unwrap();
    let mut rows = vec![vec![Cell::Text("Id")]];
    rows.extend((0..23).map(|i| vec![Cell::Number(i as f64)]));
    let path = write_fixture(dir.path(), "ids.xlsx", &rows);

    let mut bench = Workbench::default();
    bench.apply_report(IntakeService::load_batch(&[path]).await);
    let pager = bench.pager(View::Filtered);
    assert_eq!(pager.total_pages(), 3);

    let mut seen = Vec::new();
    for page in 0..pager.total_pages() {
        bench.set_page(View::Filtered, page as isize);
        let table = bench.page(View::Filtered).unwrap();
        assert!(table.row_count() <= 10);
        seen.extend(table.rows.iter().map(|r| r.get(0).and_then(CellValue::as_number)));
    }
    let expected: Vec<Option<f64>> = (0..23).map(|i| Some(i as f64)).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_combined_export_keeps_empty_selected_column() {
    use Cell::*;
    let dir = TempDir::new().unwrap();
    let contacts = write_fixture(
        dir.path(),
        "contacts.xlsx",
        &[
            vec![Text("Notes"), Text("Name")],
            vec![Empty, Text("Ann")],
            vec![Empty, Text("Bob")],
        ],
    );
    let mut bench = Workbench::new(Config {
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    });
    bench.apply_report(IntakeService::load_batch(&[contacts]).await);
    bench.toggle_selection("contacts.xlsx", "Notes").unwrap();
    bench.toggle_selection("contacts.xlsx", "Name").unwrap();

    let exported = decode_path(&bench.export(View::Combined).unwrap()).unwrap();
    assert_eq!(exported.header_names(), vec!["Notes", "Name"]);
    assert_eq!(exported.row_count(), 2);
    assert_eq!(exported.value(0, "Notes"), None);
    assert_eq!(exported.value(1, "Name"), Some(&CellValue::from("Bob")));
}
