use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::{Formula, Workbook};

use yardkit::sheet::{InsertOpts, insert_images, read_column};

fn write_workbook(path: &Path) {
    let mut book = Workbook::new();
    let data = book.add_worksheet();
    data.set_name("Data").unwrap();
    data.write_string(0, 0, "name").unwrap();
    data.write_string(0, 1, "generated_url").unwrap();
    data.write_string(1, 0, "rose").unwrap();
    data.write_string(1, 1, "https://img.example.com/rose.png").unwrap();
    data.write_string(2, 0, "fern").unwrap();
    data.write_string(3, 0, "moss").unwrap();
    data.write_string(3, 1, "https://img.example.com/moss").unwrap();
    data.write_number(4, 0, 42.5).unwrap();

    let notes = book.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "keep me").unwrap();
    book.save(path).unwrap();
}

fn write_png(path: &Path, w: u32, h: u32) {
    image::RgbImage::from_pixel(w, h, image::Rgb([10, 120, 40]))
        .save(path)
        .unwrap();
}

#[test]
fn url_column_keeps_sheet_row_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("urls.xlsx");
    write_workbook(&book);

    let rows = read_column(&book, "generated_url").unwrap();
    let got: Vec<(u32, &str)> = rows.iter().map(|r| (r.row, r.value.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (2, "https://img.example.com/rose.png"),
            (4, "https://img.example.com/moss"),
        ]
    );

    let err = read_column(&book, "url").unwrap_err().to_string();
    assert!(err.contains("name, generated_url"), "{err}");
}

#[test]
fn images_go_into_column_g_and_values_survive() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("plants.xlsx");
    write_workbook(&book);

    let images = dir.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    write_png(&images.join("02.png"), 200, 80);
    write_png(&images.join("01.png"), 100, 50);
    std::fs::write(images.join("readme.txt"), "skip").unwrap();

    let report = insert_images(&InsertOpts::new(&images, &book)).unwrap();
    assert_eq!(report.inserted, vec![images.join("01.png"), images.join("02.png")]);
    assert_eq!(report.column_width_px, 80);
    assert_eq!(report.sheets, vec!["Data".to_owned(), "Notes".to_owned()]);

    let mut wb = open_workbook_auto(&book).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Data".to_owned(), "Notes".to_owned()]);

    let data = wb.worksheet_range("Data").unwrap();
    assert_eq!(data.get_value((1, 0)), Some(&Data::String("rose".into())));
    assert_eq!(data.get_value((4, 0)), Some(&Data::Float(42.5)));

    let notes = wb.worksheet_range("Notes").unwrap();
    assert_eq!(notes.get_value((0, 0)), Some(&Data::String("keep me".into())));
}

#[test]
fn formulas_survive_image_insertion() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("calc.xlsx");
    {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_number(0, 0, 2.0).unwrap();
        ws.write_formula(1, 0, Formula::new("=A1*3").set_result("6")).unwrap();
        wb.save(&book).unwrap();
    }

    let images = dir.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    write_png(&images.join("leaf.png"), 40, 40);
    insert_images(&InsertOpts::new(&images, &book)).unwrap();

    let mut wb = open_workbook_auto(&book).unwrap();
    let formulas = wb.worksheet_formula("Sheet1").unwrap();
    assert_eq!(
        formulas.get_value((1, 0)).map(|f| f.trim_start_matches('=')),
        Some("A1*3")
    );
    let values = wb.worksheet_range("Sheet1").unwrap();
    assert_eq!(values.get_value((0, 0)), Some(&Data::Float(2.0)));
    assert_eq!(values.get_value((1, 0)).map(|v| v.to_string()).as_deref(), Some("6"));
}

#[test]
fn missing_image_folder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("plants.xlsx");
    write_workbook(&book);

    let err = insert_images(&InsertOpts::new(dir.path().join("nope"), &book));
    assert!(err.is_err());
}
