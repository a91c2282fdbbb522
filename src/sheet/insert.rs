use std::path::{Path, PathBuf};

use anyhow::Context as _;
use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::{Formula, Image, Workbook, Worksheet};

use crate::foundation::error::{YardError, YardResult};
use crate::foundation::fs::list_files_with_extensions;
use crate::sheet::read::cell_text;

/// Image extensions inserted by [`insert_images`].
pub const INSERT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Zero-based index of column `G`.
pub const IMAGE_COLUMN: u16 = 6;

/// Options for [`insert_images`].
#[derive(Clone, Debug)]
pub struct InsertOpts {
    pub image_dir: PathBuf,
    /// Rewritten in place.
    pub workbook: PathBuf,
    pub scale: f64,
}

impl InsertOpts {
    pub fn new(image_dir: impl Into<PathBuf>, workbook: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            workbook: workbook.into(),
            scale: 0.4,
        }
    }
}

/// What [`insert_images`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertReport {
    /// Images inserted, in row order.
    pub inserted: Vec<PathBuf>,
    /// Pixel width given to the image column.
    pub column_width_px: u16,
    /// Sheets carried over from the original workbook.
    pub sheets: Vec<String>,
}

fn xlsx_err(what: &'static str) -> impl FnOnce(rust_xlsxwriter::XlsxError) -> YardError {
    move |e| YardError::sheet(format!("{what}: {e}"))
}

fn scaled_px(v: u32, scale: f64) -> u16 {
    (f64::from(v) * scale).round().clamp(1.0, f64::from(u16::MAX)) as u16
}

fn copy_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &Data) -> YardResult<()> {
    let res = match cell {
        Data::Empty => return Ok(()),
        Data::Int(v) => ws.write_number(row, col, *v as f64).map(|_| ()),
        Data::Float(v) => ws.write_number(row, col, *v).map(|_| ()),
        Data::Bool(v) => ws.write_boolean(row, col, *v).map(|_| ()),
        Data::DateTime(v) => ws.write_number(row, col, v.as_f64()).map(|_| ()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            ws.write_string(row, col, s.as_str()).map(|_| ())
        }
        Data::Error(e) => ws.write_string(row, col, e.to_string()).map(|_| ()),
    };
    res.map_err(xlsx_err("write cell"))
}

/// Write each non-empty formula of `formulas`, with the cached value from `values` as its result.
fn copy_formulas(
    ws: &mut Worksheet,
    name: &str,
    formulas: &Range<String>,
    values: &Range<Data>,
) -> YardResult<()> {
    let (r0, c0) = formulas.start().unwrap_or((0, 0));
    for (r, c, text) in formulas.used_cells() {
        if text.trim().is_empty() {
            continue;
        }
        let row = r0 + r as u32;
        let abs_col = c0 + c as u32;
        let col = u16::try_from(abs_col)
            .map_err(|_| YardError::sheet(format!("sheet '{name}' is too wide")))?;
        let mut formula = Formula::new(text);
        if let Some(cached) = values.get_value((row, abs_col)).and_then(cell_text) {
            formula = formula.set_result(cached);
        }
        ws.write_formula(row, col, formula)
            .map_err(xlsx_err("write formula"))?;
    }
    Ok(())
}

/// Rebuild every sheet of `path` into a fresh workbook: values and formulas, no formatting.
fn carry_over(path: &Path) -> YardResult<(Workbook, Vec<String>)> {
    let mut src = open_workbook_auto(path)
        .map_err(|e| YardError::sheet(format!("cannot open workbook '{}': {e}", path.display())))?;

    let mut book = Workbook::new();
    let names = src.sheet_names();
    for name in &names {
        let range = src
            .worksheet_range(name)
            .map_err(|e| YardError::sheet(format!("cannot read sheet '{name}': {e}")))?;
        let ws = book.add_worksheet();
        ws.set_name(name).map_err(xlsx_err("set sheet name"))?;

        let (r0, c0) = range.start().unwrap_or((0, 0));
        for (r, c, cell) in range.used_cells() {
            let row = r0 + r as u32;
            let col = u16::try_from(c0 as usize + c)
                .map_err(|_| YardError::sheet(format!("sheet '{name}' is too wide")))?;
            copy_cell(ws, row, col, cell)?;
        }

        match src.worksheet_formula(name) {
            Ok(formulas) => copy_formulas(ws, name, &formulas, &range)?,
            Err(e) => tracing::warn!("formulas of sheet '{name}' not kept: {e}"),
        }
    }
    if names.is_empty() {
        book.add_worksheet();
    }
    Ok((book, names))
}

/// Insert each image in `opts.image_dir` into column `G` of the first sheet, one per row.
///
/// Rows grow to the scaled image height and column `G` to the widest scaled image. Cell values
/// and formulas of all sheets are kept; formatting is not.
#[tracing::instrument(skip(opts), fields(workbook = %opts.workbook.display()))]
pub fn insert_images(opts: &InsertOpts) -> YardResult<InsertReport> {
    if !(opts.scale.is_finite() && opts.scale > 0.0) {
        return Err(YardError::validation("image scale must be > 0"));
    }
    if !opts.image_dir.is_dir() {
        return Err(YardError::validation(format!(
            "image folder '{}' does not exist",
            opts.image_dir.display()
        )));
    }

    let images = list_files_with_extensions(&opts.image_dir, &INSERT_EXTENSIONS)?;
    let (mut book, sheets) = carry_over(&opts.workbook)?;

    let mut report = InsertReport {
        sheets,
        ..InsertReport::default()
    };
    {
        let ws = book
            .worksheet_from_index(0)
            .map_err(xlsx_err("select first sheet"))?;

        for (row, path) in (0u32..).zip(&images) {
            let (w, h) = image::image_dimensions(path)
                .with_context(|| format!("read image size of '{}'", path.display()))?;
            let img = Image::new(path)
                .map_err(xlsx_err("load image"))?
                .set_scale_width(opts.scale)
                .set_scale_height(opts.scale);

            let (sw, sh) = (scaled_px(w, opts.scale), scaled_px(h, opts.scale));
            ws.set_row_height_pixels(row, sh)
                .map_err(xlsx_err("set row height"))?;
            ws.insert_image(row, IMAGE_COLUMN, &img)
                .map_err(xlsx_err("insert image"))?;
            report.column_width_px = report.column_width_px.max(sw);

            tracing::info!(row = row + 1, "inserted {}", path.display());
            report.inserted.push(path.clone());
        }

        if report.column_width_px > 0 {
            ws.set_column_width_pixels(IMAGE_COLUMN, report.column_width_px)
                .map_err(xlsx_err("set column width"))?;
        }
    }

    book.save(&opts.workbook).map_err(xlsx_err("save workbook"))?;
    Ok(report)
}
