//! Spreadsheet access: reading a URL column and inserting images next to rows.

/// Insert a folder of images into a workbook.
pub mod insert;
/// Read values out of a workbook.
pub mod read;

pub use insert::{InsertOpts, InsertReport, insert_images};
pub use read::{SheetRow, read_column};
