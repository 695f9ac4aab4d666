use crate::utils::error::{ClientError, Result};
use calamine::{Reader, Sheets, Xls, Xlsx};
use std::io::Cursor;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["csv", "txt", "html", "xls", "xlsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// csv / txt / html，原文直接讀
    Text,
    Xls,
    Xlsx,
}

impl FileKind {
    /// Classifies an upload by the text after its last `.`.
    pub fn from_file_name(path: &str) -> Result<Self> {
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        let extension = name.rsplit('.').next().unwrap_or(name).to_lowercase();

        match extension.as_str() {
            "csv" | "txt" | "html" => Ok(FileKind::Text),
            "xls" => Ok(FileKind::Xls),
            "xlsx" => Ok(FileKind::Xlsx),
            _ => Err(ClientError::UnsupportedFileType { extension }),
        }
    }
}

/// Turns uploaded bytes into text the extractor can scan.
pub fn read_import_text(kind: FileKind, bytes: Vec<u8>) -> Result<String> {
    match kind {
        FileKind::Text => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        FileKind::Xls => {
            let workbook = Xls::new(Cursor::new(bytes)).map_err(calamine::Error::Xls)?;
            workbook_to_csv(Sheets::Xls(workbook))
        }
        FileKind::Xlsx => {
            let workbook = Xlsx::new(Cursor::new(bytes)).map_err(calamine::Error::Xlsx)?;
            workbook_to_csv(Sheets::Xlsx(workbook))
        }
    }
}

/// 每個工作表轉成 CSV，依活頁簿順序串起來，每張表後面接一個換行
fn workbook_to_csv(mut workbook: Sheets<Cursor<Vec<u8>>>) -> Result<String> {
    let mut text = String::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        tracing::debug!("Converting sheet '{}' ({} rows)", name, range.height());

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in range.rows() {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ClientError::IoError(e.into_error()))?;
        let sheet = String::from_utf8_lossy(&bytes);
        text.push_str(sheet.trim_end_matches('\n'));
        text.push('\n');
    }

    Ok(text)
}
