use calamine::{open_workbook, Sheets, Xls, Xlsx};
use serde::Serialize;
use std::{fs::File, io::BufReader, path::Path};

pub type Workbook = Sheets<BufReader<File>>;

/// A spreadsheet reader backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Legacy BIFF (`.xls`).
    Xls,
    /// Office Open XML (`.xlsx`).
    Xlsx,
}

impl Engine {
    /// Engines to try, in order, for a file with this extension.
    ///
    /// Some `.xls` releases are really OOXML with the legacy extension, so `.xls` falls
    /// back to the `.xlsx` reader instead of being rejected.
    pub fn candidates(path: &Path) -> &'static [Engine] {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx") => &[Engine::Xlsx],
            Some("xls") => &[Engine::Xls, Engine::Xlsx],
            _ => &[Engine::Xlsx, Engine::Xls],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Engine::Xls => "xls",
            Engine::Xlsx => "xlsx",
        }
    }

    pub fn open(self, path: &Path) -> Result<Workbook, calamine::Error> {
        match self {
            Engine::Xls => open_workbook::<Xls<_>, _>(path)
                .map(Sheets::Xls)
                .map_err(calamine::Error::from),
            Engine::Xlsx => open_workbook::<Xlsx<_>, _>(path)
                .map(Sheets::Xlsx)
                .map_err(calamine::Error::from),
        }
    }
}
