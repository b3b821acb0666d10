use std::{path::Path, time::Instant};

use fitsio::{hdu::HduInfo, FitsFile};

use crate::source::{ProfileTable, SourceError};

type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug)]
struct Column {
    name: String,
    unit: String,
    values: Vec<f64>,
}

/// In-memory copy of the first binary table extension of a FITS file
///
/// Column units come from the `TUNITn` keywords; columns without one get an
/// empty unit string. Vector columns are kept flattened, row by row.
#[derive(Debug, Default)]
pub struct FitsTable {
    columns: Vec<Column>,
    rows: usize,
}
impl FitsTable {
    /// Read every column of the first data extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut fptr = FitsFile::open(path.as_ref())?;
        log::info!("Loading {:?}...", path.as_ref());
        let now = Instant::now();
        let hdu = fptr.hdu(1)?;
        let (names, rows) = match &hdu.info {
            HduInfo::TableInfo {
                column_descriptions,
                num_rows,
            } => (
                column_descriptions
                    .iter()
                    .map(|column| column.name.clone())
                    .collect::<Vec<_>>(),
                *num_rows,
            ),
            _ => return Err(SourceError::NotATable),
        };
        let mut columns = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            let values: Vec<f64> = hdu.read_col(&mut fptr, &name)?;
            let unit: String = hdu
                .read_key(&mut fptr, &format!("TUNIT{}", index + 1))
                .unwrap_or_default();
            columns.push(Column { name, unit, values });
        }
        log::info!(
            "Loaded {} columns of {} rows in {}ms",
            columns.len(),
            rows,
            now.elapsed().as_millis()
        );
        Ok(Self { columns, rows })
    }
}
impl ProfileTable for FitsTable {
    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }
    fn column_unit(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.unit.as_str())
    }
    fn column_values(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.values.as_slice())
    }
    fn row_count(&self) -> usize {
        self.rows
    }
}
