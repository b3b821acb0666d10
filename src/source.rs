use std::path::Path;

use itertools::Itertools;
use regex::Regex;
use strum_macros::{Display, EnumIter, EnumString};

use crate::fits::FitsTable;
use crate::profile::{ProfileError, RadProfile};

/// Linear pixel scale of the source image
pub const PIX2ARCSEC: f64 = 0.5; // arcsec / pix

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("Failed to read the FITS table")]
    Fits(#[from] fitsio::errors::Error),
    #[error("The first data extension is not a table")]
    NotATable,
    #[error("Column {0} is not in the table")]
    UnknownColumn(String),
    #[error("Expected 2 bin edges per row in column R, got {0} values for {1} rows")]
    BinEdges(usize, usize),
    #[error("Failed to rescale the profile")]
    Profile(#[from] ProfileError),
}
type Result<T> = std::result::Result<T, SourceError>;

/// Narrow view of a tabular data source: named numeric columns, each with a
/// unit string, over a fixed number of rows
///
/// Vector columns are exposed flattened, row by row.
pub trait ProfileTable {
    fn column_names(&self) -> Vec<&str>;
    fn column_unit(&self, name: &str) -> Option<&str>;
    fn column_values(&self, name: &str) -> Option<&[f64]>;
    fn row_count(&self) -> usize;
}

/// Well-known profile quantities recorded per pixel area in the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Quantity {
    #[strum(serialize = "SUR_BRI")]
    SurfaceBrightness,
    #[strum(serialize = "SUR_FLUX")]
    Flux,
}
impl Quantity {
    /// Table column holding the quantity
    pub fn column(self) -> &'static str {
        match self {
            Quantity::SurfaceBrightness => "SUR_BRI",
            Quantity::Flux => "SUR_FLUX",
        }
    }
    fn pixel_area_suffix(self) -> &'static str {
        match self {
            Quantity::SurfaceBrightness => "pixel**2",
            Quantity::Flux => "pixel**2/s",
        }
    }
    fn arcsec_area_suffix(self) -> &'static str {
        match self {
            Quantity::SurfaceBrightness => "arcsec**2",
            Quantity::Flux => "arcsec**2/s",
        }
    }
}

/// Best-effort rewrite of a per-pixel-area unit string into its
/// per-arcsec-area form
///
/// The pixel-area suffix is matched literally; a unit string that does not
/// end with it keeps its full text and only gains the arcsec suffix, leaving
/// the label wrong but the numbers right.
fn per_arcsec_unit(unit: &str, pixel_suffix: &str, arcsec_suffix: &str) -> String {
    format!("{}{}", unit.strip_suffix(pixel_suffix).unwrap_or(unit), arcsec_suffix)
}

/// Radial profiles extracted from one binned table
pub struct ProfileSource<T> {
    table: T,
}
impl ProfileSource<FitsTable> {
    /// Open the binned table in the first data extension of a FITS file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(FitsTable::open(path)?))
    }
}
impl<T: ProfileTable> ProfileSource<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }
    /// Column names and unit strings of the underlying table
    pub fn columns(&self) -> Vec<(&str, &str)> {
        self.table
            .column_names()
            .into_iter()
            .map(|name| (name, self.table.column_unit(name).unwrap_or("")))
            .collect()
    }
    pub fn len(&self) -> usize {
        self.table.row_count()
    }
    pub fn is_empty(&self) -> bool {
        self.table.row_count() == 0
    }
    /// Lower and upper bin edges from the two-column `R` field [arcsec]
    fn bin_edges(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let edges = self
            .table
            .column_values("R")
            .ok_or_else(|| SourceError::UnknownColumn(String::from("R")))?;
        let rows = self.table.row_count();
        if edges.len() != 2 * rows {
            return Err(SourceError::BinEdges(edges.len(), rows));
        }
        Ok(edges
            .iter()
            .copied()
            .tuples()
            .map(|(lo, hi)| (lo * PIX2ARCSEC, hi * PIX2ARCSEC))
            .unzip())
    }
    pub fn bin_lo(&self) -> Result<Vec<f64>> {
        Ok(self.bin_edges()?.0)
    }
    pub fn bin_hi(&self) -> Result<Vec<f64>> {
        Ok(self.bin_edges()?.1)
    }
    pub fn bin_mid(&self) -> Result<Vec<f64>> {
        let (bin_lo, bin_hi) = self.bin_edges()?;
        Ok(bin_lo
            .into_iter()
            .zip(bin_hi)
            .map(|(lo, hi)| 0.5 * (lo + hi))
            .collect())
    }
    /// Profile of any named column, with the `<name>_ERR` column as its
    /// uncertainty when present and zeros otherwise
    pub fn profile_for(&self, name: &str) -> Result<RadProfile> {
        let val = self
            .table
            .column_values(name)
            .ok_or_else(|| SourceError::UnknownColumn(name.to_string()))?
            .to_vec();
        let val_err = match self.table.column_values(&format!("{}_ERR", name)) {
            Some(err) => err.to_vec(),
            None => vec![0.0; val.len()],
        };
        let val_unit = self.table.column_unit(name).unwrap_or("").to_string();
        let (bin_lo, bin_hi) = self.bin_edges()?;
        Ok(RadProfile::new(
            bin_lo, bin_hi, "arcsec", val, val_err, val_unit,
        ))
    }
    /// Profile of a well-known quantity, converted from per pixel area to
    /// per arcsec area
    pub fn quantity_profile(&self, quantity: Quantity) -> Result<RadProfile> {
        let mut profile = self.profile_for(quantity.column())?;
        let unit = per_arcsec_unit(
            &profile.val_unit,
            quantity.pixel_area_suffix(),
            quantity.arcsec_area_suffix(),
        );
        profile.rescale(PIX2ARCSEC * PIX2ARCSEC, 0.0, Some(&unit))?;
        Ok(profile)
    }
    /// Surface brightness [per arcsec2]
    pub fn surface_brightness_profile(&self) -> Result<RadProfile> {
        self.quantity_profile(Quantity::SurfaceBrightness)
    }
    /// Photon flux [per arcsec2 per second]
    pub fn flux_profile(&self) -> Result<RadProfile> {
        self.quantity_profile(Quantity::Flux)
    }
    /// Print out a table summary, restricted to the columns matching
    /// `filter` when one is given
    pub fn summary(&self, filter: Option<&Regex>) {
        let max_value = |x: &[f64]| x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_value = |x: &[f64]| x.iter().cloned().fold(f64::INFINITY, f64::min);
        let minmax = |x| (min_value(x), max_value(x));
        let stats = |x: &[f64]| {
            let n = x.len() as f64;
            let mean = x.iter().sum::<f64>() / n;
            let std = (x.iter().map(|x| x - mean).fold(0f64, |s, x| s + x * x) / n).sqrt();
            (mean, std)
        };
        println!("SUMMARY:");
        println!(" - # of bins: {}", self.table.row_count());
        if let (Ok(bin_lo), Ok(bin_hi)) = (self.bin_lo(), self.bin_hi()) {
            if let (Some(first), Some(last)) = (bin_lo.first(), bin_hi.last()) {
                println!(" - radius range: [{:8.3}-{:8.3}]arcsec", first, last);
            }
        }
        println!(" - columns:");
        println!(
            "    {:^10} {:^18}: ({:^12}, {:^12})  ({:^12}, {:^12})",
            "COLUMN", "UNIT", "MEAN", "STD", "MIN", "MAX"
        );
        for (name, unit) in self.columns() {
            if filter.map_or(true, |re| re.is_match(name)) {
                if let Some(values) = self.table.column_values(name) {
                    println!(
                        "  - {:10} [{:16}]: {:>12.3?}  {:>12.3?}",
                        name,
                        unit,
                        stats(values),
                        minmax(values)
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MemTable {
        columns: Vec<(&'static str, &'static str, Vec<f64>)>,
        rows: usize,
    }
    impl ProfileTable for MemTable {
        fn column_names(&self) -> Vec<&str> {
            self.columns.iter().map(|(name, _, _)| *name).collect()
        }
        fn column_unit(&self, name: &str) -> Option<&str> {
            self.columns
                .iter()
                .find(|(n, _, _)| *n == name)
                .map(|(_, unit, _)| *unit)
        }
        fn column_values(&self, name: &str) -> Option<&[f64]> {
            self.columns
                .iter()
                .find(|(n, _, _)| *n == name)
                .map(|(_, _, values)| values.as_slice())
        }
        fn row_count(&self) -> usize {
            self.rows
        }
    }

    fn source() -> ProfileSource<MemTable> {
        ProfileSource::new(MemTable {
            columns: vec![
                ("R", "pix", vec![0.0, 1.0, 1.0, 2.0, 2.0, 4.0]),
                ("SUR_BRI", "counts/pixel**2", vec![10.0, 20.0, 30.0]),
                ("SUR_FLUX", "counts/pixel**2/s", vec![1.0, 2.0, 3.0]),
                ("SUR_FLUX_ERR", "counts/pixel**2/s", vec![0.1, 0.2, 0.3]),
            ],
            rows: 3,
        })
    }

    #[test]
    fn bin_edges_in_arcsec() {
        let source = source();
        assert_eq!(source.bin_lo().unwrap(), vec![0.0, 0.5, 1.0]);
        assert_eq!(source.bin_hi().unwrap(), vec![0.5, 1.0, 2.0]);
    }
    #[test]
    fn midpoints() {
        assert_eq!(source().bin_mid().unwrap(), vec![0.25, 0.75, 1.5]);
    }
    #[test]
    fn missing_error_column_is_zero_filled() {
        let profile = source().profile_for("SUR_BRI").unwrap();
        assert_eq!(profile.val, vec![10.0, 20.0, 30.0]);
        assert_eq!(profile.val_err, vec![0.0; 3]);
        assert_eq!(profile.val_unit, "counts/pixel**2");
        assert_eq!(profile.bin_unit, "arcsec");
    }
    #[test]
    fn unknown_column_fails() {
        assert!(matches!(
            source().profile_for("NET_RATE"),
            Err(SourceError::UnknownColumn(_))
        ));
    }
    #[test]
    fn surface_brightness() {
        let profile = source().surface_brightness_profile().unwrap();
        assert_eq!(profile.val, vec![40.0, 80.0, 120.0]);
        assert_eq!(profile.val_err, vec![0.0; 3]);
        assert_eq!(profile.val_unit, "counts/arcsec**2");
    }
    #[test]
    fn flux() {
        let profile = source().flux_profile().unwrap();
        assert_eq!(profile.val, vec![4.0, 8.0, 12.0]);
        for (err, expected) in profile.val_err.iter().zip([0.4, 0.8, 1.2]) {
            assert!((err - expected).abs() < 1e-12);
        }
        assert_eq!(profile.val_unit, "counts/arcsec**2/s");
    }
    #[test]
    fn column_passthrough() {
        let source = source();
        let columns = source.columns();
        assert_eq!(columns[0], ("R", "pix"));
        assert_eq!(columns[1], ("SUR_BRI", "counts/pixel**2"));
    }
    #[test]
    fn bad_bin_shape_fails() {
        let source = ProfileSource::new(MemTable {
            columns: vec![("R", "pix", vec![0.0, 1.0, 2.0])],
            rows: 3,
        });
        assert!(matches!(
            source.bin_lo(),
            Err(SourceError::BinEdges(3, 3))
        ));
    }
    #[test]
    fn unit_surgery_is_literal() {
        assert_eq!(
            per_arcsec_unit("counts/pixel**2", "pixel**2", "arcsec**2"),
            "counts/arcsec**2"
        );
        // no pixel-area suffix: label keeps its text and gains the suffix
        assert_eq!(
            per_arcsec_unit("counts", "pixel**2", "arcsec**2"),
            "countsarcsec**2"
        );
    }
    #[test]
    fn quantity_names() {
        use std::str::FromStr;
        assert_eq!(
            Quantity::from_str("SUR_BRI").unwrap(),
            Quantity::SurfaceBrightness
        );
        assert_eq!(Quantity::Flux.to_string(), "SUR_FLUX");
    }
}
