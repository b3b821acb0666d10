use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("Cannot rescale a profile by a zero divisor")]
    ZeroDivisor,
    #[error("The two profiles are binned differently")]
    BinMismatch,
    #[error("The two profiles have different units: {0} vs. {1}")]
    UnitMismatch(String, String),
    #[error("Failed to write the CSV file")]
    Csv(#[from] csv::Error),
}
type Result<T> = std::result::Result<T, ProfileError>;

/// A binned radial profile: one value and its 1-sigma uncertainty per
/// radius interval `[bin_lo,bin_hi)`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RadProfile {
    pub bin_lo: Vec<f64>,
    pub bin_hi: Vec<f64>,
    pub bin_unit: String,
    pub val: Vec<f64>,
    pub val_err: Vec<f64>,
    pub val_unit: String,
}
impl RadProfile {
    /// Assemble a profile from its parts, stored verbatim
    pub fn new(
        bin_lo: Vec<f64>,
        bin_hi: Vec<f64>,
        bin_unit: impl Into<String>,
        val: Vec<f64>,
        val_err: Vec<f64>,
        val_unit: impl Into<String>,
    ) -> Self {
        Self {
            bin_lo,
            bin_hi,
            bin_unit: bin_unit.into(),
            val,
            val_err,
            val_unit: val_unit.into(),
        }
    }
    pub fn len(&self) -> usize {
        self.val.len()
    }
    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }
    /// Bin midpoints, recomputed on each call
    pub fn bin_mid(&self) -> Vec<f64> {
        self.bin_lo
            .iter()
            .zip(self.bin_hi.iter())
            .map(|(lo, hi)| 0.5 * (lo + hi))
            .collect()
    }
    /// Divide the values by `divisor` in place, propagating the divisor
    /// uncertainty into `val_err` in quadrature with the relative value
    /// uncertainty; with `divisor_err == 0` the uncertainty is simply
    /// `val_err / divisor`
    ///
    /// The unit string is overwritten when `new_unit` is given.
    pub fn rescale(
        &mut self,
        divisor: f64,
        divisor_err: f64,
        new_unit: Option<&str>,
    ) -> Result<()> {
        if divisor == 0.0 {
            return Err(ProfileError::ZeroDivisor);
        }
        for (val, err) in self.val.iter_mut().zip(self.val_err.iter_mut()) {
            let new_val = *val / divisor;
            *err = if divisor_err == 0.0 {
                *err / divisor
            } else {
                let rel_err2 = (*err / *val).powi(2) + (divisor_err / divisor).powi(2);
                new_val * rel_err2.sqrt()
            };
            *val = new_val;
        }
        if let Some(unit) = new_unit {
            self.val_unit = unit.to_string();
        }
        Ok(())
    }
    /// Write the profile to a CSV file, units in the headers
    pub fn to_csv<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(filename)?;
        wtr.write_record(&[
            format!("Radius lower [{}]", self.bin_unit),
            format!("Radius upper [{}]", self.bin_unit),
            format!("Radius [{}]", self.bin_unit),
            format!("Value [{}]", self.val_unit),
            format!("Error [{}]", self.val_unit),
        ])?;
        for (mid, ((lo, hi), (val, err))) in self.bin_mid().into_iter().zip(
            self.bin_lo
                .iter()
                .zip(self.bin_hi.iter())
                .zip(self.val.iter().zip(self.val_err.iter())),
        ) {
            wtr.write_record(&[
                format!("{}", lo),
                format!("{}", hi),
                format!("{}", mid),
                format!("{}", val),
                format!("{}", err),
            ])?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
