use crate::profile::{ProfileError, RadProfile};

type Result<T> = std::result::Result<T, ProfileError>;

/// Subtract `b` from `a` bin by bin, combining the uncertainties in
/// quadrature
///
/// The two profiles must share their bin edges and units; the result
/// inherits both from `a`. Neither input is modified.
pub fn difference(a: &RadProfile, b: &RadProfile) -> Result<RadProfile> {
    if a.bin_lo != b.bin_lo || a.bin_hi != b.bin_hi {
        return Err(ProfileError::BinMismatch);
    }
    if a.bin_unit != b.bin_unit {
        return Err(ProfileError::UnitMismatch(
            a.bin_unit.clone(),
            b.bin_unit.clone(),
        ));
    }
    if a.val_unit != b.val_unit {
        return Err(ProfileError::UnitMismatch(
            a.val_unit.clone(),
            b.val_unit.clone(),
        ));
    }
    Ok(RadProfile {
        bin_lo: a.bin_lo.clone(),
        bin_hi: a.bin_hi.clone(),
        bin_unit: a.bin_unit.clone(),
        val: a.val.iter().zip(b.val.iter()).map(|(x, y)| x - y).collect(),
        val_err: a
            .val_err
            .iter()
            .zip(b.val_err.iter())
            .map(|(x, y)| x.hypot(*y))
            .collect(),
        val_unit: a.val_unit.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> RadProfile {
        RadProfile::new(
            vec![0.0, 0.5, 1.0],
            vec![0.5, 1.0, 2.0],
            "arcsec",
            vec![10.0, 20.0, 30.0],
            vec![1.0, 2.0, 3.0],
            "counts/arcsec**2",
        )
    }

    #[test]
    fn self_difference() {
        let a = profile();
        let diff = difference(&a, &a).unwrap();
        assert_eq!(diff.val, vec![0.0; 3]);
        for (err, expected) in diff.val_err.iter().zip(a.val_err.iter()) {
            assert!((err - expected * 2f64.sqrt()).abs() < 1e-12);
        }
        assert_eq!(diff.bin_lo, a.bin_lo);
        assert_eq!(diff.val_unit, a.val_unit);
    }
    #[test]
    fn subtraction() {
        let a = profile();
        let mut b = profile();
        b.val = vec![1.0, 2.0, 3.0];
        b.val_err = vec![0.0; 3];
        let diff = difference(&a, &b).unwrap();
        assert_eq!(diff.val, vec![9.0, 18.0, 27.0]);
        assert_eq!(diff.val_err, a.val_err);
    }
    #[test]
    fn mismatched_bins_fail() {
        let a = profile();
        let mut b = profile();
        b.bin_lo[1] = 0.6;
        assert!(matches!(
            difference(&a, &b),
            Err(ProfileError::BinMismatch)
        ));
    }
    #[test]
    fn mismatched_units_fail() {
        let a = profile();
        let mut b = profile();
        b.val_unit = String::from("counts/pixel**2");
        assert!(matches!(
            difference(&a, &b),
            Err(ProfileError::UnitMismatch(..))
        ));
    }
    #[test]
    fn inputs_left_untouched() {
        let a = profile();
        let b = profile();
        difference(&a, &b).unwrap();
        assert_eq!(a, profile());
        assert_eq!(b, profile());
    }
}
