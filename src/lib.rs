/*!
# Radial profile toolkit

Binned radial profiles extracted from astronomical surface-brightness images:
each bin carries a value, a 1-sigma uncertainty and physical units.

## Key components

- [`RadProfile`] - one radial profile with derived bin midpoints, in-place
  renormalization and an error-bar rendering contract
- [`ProfileSource`] - derives profiles for named quantities from a binned
  FITS table, converting per-pixel units to angular units
- [`difference`] - profile algebra under bin and unit compatibility checks

## Usage

```rust,no_run
use radprofile::{difference, ProfileSource};

# fn main() -> Result<(), radprofile::Error> {
let source = ProfileSource::from_path("obs1453_profile.fits")?;
let surbri = source.surface_brightness_profile()?;
let model = source.profile_for("MODEL")?;
let residual = difference(&surbri, &model)?;
residual.to_csv("residual.csv")?;
# Ok(())
# }
```
*/

mod algebra;
mod error;
mod fits;
mod plot;
mod profile;
mod source;

pub use algebra::difference;
pub use error::Error;
pub use fits::FitsTable;
#[cfg(feature = "plot")]
pub use plot::{PlotError, SvgSurface};
pub use plot::{ErrorBarPoint, RenderSettings, Style, Surface};
pub use profile::{ProfileError, RadProfile};
pub use source::{ProfileSource, ProfileTable, Quantity, SourceError, PIX2ARCSEC};
