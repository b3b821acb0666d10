use itertools::izip;

use crate::profile::RadProfile;

/// One plotted bin: marker position with its horizontal extent and, when the
/// profile carries uncertainties, its vertical extent
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBarPoint {
    pub x: f64,
    pub y: f64,
    pub xerr: f64,
    pub yerr: Option<f64>,
}

/// Marker color and size, forwarded untouched to the drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub color: (u8, u8, u8),
    pub point_size: u32,
}
impl Default for Style {
    fn default() -> Self {
        Self {
            color: (0, 0, 0),
            point_size: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub log_scale: bool,
    pub style: Style,
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            log_scale: true,
            style: Style::default(),
        }
    }
}

/// A drawing surface that profiles render onto
///
/// The caller owns the surface; the profile only issues drawing calls.
pub trait Surface {
    /// Label the horizontal and vertical axes
    fn set_labels(&mut self, xlabel: &str, ylabel: &str);
    /// Switch both axes to logarithmic scaling, clipping non-positive values
    fn set_log_scale(&mut self);
    /// Draw one error-bar series
    fn error_bars(&mut self, points: &[ErrorBarPoint], style: &Style);
}

impl RadProfile {
    /// Draw the profile as one error-bar series on `surface`
    ///
    /// Horizontal bars span each bin; vertical bars are dropped altogether
    /// when no bin carries an uncertainty.
    pub fn render<S: Surface>(&self, surface: &mut S, settings: &RenderSettings) {
        let with_yerr = self.val_err.iter().any(|&err| err != 0.0);
        let points: Vec<ErrorBarPoint> =
            izip!(&self.bin_lo, &self.bin_hi, &self.val, &self.val_err)
                .map(|(&lo, &hi, &val, &err)| ErrorBarPoint {
                    x: 0.5 * (lo + hi),
                    y: val,
                    xerr: 0.5 * (hi - lo),
                    yerr: with_yerr.then_some(err),
                })
                .collect();
        surface.set_labels(&format!("Radius {}", self.bin_unit), &self.val_unit);
        if settings.log_scale {
            surface.set_log_scale();
        }
        surface.error_bars(&points, &settings.style);
    }
}

#[cfg(feature = "plot")]
mod svg {
    use std::path::{Path, PathBuf};

    use plotters::prelude::*;

    use super::{ErrorBarPoint, Style, Surface};

    #[derive(thiserror::Error, Debug)]
    pub enum PlotError {
        #[error("Failed to draw the profile chart: {0}")]
        Backend(String),
    }

    /// SVG drawing surface, buffering every call until [`SvgSurface::save`]
    pub struct SvgSurface {
        path: PathBuf,
        size: (u32, u32),
        xlabel: String,
        ylabel: String,
        log_scale: bool,
        series: Vec<(Vec<ErrorBarPoint>, Style)>,
    }
    impl SvgSurface {
        pub fn new<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                size,
                xlabel: String::new(),
                ylabel: String::new(),
                log_scale: false,
                series: vec![],
            }
        }
        /// Draw the buffered series to the SVG file
        pub fn save(&self) -> Result<(), PlotError> {
            let kept: Vec<&ErrorBarPoint> = self
                .series
                .iter()
                .flat_map(|(points, _)| points.iter())
                .filter(|p| !self.log_scale || (p.x > 0.0 && p.y > 0.0))
                .collect();
            if kept.is_empty() {
                return Ok(());
            }

            let max_value = |x: &[f64]| x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let min_value = |x: &[f64]| x.iter().cloned().fold(f64::INFINITY, f64::min);
            // on log axes a bar reaching zero or below is clipped at the
            // lowest marker rather than dropped
            let positive = |v: f64, fallback: f64| if v > 0.0 { v } else { fallback };
            let x_bounds: Vec<f64> = kept
                .iter()
                .map(|p| {
                    if self.log_scale {
                        positive(p.x - p.xerr, 0.5 * p.x)
                    } else {
                        p.x - p.xerr
                    }
                })
                .collect();
            let y_bounds: Vec<f64> = kept
                .iter()
                .map(|p| {
                    let err = p.yerr.unwrap_or(0.0);
                    if self.log_scale {
                        positive(p.y - err, 0.5 * p.y)
                    } else {
                        p.y - err
                    }
                })
                .collect();
            let x_lo = min_value(&x_bounds);
            let x_hi = max_value(&kept.iter().map(|p| p.x + p.xerr).collect::<Vec<f64>>());
            let y_lo = min_value(&y_bounds);
            let y_hi = max_value(
                &kept
                    .iter()
                    .map(|p| p.y + p.yerr.unwrap_or(0.0))
                    .collect::<Vec<f64>>(),
            );

            let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| PlotError::Backend(e.to_string()))?;
            if self.log_scale {
                let mut chart = ChartBuilder::on(&root)
                    .set_label_area_size(LabelAreaPosition::Left, 60)
                    .set_label_area_size(LabelAreaPosition::Bottom, 40)
                    .margin(10)
                    .build_cartesian_2d(
                        (x_lo * 0.9..x_hi * 1.1).log_scale(),
                        (y_lo * 0.9..y_hi * 1.1).log_scale(),
                    )
                    .map_err(|e| PlotError::Backend(e.to_string()))?;
                chart
                    .configure_mesh()
                    .x_desc(self.xlabel.as_str())
                    .y_desc(self.ylabel.as_str())
                    .draw()
                    .map_err(|e| PlotError::Backend(e.to_string()))?;
                for (points, style) in &self.series {
                    let rgb = RGBColor(style.color.0, style.color.1, style.color.2);
                    chart
                        .draw_series(
                            points
                                .iter()
                                .filter(|p| p.x > 0.0 && p.y > 0.0)
                                .map(|p| {
                                    ErrorBar::new_horizontal(
                                        p.y,
                                        (p.x - p.xerr).max(x_lo),
                                        p.x,
                                        p.x + p.xerr,
                                        rgb.filled(),
                                        style.point_size,
                                    )
                                }),
                        )
                        .map_err(|e| PlotError::Backend(e.to_string()))?;
                    chart
                        .draw_series(
                            points
                                .iter()
                                .filter(|p| p.x > 0.0 && p.y > 0.0)
                                .filter_map(|p| {
                                    p.yerr.map(|yerr| {
                                        ErrorBar::new_vertical(
                                            p.x,
                                            (p.y - yerr).max(y_lo),
                                            p.y,
                                            p.y + yerr,
                                            rgb.filled(),
                                            style.point_size,
                                        )
                                    })
                                }),
                        )
                        .map_err(|e| PlotError::Backend(e.to_string()))?;
                }
            } else {
                let dx = (x_hi - x_lo) * 1e-2;
                let dy = (y_hi - y_lo) * 1e-2;
                let mut chart = ChartBuilder::on(&root)
                    .set_label_area_size(LabelAreaPosition::Left, 60)
                    .set_label_area_size(LabelAreaPosition::Bottom, 40)
                    .margin(10)
                    .build_cartesian_2d(x_lo - dx..x_hi + dx, y_lo - dy..y_hi + dy)
                    .map_err(|e| PlotError::Backend(e.to_string()))?;
                chart
                    .configure_mesh()
                    .x_desc(self.xlabel.as_str())
                    .y_desc(self.ylabel.as_str())
                    .draw()
                    .map_err(|e| PlotError::Backend(e.to_string()))?;
                for (points, style) in &self.series {
                    let rgb = RGBColor(style.color.0, style.color.1, style.color.2);
                    chart
                        .draw_series(points.iter().map(|p| {
                            ErrorBar::new_horizontal(
                                p.y,
                                p.x - p.xerr,
                                p.x,
                                p.x + p.xerr,
                                rgb.filled(),
                                style.point_size,
                            )
                        }))
                        .map_err(|e| PlotError::Backend(e.to_string()))?;
                    chart
                        .draw_series(points.iter().filter_map(|p| {
                            p.yerr.map(|yerr| {
                                ErrorBar::new_vertical(
                                    p.x,
                                    p.y - yerr,
                                    p.y,
                                    p.y + yerr,
                                    rgb.filled(),
                                    style.point_size,
                                )
                            })
                        }))
                        .map_err(|e| PlotError::Backend(e.to_string()))?;
                }
            }
            root.present()
                .map_err(|e| PlotError::Backend(e.to_string()))?;
            Ok(())
        }
    }
    impl Surface for SvgSurface {
        fn set_labels(&mut self, xlabel: &str, ylabel: &str) {
            self.xlabel = xlabel.to_string();
            self.ylabel = ylabel.to_string();
        }
        fn set_log_scale(&mut self) {
            self.log_scale = true;
        }
        fn error_bars(&mut self, points: &[ErrorBarPoint], style: &Style) {
            self.series.push((points.to_vec(), style.clone()));
        }
    }
}
#[cfg(feature = "plot")]
pub use svg::{PlotError, SvgSurface};
