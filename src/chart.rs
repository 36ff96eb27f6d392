//! Renderer-facing description of the buoyancy chart, plus an SVG renderer.

use plotters::prelude::*;
use thiserror::Error;

use crate::model::BuoyancyCurve;

pub const TITLE: &str = "Neutral Buoyancy Point vs. Velocity";
pub const X_LABEL: &str = "Velocity (m/s)";
pub const Y_LABEL: &str = "Depth (m)";
pub const DESCENT_LABEL: &str = "Descent Depth";
pub const ASCENT_LABEL: &str = "Ascent Depth";
pub const WARNING: &str = "The curve is theoretical analysis for your reference,\n\
please adjust the depth based on your own experience and preference.";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unable to draw chart: {0}")]
    Draw(String),
}

fn draw_error<E: std::error::Error>(err: E) -> ChartError {
    ChartError::Draw(err.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: (u8, u8, u8),
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Runs of consecutive finite points. Non-finite samples split the line.
    pub fn segments(&self) -> Vec<&[(f64, f64)]> {
        self.points
            .split(|(x, y)| !x.is_finite() || !y.is_finite())
            .filter(|run| !run.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Zero-width ranges are widened so they can still be mapped to pixels.
    pub fn widened(self) -> Self {
        let (x_min, x_max) = widen(self.x_min, self.x_max);
        let (y_min, y_max) = widen(self.y_min, self.y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

fn widen(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn from_curve(curve: &BuoyancyCurve) -> Self {
        let pair = |depths: &[f64]| -> Vec<(f64, f64)> {
            curve
                .velocities
                .iter()
                .copied()
                .zip(depths.iter().copied())
                .collect()
        };
        Self {
            title: TITLE,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            series: vec![
                Series {
                    label: DESCENT_LABEL,
                    color: (31, 119, 180),
                    points: pair(&curve.descent_depths),
                },
                Series {
                    label: ASCENT_LABEL,
                    color: (255, 127, 14),
                    points: pair(&curve.ascent_depths),
                },
            ],
        }
    }

    /// Extent of every finite point, or `None` if there is nothing to draw.
    pub fn bounds(&self) -> Option<Bounds> {
        self.series
            .iter()
            .flat_map(|series| series.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |bounds: Option<Bounds>, &(x, y)| {
                Some(match bounds {
                    None => Bounds {
                        x_min: x,
                        x_max: x,
                        y_min: y,
                        y_max: y,
                    },
                    Some(b) => Bounds {
                        x_min: b.x_min.min(x),
                        x_max: b.x_max.max(x),
                        y_min: b.y_min.min(y),
                        y_max: b.y_max.max(y),
                    },
                })
            })
    }

    pub fn to_svg(&self, width: u32, height: u32) -> Result<String, ChartError> {
        let bounds = self
            .bounds()
            .unwrap_or(Bounds {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 1.0,
            })
            .widened();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(self.title, ("sans-serif", 22).into_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
                .map_err(draw_error)?;

            chart
                .configure_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .draw()
                .map_err(draw_error)?;

            for series in &self.series {
                let (r, g, b) = series.color;
                let color = RGBColor(r, g, b);
                // Only the first run carries the legend entry.
                for (i, segment) in series.segments().into_iter().enumerate() {
                    let drawn = chart
                        .draw_series(LineSeries::new(segment.iter().copied(), &color))
                        .map_err(draw_error)?;
                    if i == 0 {
                        drawn.label(series.label).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color)
                        });
                    }
                }
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_error)?;

            root.present().map_err(draw_error)?;
        }
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{compute, BuoyancyParameters};

    fn series(points: Vec<(f64, f64)>) -> Series {
        Series {
            label: DESCENT_LABEL,
            color: (0, 0, 0),
            points,
        }
    }

    #[test]
    fn chart_carries_fixed_labels() {
        let chart = Chart::from_curve(&compute(&BuoyancyParameters::new(80.0, 3.0, 1.8, 10.0)));
        assert_eq!(chart.title, "Neutral Buoyancy Point vs. Velocity");
        assert_eq!(chart.x_label, "Velocity (m/s)");
        assert_eq!(chart.y_label, "Depth (m)");
        let labels: Vec<_> = chart.series.iter().map(|s| s.label).collect();
        assert_eq!(labels, ["Descent Depth", "Ascent Depth"]);
        assert!(chart.series.iter().all(|s| s.points.len() == 100));
    }

    #[test]
    fn non_finite_points_split_segments() {
        let s = series(vec![
            (0.0, 1.0),
            (0.1, 2.0),
            (0.2, f64::INFINITY),
            (0.3, f64::NAN),
            (0.4, 3.0),
        ]);
        let segments = s.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1], &[(0.4, 3.0)]);
    }

    #[test]
    fn bounds_skip_non_finite_points() {
        let chart = Chart {
            title: TITLE,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            series: vec![series(vec![(0.0, 5.0), (0.5, f64::NEG_INFINITY), (1.0, -2.0)])],
        };
        assert_eq!(
            chart.bounds(),
            Some(Bounds {
                x_min: 0.0,
                x_max: 1.0,
                y_min: -2.0,
                y_max: 5.0
            })
        );
    }

    #[test]
    fn all_nan_chart_has_no_bounds_but_still_renders() {
        let chart = Chart::from_curve(&compute(&BuoyancyParameters::new(80.0, 3.0, 0.0, 10.0)));
        assert_eq!(chart.bounds(), None);
        let svg = chart.to_svg(640, 480).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(TITLE));
        assert!(!svg.contains(DESCENT_LABEL), "no legend without a drawn series");
    }

    #[test]
    fn svg_contains_both_series_and_labels() {
        let chart = Chart::from_curve(&compute(&BuoyancyParameters::new(80.0, 3.0, 1.8, 10.0)));
        let svg = chart.to_svg(800, 600).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(TITLE));
        assert!(svg.contains(X_LABEL));
        assert!(svg.contains(Y_LABEL));
        assert!(svg.contains(DESCENT_LABEL));
        assert!(svg.contains(ASCENT_LABEL));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn pole_splits_the_descent_line() {
        let params = BuoyancyParameters::new(80.0, 1.0, 1.8, 10.0).drag_coefficient(0.4);
        let chart = Chart::from_curve(&compute(&params));
        assert!(chart.bounds().is_some());
        let svg = chart.to_svg(800, 600).unwrap();
        assert_eq!(svg.matches(DESCENT_LABEL).count(), 1);
    }
}
