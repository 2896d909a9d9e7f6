//! The three charts of the application counts: cumulative trend lines,
//! bars of the totals, and a pie of the proportions.
//!
//! Every chart is drawn on a generic plotters backend, the public functions
//! only pick SVG or PNG from the requested format.

use crate::error::{AppCountError, Result};
use crate::palette::{paired, viridis};
use crate::{CumulativeSeries, Totals};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// line and bar charts, 12 x 6 inches at about 133 dpi
pub const WIDE_SIZE: (u32, u32) = (1600, 800);
/// pie chart, 8 x 8 inches
pub const SQUARE_SIZE: (u32, u32) = (1000, 1000);

/// first wedge starts here, counter-clockwise from the positive x axis
pub const PIE_START_ANGLE: f64 = 140.;
/// distance of the percentage labels from the centre, as a fraction of the radius
pub const PIE_PCT_DISTANCE: f64 = 0.85;
/// distance of the type names from the centre, as a fraction of the radius
pub const PIE_LABEL_DISTANCE: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartFormat {
    Svg,
    Png,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

impl FromStr for ChartFormat {
    type Err = AppCountError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ChartFormat::Svg),
            "png" => Ok(ChartFormat::Png),
            other => Err(AppCountError::InvalidFormat(other.to_string())),
        }
    }
}

/// Title and axis descriptions of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabels {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
}

impl ChartLabels {
    pub fn new(title: &str, x_desc: &str, y_desc: &str) -> Self {
        ChartLabels {
            title: title.to_string(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
        }
    }

    pub fn trend() -> Self {
        Self::new(
            "Trend of Application Types Over Time",
            "Time Point",
            "Number of Applications",
        )
    }

    pub fn totals() -> Self {
        Self::new(
            "Total Number of Applications for Each Type",
            "Application Type",
            "Total Applications",
        )
    }

    pub fn proportions() -> Self {
        Self::new("Proportion of Each Application Type", "", "")
    }

    /// appends the export month to the title, e.g. "(November 2023)"
    pub fn with_period(mut self, period: Option<NaiveDate>) -> Self {
        if let Some(p) = period {
            self.title = format!("{} ({})", self.title, p.format("%B %Y"));
        }
        self
    }
}

macro_rules! render {
    ($fout:expr, $size:expr, $format:expr, $draw:ident ( $($arg:expr),* )) => {
        match $format {
            ChartFormat::Svg => {
                let root = SVGBackend::new($fout, $size).into_drawing_area();
                $draw(&root, $($arg),*)?;
                root.present()?;
            }
            ChartFormat::Png => {
                let root = BitMapBackend::new($fout, $size).into_drawing_area();
                $draw(&root, $($arg),*)?;
                root.present()?;
            }
        }
    };
}

/// plots one line per application type with its running sum over the time points
pub fn plot_cumulative(
    series: &CumulativeSeries,
    labels: &ChartLabels,
    fout: &Path,
    format: ChartFormat,
) -> Result<()> {
    if series.categories.is_empty() || series.time_points() == 0 {
        return Err(AppCountError::EmptyChart(String::from(
            "no time points for the trend chart",
        )));
    }
    render!(fout, WIDE_SIZE, format, draw_cumulative(series, labels));
    info!("plotted {:?} to {}", labels.title, fout.display());
    Ok(())
}

/// plots one bar per application type with its total
pub fn plot_totals(
    totals: &Totals,
    labels: &ChartLabels,
    fout: &Path,
    format: ChartFormat,
) -> Result<()> {
    if totals.categories.is_empty() {
        return Err(AppCountError::EmptyChart(String::from(
            "no application types for the bar chart",
        )));
    }
    render!(fout, WIDE_SIZE, format, draw_totals(totals, labels));
    info!("plotted {:?} to {}", labels.title, fout.display());
    Ok(())
}

/// plots the share of each application type as a pie
pub fn plot_proportions(
    totals: &Totals,
    labels: &ChartLabels,
    fout: &Path,
    format: ChartFormat,
) -> Result<()> {
    if totals.grand_total() == 0 {
        return Err(AppCountError::EmptyChart(String::from(
            "all totals are zero, no proportions to draw",
        )));
    }
    render!(fout, SQUARE_SIZE, format, draw_proportions(totals, labels));
    info!("plotted {:?} to {}", labels.title, fout.display());
    Ok(())
}

fn draw_cumulative<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &CumulativeSeries,
    labels: &ChartLabels,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let n = series.time_points();
    let ymax = (series.max_value() as f64 * 1.05).max(1.);
    let mut chart = ChartBuilder::on(root)
        .caption(&labels.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(0.5f64..(n as f64 + 0.5), 0f64..ymax)?;
    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
        .label_style(("sans-serif", 20))
        .x_desc(labels.x_desc.as_str())
        .y_desc(labels.y_desc.as_str())
        .x_labels(n.min(20))
        .x_label_formatter(&|x: &f64| {
            if (x - x.round()).abs() < 1e-6 {
                format!("{}", x.round() as i64)
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .draw()?;

    let colors = viridis(series.categories.len());
    for ((name, values), color) in series
        .categories
        .iter()
        .zip(series.values.iter())
        .zip(colors.into_iter())
    {
        chart
            .draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| ((i + 1) as f64, *v as f64)),
                color.stroke_width(2),
            ))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 18))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    Ok(())
}

fn draw_totals<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    totals: &Totals,
    labels: &ChartLabels,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let n = totals.categories.len();
    let ymax = (totals.values.iter().copied().max().unwrap_or(0) as f64 * 1.1).max(1.);
    let mut chart = ChartBuilder::on(root)
        .caption(&labels.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(220)
        .y_label_area_size(100)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..ymax)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
        .label_style(("sans-serif", 20))
        .x_label_style(
            ("sans-serif", 16)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(labels.x_desc.as_str())
        .y_desc(labels.y_desc.as_str())
        .x_labels(n + 1)
        .x_label_formatter(&|x: &SegmentValue<usize>| match x {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => totals
                .categories
                .get(*i)
                .map(|name| truncate_name(name, 30))
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .draw()?;

    let colors = paired(n);
    chart.draw_series(totals.values.iter().enumerate().map(|(i, &v)| {
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0f64),
                (SegmentValue::Exact(i + 1), v as f64),
            ],
            colors[i].filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;
    chart.draw_series(totals.values.iter().enumerate().map(|(i, &v)| {
        Text::new(
            v.to_string(),
            (SegmentValue::CenterOf(i), v as f64),
            ("sans-serif", 16)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom)),
        )
    }))?;
    Ok(())
}

fn draw_proportions<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    totals: &Totals,
    labels: &ChartLabels,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let area = root.titled(&labels.title, ("sans-serif", 32))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = w.min(h) as f64 * 0.35;
    let colors = paired(totals.categories.len());

    for (wedge, (name, color)) in pie_wedges(&totals.values, PIE_START_ANGLE)
        .into_iter()
        .zip(totals.categories.iter().zip(colors.iter()))
    {
        if wedge.percent == 0. {
            continue;
        }
        let outline = wedge_outline(center, radius, wedge.start, wedge.end);
        area.draw(&Polygon::new(outline.clone(), color.filled()))?;
        area.draw(&PathElement::new(outline, WHITE.stroke_width(2)))?;

        let mid = wedge.mid();
        area.draw(&Text::new(
            format!("{:.1}%", wedge.percent),
            polar(center, radius * PIE_PCT_DISTANCE, mid),
            ("sans-serif", 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
        let hpos = if mid.to_radians().cos() >= 0. {
            HPos::Left
        } else {
            HPos::Right
        };
        area.draw(&Text::new(
            name.clone(),
            polar(center, radius * PIE_LABEL_DISTANCE, mid),
            ("sans-serif", 20)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(hpos, VPos::Center)),
        ))?;
    }
    Ok(())
}

/// Angular extent of one pie wedge, in degrees counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub end: f64,
    pub percent: f64,
}

impl Wedge {
    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.
    }
}

/// splits the full circle proportionally to the values, starting at start_angle;
/// all wedges are empty when the values sum to zero
pub fn pie_wedges(values: &[u64], start_angle: f64) -> Vec<Wedge> {
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    let mut angle = start_angle;
    values
        .iter()
        .map(|&v| {
            let fraction = if sum == 0. { 0. } else { v as f64 / sum };
            let end = angle + fraction * 360.;
            let wedge = Wedge {
                start: angle,
                end,
                percent: fraction * 100.,
            };
            angle = end;
            wedge
        })
        .collect()
}

/// pixel position at angle degrees on the circle of radius r, y grows downwards
fn polar(center: (i32, i32), r: f64, angle: f64) -> (i32, i32) {
    let a = angle.to_radians();
    (
        center.0 + (r * a.cos()).round() as i32,
        center.1 - (r * a.sin()).round() as i32,
    )
}

/// closed outline of a wedge: centre, arc in steps of at most one degree, centre
fn wedge_outline(center: (i32, i32), r: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = ((end - start).abs().ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 3);
    points.push(center);
    for s in 0..=steps {
        let angle = start + (end - start) * s as f64 / steps as f64;
        points.push(polar(center, r, angle));
    }
    points.push(center);
    points
}

fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let mut s: String = name.chars().take(max_chars.saturating_sub(3)).collect();
        s.push_str("...");
        s
    }
}
