//! Bar charts and valence graphs written as image files.
//!
//! SVG output carries every label. PNG output is drawn without a font
//! backend, so it holds bars, lines and axes but no text.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::metadata::seconds_to_timestamp;
use crate::query::{SummaryBlock, ValenceSeries};

/// Pixel size of a valence graph when none is given.
pub const DEFAULT_IMAGE_SIZE: (u32, u32) = (640, 640);
/// Pixel size of a three-level valence graph when none is given.
pub const SIMPLE_IMAGE_SIZE: (u32, u32) = (640, 100);

/// Pixels per inch of bar chart height.
const DPI: f64 = 128.0;
const FONT: &str = "sans-serif";

const BAR_COLOR: RGBColor = RGBColor(0x6e, 0xb9, 0xdb);
const TEXT_COLOR: RGBColor = RGBColor(0x13, 0x7f, 0xb0);
const LINE_COLOR: RGBColor = RGBColor(0x63, 0x6b, 0x6f);

/// Image format selected with `plot -f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImageFormat {
    /// Scalable Vector Graphics, labels included
    #[default]
    Svg,
    /// Portable Network Graphics, shapes only
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }

    /// Format named by the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("svg") => Ok(ImageFormat::Svg),
            Some("png") => Ok(ImageFormat::Png),
            _ => bail!(
                "Unsupported image file {}: use a .svg or .png extension",
                path.display()
            ),
        }
    }
}

/// Size and title shared by every plot.
#[derive(Debug, Clone, Default)]
pub struct PlotStyle {
    /// Width and height in pixels.
    pub size: Option<(u32, u32)>,
    pub title: Option<String>,
}

/// `path` with `_<n>` appended to the file stem.
pub fn numbered_path(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(extension) => format!("{}_{}.{}", stem, n, extension.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(name)
}

/// `HH:MM:SS, p%` where the precision of `p` grows as the share shrinks.
pub fn time_label(seconds: f64, media_duration: f64) -> String {
    let timestamp = seconds_to_timestamp(seconds);
    if !(media_duration > 0.0) {
        return timestamp;
    }
    let percent = (100.0 * seconds / media_duration).min(100.0);
    let precision = if percent > 10.0 {
        0
    } else if percent > 1.0 {
        1
    } else if percent > 0.1 {
        2
    } else {
        3
    };
    format!("{}, {:.*}%", timestamp, precision, percent)
}

/// Bar chart height for `rows` bars when no size is given.
fn bar_chart_height(rows: usize) -> u32 {
    ((rows as f64 / 2.5 + 0.5) * DPI).max(160.0).round() as u32
}

/// Horizontal bar chart of the screentimes in `block`, longest on top.
pub fn bar_summary(
    block: &SummaryBlock,
    media_duration: f64,
    path: &Path,
    format: ImageFormat,
    style: &PlotStyle,
) -> Result<()> {
    if block.entries.is_empty() {
        bail!("Nothing to plot for {}", block.detection_type);
    }
    let bars: Vec<(String, f64)> = block
        .entries
        .iter()
        .map(|entry| {
            let share = time_label(entry.screentime, media_duration);
            (format!("{} ({})", entry.name, share), entry.screentime)
        })
        .collect();
    let size = style
        .size
        .unwrap_or((DEFAULT_IMAGE_SIZE.0, bar_chart_height(bars.len())));
    let title = style.title.as_deref();

    match format {
        ImageFormat::Svg => {
            draw_bars(SVGBackend::new(path, size).into_drawing_area(), &bars, title)
        }
        ImageFormat::Png => {
            draw_bars(BitMapBackend::new(path, size).into_drawing_area(), &bars, title)
        }
    }
    .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bars = bars.len(), "wrote bar summary");
    Ok(())
}

fn draw_bars<DB>(
    root: DrawingArea<DB, Shift>,
    bars: &[(String, f64)],
    title: Option<&str>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let rows = bars.len() as f64;
    let longest = bars.iter().map(|(_, seconds)| *seconds).fold(0.0, f64::max);
    let x_end = if longest > 0.0 { longest * 1.4 } else { 1.0 };

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10).x_label_area_size(24);
    if let Some(title) = title {
        builder.caption(title, (FONT, 16));
    }
    let mut chart = builder.build_cartesian_2d(0.0..x_end, 0.0..rows)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_y_axis()
        .x_labels(6)
        .x_label_formatter(&|x| seconds_to_timestamp(*x))
        .draw()?;

    // Row 0 sits at the top of the chart.
    let top = |row: usize| rows - row as f64;
    chart.draw_series(bars.iter().enumerate().map(|(row, (_, seconds))| {
        Rectangle::new(
            [(0.0, top(row) - 0.85), (*seconds, top(row) - 0.15)],
            BAR_COLOR.filled(),
        )
    }))?;

    let label_style = TextStyle::from((FONT, 12).into_font())
        .color(&TEXT_COLOR)
        .pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(bars.iter().enumerate().map(|(row, (label, seconds))| {
        Text::new(
            label.clone(),
            (*seconds + x_end * 0.01, top(row) - 0.5),
            label_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Positive, neutral or negative as `1`, `0` or `-1`.
fn trinary(valence: f64) -> f64 {
    if valence > 0.0 {
        1.0
    } else if valence < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn valence_label(value: f64, simple: bool) -> String {
    if !simple {
        format!("{:.1}", value)
    } else if value > 0.5 {
        "positive".to_string()
    } else if value < -0.5 {
        "negative".to_string()
    } else {
        "neutral".to_string()
    }
}

/// Line graph of one valence series over the media timeline.
///
/// With `simple`, values collapse to positive, neutral and negative.
pub fn valence_graph(
    series: &ValenceSeries,
    media_duration: f64,
    path: &Path,
    format: ImageFormat,
    style: &PlotStyle,
    simple: bool,
) -> Result<()> {
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|&(second, valence)| {
            let value = if simple { trinary(valence) } else { valence };
            (second as f64, value)
        })
        .collect();
    let size = style.size.unwrap_or(if simple {
        SIMPLE_IMAGE_SIZE
    } else {
        DEFAULT_IMAGE_SIZE
    });
    let caption = match &style.title {
        Some(title) => format!("{}: {}", title, series.name),
        None => series.name.clone(),
    };
    let x_end = points
        .last()
        .map_or(0.0, |(second, _)| second + 1.0)
        .max(media_duration)
        .max(1.0);

    match format {
        ImageFormat::Svg => draw_valence(
            SVGBackend::new(path, size).into_drawing_area(),
            &points,
            x_end,
            &caption,
            simple,
        ),
        ImageFormat::Png => draw_valence(
            BitMapBackend::new(path, size).into_drawing_area(),
            &points,
            x_end,
            &caption,
            simple,
        ),
    }
    .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), points = points.len(), "wrote valence graph");
    Ok(())
}

fn draw_valence<DB>(
    root: DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    x_end: f64,
    caption: &str,
    simple: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(8)
        .caption(caption, (FONT, 14))
        .x_label_area_size(20)
        .y_label_area_size(if simple { 60 } else { 40 })
        .build_cartesian_2d(0.0..x_end, -1.1..1.1)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(6)
        .x_label_formatter(&|x| seconds_to_timestamp(*x))
        .y_labels(if simple { 3 } else { 5 })
        .y_label_formatter(&|y| valence_label(*y, simple))
        .draw()?;

    chart.draw_series(LineSeries::new(
        [(0.0, 0.0), (x_end, 0.0)],
        LINE_COLOR.mix(0.4).stroke_width(1),
    ))?;
    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        BAR_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 2, BAR_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}
