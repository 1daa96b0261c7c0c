use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, Points, Polygon, Text};

use crate::color::ColorMap;
use crate::pages::{BarMode, BarSeries, Chart, ScatterPoint};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Chart cards (central panel)
// ---------------------------------------------------------------------------

/// Draw every planned chart, one card per chart.
pub fn charts(ui: &mut Ui, charts: &[Chart]) {
    for chart in charts {
        ui.group(|ui: &mut Ui| {
            ui.label(RichText::new(chart.title()).strong().size(16.0));
            match chart {
                Chart::Line {
                    title,
                    x_label,
                    y_label,
                    categories,
                    points,
                } => line_chart(ui, title, x_label, y_label, categories, points),
                Chart::Bar {
                    title,
                    x_label,
                    y_label,
                    categories,
                    series,
                    mode,
                } => bar_chart(ui, title, x_label, y_label, categories, series, *mode),
                Chart::Pie { title, slices } => pie_chart(ui, title, slices),
                Chart::Scatter {
                    title,
                    x_label,
                    y_label,
                    categories,
                    points,
                } => scatter_chart(ui, title, x_label, y_label, categories, points),
            }
        });
        ui.add_space(12.0);
    }
}

/// X axis formatter showing category labels at integer positions.
fn category_axis(categories: &[String]) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    let labels = categories.to_vec();
    move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark.value)
}

fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn line_chart(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    points: &[[f64; 2]],
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(categories))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points.to_vec()).name(y_label).width(2.0));
        });
}

fn bar_chart(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    series: &[BarSeries],
    mode: BarMode,
) {
    let colors = ColorMap::new(series.iter().map(|s| s.name.as_str()));
    let n = series.len().max(1) as f64;
    let width = match mode {
        BarMode::Grouped => 0.8 / n,
        BarMode::Stacked => 0.6,
    };

    let mut drawn: Vec<BarChart> = Vec::with_capacity(series.len());
    for (si, s) in series.iter().enumerate() {
        let offset = match mode {
            BarMode::Grouped => (si as f64 - (n - 1.0) / 2.0) * width,
            BarMode::Stacked => 0.0,
        };
        let bars = s
            .values
            .iter()
            .enumerate()
            .filter_map(|(ci, v)| match (mode, v) {
                (BarMode::Grouped, None) => None,
                // stack_on matches bars by index, so stacked series keep every slot
                (BarMode::Stacked, None) => Some(Bar::new(ci as f64, 0.0)),
                (_, Some(v)) => Some(Bar::new(ci as f64 + offset, *v)),
            })
            .map(|b| b.width(width).name(&s.name))
            .collect();

        let mut chart = BarChart::new(bars)
            .name(&s.name)
            .color(colors.color_for(&s.name));
        if mode == BarMode::Stacked {
            let below: Vec<&BarChart> = drawn.iter().collect();
            chart = chart.stack_on(&below);
        }
        drawn.push(chart);
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(categories))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in drawn {
                plot_ui.bar_chart(chart);
            }
        });
}

fn pie_chart(ui: &mut Ui, id: &str, slices: &[(String, f64)]) {
    let total: f64 = slices.iter().map(|(_, v)| *v).sum();
    let colors = ColorMap::new(slices.iter().map(|(name, _)| name.as_str()));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if total <= 0.0 {
                return;
            }
            // Clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for (name, value) in slices {
                let share = value / total;
                let sweep = share * TAU;
                plot_ui.polygon(
                    Polygon::new(wedge(start, start - sweep))
                        .name(name)
                        .fill_color(colors.color_for(name)),
                );

                let mid = start - sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    format!("{:.1}%", share * 100.0),
                ));
                start -= sweep;
            }
        });
}

/// Unit-circle wedge between two angles, as a closed polygon through the centre.
fn wedge(from: f64, to: f64) -> Vec<[f64; 2]> {
    let steps = (((from - to).abs() / 0.05).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let a = from + (to - from) * i as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    points
}

fn scatter_chart(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    points: &[ScatterPoint],
) {
    let colors = ColorMap::new(points.iter().map(|p| p.series.as_str()));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(categories))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for p in points {
                plot_ui.points(
                    Points::new(vec![[p.x, p.y]])
                        .radius(3.0 + 17.0 * p.size as f32)
                        .color(colors.color_for(&p.series))
                        .name(&p.series),
                );
            }
        });
}
