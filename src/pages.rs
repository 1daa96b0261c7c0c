use std::collections::BTreeMap;

use crate::data::model::{CellValue, DatasetBundle, Table};

// ---------------------------------------------------------------------------
// Pages offered in the sidebar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    PrintSales,
    AdRevenue,
    CityReadiness,
    DigitalPilot,
    Recommendations,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::PrintSales,
        Page::AdRevenue,
        Page::CityReadiness,
        Page::DigitalPilot,
        Page::Recommendations,
    ];

    /// Label of the sidebar radio button.
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::PrintSales => "Print Sales Analysis",
            Page::AdRevenue => "Ad Revenue Analysis",
            Page::CityReadiness => "City Readiness",
            Page::DigitalPilot => "Digital Pilot Study",
            Page::Recommendations => "Recommendations",
        }
    }

    /// Heading shown at the top of the page.
    pub fn heading(self) -> &'static str {
        match self {
            Page::Home => "📰 Newspaper Survival Analysis - Bharat Herald",
            Page::PrintSales => "📖 Print Newspaper Circulation",
            Page::AdRevenue => "📢 Advertisement Revenue",
            Page::CityReadiness => "🏙 City Readiness for Digital Adoption",
            Page::DigitalPilot => "🚀 Digital Pilot Study Outcomes",
            Page::Recommendations => "📌 Strategic Recommendations",
        }
    }

    /// The table a data page is built from.
    pub fn table(self, bundle: &DatasetBundle) -> Option<&Table> {
        match self {
            Page::PrintSales => Some(&bundle.print_sales),
            Page::AdRevenue => Some(&bundle.ad_revenue),
            Page::CityReadiness => Some(&bundle.city_readiness),
            Page::DigitalPilot => Some(&bundle.digital_pilot),
            Page::Home | Page::Recommendations => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMode {
    /// Series side by side within a category.
    Grouped,
    /// Series stacked on top of each other.
    Stacked,
}

/// One coloured series of a bar chart; `values[i]` belongs to `categories[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub series: String,
    pub x: f64,
    pub y: f64,
    /// Marker size as a fraction of the largest one, in `0.0..=1.0`.
    pub size: f64,
}

/// A chart ready to be drawn. Categorical axes use the category index as x.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line {
        title: String,
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        points: Vec<[f64; 2]>,
    },
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        series: Vec<BarSeries>,
        mode: BarMode,
    },
    Pie {
        title: String,
        slices: Vec<(String, f64)>,
    },
    Scatter {
        title: String,
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        points: Vec<ScatterPoint>,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line { title, .. }
            | Chart::Bar { title, .. }
            | Chart::Pie { title, .. }
            | Chart::Scatter { title, .. } => title,
        }
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Charts to draw for `page`. A chart whose columns are missing is skipped.
pub fn plan_charts(page: Page, bundle: &DatasetBundle) -> Vec<Chart> {
    match page {
        Page::PrintSales => print_sales_charts(&bundle.print_sales),
        Page::AdRevenue => ad_revenue_charts(&bundle.ad_revenue),
        Page::CityReadiness => city_readiness_charts(&bundle.city_readiness),
        Page::DigitalPilot => digital_pilot_charts(&bundle.digital_pilot),
        Page::Home | Page::Recommendations => Vec::new(),
    }
}

pub fn print_sales_charts(table: &Table) -> Vec<Chart> {
    let mut charts = Vec::new();

    if table.has_columns(&["month", "net_circulation"]) {
        let mut months = Categories::default();
        let points = rows(table, &["month", "net_circulation"])
            .filter_map(|r| {
                let y = r[1].as_f64()?;
                Some([months.index(r[0])? as f64, y])
            })
            .collect();
        charts.push(Chart::Line {
            title: "Net Circulation Over Months".into(),
            x_label: "month".into(),
            y_label: "net_circulation".into(),
            categories: months.labels,
            points,
        });
    }

    if table.has_columns(&["month", "copies_sold", "copies_returned"]) {
        let melted = melt(table, "month", &["copies_sold", "copies_returned"]);
        let (categories, series) = pivot_sum(
            melted
                .iter()
                .map(|(month, kind, count)| (month.as_str(), kind.as_str(), *count)),
        );
        charts.push(Chart::Bar {
            title: "Copies Sold vs Copies Returned".into(),
            x_label: "month".into(),
            y_label: "count".into(),
            categories,
            series,
            mode: BarMode::Grouped,
        });
    }

    charts
}

pub fn ad_revenue_charts(table: &Table) -> Vec<Chart> {
    if !table.has_columns(&["category", "revenue", "city"]) {
        return Vec::new();
    }

    let records: Vec<(String, String, f64)> = rows(table, &["category", "revenue", "city"])
        .filter_map(|r| {
            if r[0].is_null() {
                return None;
            }
            Some((r[0].label(), r[2].label(), r[1].as_f64()?))
        })
        .collect();

    let (categories, series) = pivot_sum(
        records
            .iter()
            .map(|(cat, city, rev)| (cat.as_str(), city.as_str(), *rev)),
    );

    let mut shares: Vec<(String, f64)> = Vec::new();
    for (cat, _, rev) in &records {
        match shares.iter_mut().find(|(c, _)| c == cat) {
            Some((_, total)) => *total += rev,
            None => shares.push((cat.clone(), *rev)),
        }
    }
    shares.retain(|(_, total)| *total > 0.0);

    vec![
        Chart::Bar {
            title: "Ad Revenue by Category and City".into(),
            x_label: "category".into(),
            y_label: "revenue".into(),
            categories,
            series,
            mode: BarMode::Stacked,
        },
        Chart::Pie {
            title: "Revenue Share by Category".into(),
            slices: shares,
        },
    ]
}

pub fn city_readiness_charts(table: &Table) -> Vec<Chart> {
    if !table.has_columns(&["city", "readinessscore"]) {
        return Vec::new();
    }

    // One series per city so each bar gets its own colour.
    let scores: Vec<(String, f64)> = rows(table, &["city", "readinessscore"])
        .filter(|r| !r[0].is_null())
        .filter_map(|r| Some((r[0].label(), r[1].as_f64()?)))
        .collect();
    let (categories, series) = pivot_sum(
        scores
            .iter()
            .map(|(city, score)| (city.as_str(), city.as_str(), *score)),
    );

    vec![Chart::Bar {
        title: "City Readiness Index".into(),
        x_label: "city".into(),
        y_label: "readinessscore".into(),
        categories,
        series,
        mode: BarMode::Stacked,
    }]
}

pub fn digital_pilot_charts(table: &Table) -> Vec<Chart> {
    if !table.has_columns(&["city", "engagement", "users"]) {
        return Vec::new();
    }

    let mut cities = Categories::default();
    let raw: Vec<(String, f64, f64, f64)> = rows(table, &["city", "engagement", "users"])
        .filter_map(|r| {
            let y = r[1].as_f64()?;
            let users = r[2].as_f64()?;
            let x = cities.index(r[0])? as f64;
            Some((r[0].label(), x, y, users))
        })
        .collect();

    let max_users = raw
        .iter()
        .map(|(_, _, _, u)| *u)
        .fold(0.0_f64, f64::max);
    let points = raw
        .into_iter()
        .map(|(series, x, y, users)| ScatterPoint {
            series,
            x,
            y,
            size: if max_users > 0.0 {
                (users.max(0.0) / max_users).sqrt()
            } else {
                0.0
            },
        })
        .collect();

    vec![Chart::Scatter {
        title: "Digital Pilot Study Results".into(),
        x_label: "city".into(),
        y_label: "engagement".into(),
        categories: cities.labels,
        points,
    }]
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Category labels in first-seen order.
#[derive(Default)]
struct Categories {
    labels: Vec<String>,
}

impl Categories {
    /// Position of the cell's label, inserting it if new. Nulls have none.
    fn index(&mut self, cell: &CellValue) -> Option<usize> {
        if cell.is_null() {
            return None;
        }
        let label = cell.label();
        Some(match self.labels.iter().position(|l| *l == label) {
            Some(i) => i,
            None => {
                self.labels.push(label);
                self.labels.len() - 1
            }
        })
    }
}

/// Iterate rows projected onto `names`. Callers check the columns exist.
fn rows<'a>(table: &'a Table, names: &[&str]) -> impl Iterator<Item = Vec<&'a CellValue>> + 'a {
    let cols: Vec<_> = names.iter().filter_map(|n| table.column(n)).collect();
    (0..table.len()).map(move |row| cols.iter().map(|c| &c.cells[row]).collect())
}

/// Long format of `value_vars`: one `(id, variable, value)` per row and
/// variable, skipping non-numeric values and null ids.
pub fn melt(table: &Table, id: &str, value_vars: &[&str]) -> Vec<(String, String, f64)> {
    let Some(id_col) = table.column(id) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for var in value_vars {
        let Some(col) = table.column(var) else {
            continue;
        };
        for (id_cell, cell) in id_col.cells.iter().zip(&col.cells) {
            if let (false, Some(v)) = (id_cell.is_null(), cell.as_f64()) {
                out.push((id_cell.label(), var.to_string(), v));
            }
        }
    }
    out
}

/// Sum `(category, series, value)` triples into a category × series grid.
/// Both axes keep first-seen order.
fn pivot_sum<'a>(records: impl Iterator<Item = (&'a str, &'a str, f64)>) -> (Vec<String>, Vec<BarSeries>) {
    let mut categories: Vec<String> = Vec::new();
    let mut series_names: Vec<String> = Vec::new();
    let mut sums: BTreeMap<(usize, usize), f64> = BTreeMap::new();

    for (cat, ser, value) in records {
        let ci = position_or_push(&mut categories, cat);
        let si = position_or_push(&mut series_names, ser);
        *sums.entry((si, ci)).or_insert(0.0) += value;
    }

    let series = series_names
        .into_iter()
        .enumerate()
        .map(|(si, name)| BarSeries {
            name,
            values: (0..categories.len())
                .map(|ci| sums.get(&(si, ci)).copied())
                .collect(),
        })
        .collect();

    (categories, series)
}

fn position_or_push(list: &mut Vec<String>, item: &str) -> usize {
    match list.iter().position(|l| l == item) {
        Some(i) => i,
        None => {
            list.push(item.to_string());
            list.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[CellValue]]) -> Table {
        Table::from_rows(
            "t",
            "t.csv",
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter().map(|r| r.to_vec()).collect(),
        )
    }

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn n(v: i64) -> CellValue {
        CellValue::Integer(v)
    }

    #[test]
    fn print_sales_without_month_plans_nothing() {
        let print = table(
            &["net_circulation", "copies_sold", "copies_returned"],
            &[&[n(100), n(120), n(20)]],
        );
        assert!(print_sales_charts(&print).is_empty());
    }

    #[test]
    fn print_sales_plans_line_and_grouped_bar() {
        let print = table(
            &["month", "net_circulation", "copies_sold", "copies_returned"],
            &[
                &[t("Jan"), n(100), n(120), n(20)],
                &[t("Feb"), n(90), n(110), n(20)],
            ],
        );
        let charts = print_sales_charts(&print);
        assert_eq!(charts.len(), 2);

        match &charts[0] {
            Chart::Line { categories, points, .. } => {
                assert_eq!(categories, &vec!["Jan".to_string(), "Feb".to_string()]);
                assert_eq!(points, &vec![[0.0, 100.0], [1.0, 90.0]]);
            }
            other => panic!("expected line, got {other:?}"),
        }
        match &charts[1] {
            Chart::Bar { series, mode, .. } => {
                assert_eq!(*mode, BarMode::Grouped);
                assert_eq!(series[0].name, "copies_sold");
                assert_eq!(series[1].values, vec![Some(20.0), Some(20.0)]);
            }
            other => panic!("expected bar, got {other:?}"),
        }
    }

    #[test]
    fn only_the_line_chart_when_copies_are_missing() {
        let print = table(&["month", "net_circulation"], &[&[t("Jan"), n(1)]]);
        let charts = print_sales_charts(&print);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title(), "Net Circulation Over Months");
    }

    #[test]
    fn text_values_are_skipped() {
        let print = table(
            &["month", "net_circulation"],
            &[&[t("Jan"), t("N/A")], &[t("Feb"), t("10")]],
        );
        match &print_sales_charts(&print)[0] {
            Chart::Line { points, .. } => assert!(points.is_empty()),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn ad_revenue_sums_by_category_and_city() {
        let ad = table(
            &["category", "revenue", "city"],
            &[
                &[t("Retail"), n(10), t("Pune")],
                &[t("Retail"), n(5), t("Pune")],
                &[t("Auto"), n(7), t("Agra")],
            ],
        );
        let charts = ad_revenue_charts(&ad);
        assert_eq!(charts.len(), 2);

        match &charts[0] {
            Chart::Bar { categories, series, .. } => {
                assert_eq!(categories, &vec!["Retail".to_string(), "Auto".to_string()]);
                assert_eq!(series[0].name, "Pune");
                assert_eq!(series[0].values, vec![Some(15.0), None]);
                assert_eq!(series[1].values, vec![None, Some(7.0)]);
            }
            other => panic!("expected bar, got {other:?}"),
        }
        assert_eq!(
            charts[1],
            Chart::Pie {
                title: "Revenue Share by Category".into(),
                slices: vec![("Retail".into(), 15.0), ("Auto".into(), 7.0)],
            }
        );
    }

    #[test]
    fn scatter_sizes_are_relative() {
        let pilot = table(
            &["city", "engagement", "users"],
            &[
                &[t("Pune"), CellValue::Float(0.5), n(400)],
                &[t("Agra"), CellValue::Float(0.2), n(100)],
            ],
        );
        match &digital_pilot_charts(&pilot)[0] {
            Chart::Scatter { points, categories, .. } => {
                assert_eq!(categories.len(), 2);
                assert_eq!(points[0].size, 1.0);
                assert_eq!(points[1].size, 0.5);
                assert_eq!(points[1].x, 1.0);
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn city_readiness_needs_exact_column() {
        let city = table(&["city", "readiness_score"], &[&[t("Pune"), n(7)]]);
        assert!(city_readiness_charts(&city).is_empty());

        let city = table(&["city", "readinessscore"], &[&[t("Pune"), n(7)]]);
        assert_eq!(city_readiness_charts(&city).len(), 1);
    }

    #[test]
    fn melt_is_long_format() {
        let print = table(
            &["month", "copies_sold", "copies_returned"],
            &[&[t("Jan"), n(5), n(1)], &[CellValue::Null, n(3), n(2)]],
        );
        assert_eq!(
            melt(&print, "month", &["copies_sold", "copies_returned"]),
            vec![
                ("Jan".into(), "copies_sold".into(), 5.0),
                ("Jan".into(), "copies_returned".into(), 1.0),
            ]
        );
    }

    #[test]
    fn static_pages_have_no_table() {
        let empty = table(&["a"], &[]);
        let bundle = DatasetBundle {
            ad_revenue: empty.clone(),
            city_readiness: empty.clone(),
            digital_pilot: empty.clone(),
            print_sales: empty,
        };
        assert!(Page::Home.table(&bundle).is_none());
        assert!(plan_charts(Page::Recommendations, &bundle).is_empty());
        assert!(plan_charts(Page::PrintSales, &bundle).is_empty());
    }
}
