use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use crate::config::display_name;
use crate::series::{clamp_non_negative, MonthlyPoint};

// royalblue / darkorange, matching the interactive charts.
const BULK_COLOR: RGBColor = RGBColor(65, 105, 225);
const DIRECT_COLOR: RGBColor = RGBColor(255, 140, 0);

/// Stacked bar of monthly submission counts: bulk ingest at the bottom,
/// direct submissions on top.
pub fn render_monthly_bar_png(path: &Path, pathogen: &str, series: &[MonthlyPoint]) -> Result<()> {
    let labels: Vec<String> = series.iter().map(|point| point.label.clone()).collect();
    let max_total = series
        .iter()
        .map(|point| point.total.max(point.bulk))
        .max()
        .unwrap_or(0)
        .max(1);

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            format!("{} Sequences (Last 6 Months)", display_name(pathogen)),
            ("sans-serif", 32),
        )
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(
            (0u32..series.len() as u32).into_segmented(),
            0u64..max_total + max_total / 10 + 1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(series.len())
        .x_label_formatter(&|position| segment_label(position, &labels))
        .x_desc("Month")
        .y_desc("Number of Sequences")
        .draw()?;

    // Totals drawn first, then bulk over them; the orange remainder left
    // visible is the direct share.
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(DIRECT_COLOR.filled())
                .margin(12)
                .data(series.iter().enumerate().map(|(i, point)| {
                    (i as u32, point.bulk + clamp_non_negative(point.direct()))
                })),
        )?
        .label("Direct")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], DIRECT_COLOR.filled()));
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BULK_COLOR.filled())
                .margin(12)
                .data(series.iter().enumerate().map(|(i, point)| (i as u32, point.bulk))),
        )?
        .label("NCBI")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], BULK_COLOR.filled()));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    root.present()?;
    Ok(())
}

fn segment_label(position: &SegmentValue<u32>, labels: &[String]) -> String {
    match position {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_labels_map_to_month_names() {
        let labels = vec!["2025-03".to_string(), "2025-04".to_string()];
        assert_eq!(segment_label(&SegmentValue::Exact(0), &labels), "2025-03");
        assert_eq!(segment_label(&SegmentValue::CenterOf(1), &labels), "2025-04");
        assert_eq!(segment_label(&SegmentValue::Last, &labels), "");
    }

    #[test]
    fn out_of_range_segments_get_empty_labels() {
        let labels = vec!["2025-03".to_string()];
        assert_eq!(segment_label(&SegmentValue::CenterOf(9), &labels), "");
    }
}
