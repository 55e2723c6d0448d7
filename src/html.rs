//! Interactive chart pages: self-contained HTML documents that hand their
//! traces to plotly.js loaded from the CDN.

use anyhow::{Context, Result};
use serde_json::json;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::display_name;
use crate::series::{clamp_non_negative, DonutCounts, MonthlyPoint};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

const BULK_COLOR: &str = "royalblue";
const DIRECT_COLOR: &str = "darkorange";
const OPEN_COLOR: &str = "green";
const RESTRICTED_COLOR: &str = "red";

fn write_chart_page(
    path: &Path,
    title: &str,
    traces: &[serde_json::Value],
    layout: &serde_json::Value,
) -> Result<()> {
    let mut html = String::with_capacity(4 * 1024);
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(html, "<title>{}</title>", title)?;
    writeln!(html, "<script src=\"{}\"></script>", PLOTLY_CDN)?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(
        html,
        "<div id=\"chart\" style=\"width:100%;height:100vh;\"></div>"
    )?;
    writeln!(html, "<script>")?;
    writeln!(
        html,
        "Plotly.newPlot(\"chart\", {}, {});",
        serde_json::to_string(traces)?,
        serde_json::to_string(layout)?
    )?;
    writeln!(html, "</script>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Interactive counterpart of the stacked monthly bar chart.
pub fn render_monthly_bar_html(
    path: &Path,
    pathogen: &str,
    series: &[MonthlyPoint],
) -> Result<()> {
    let months: Vec<&str> = series.iter().map(|point| point.label.as_str()).collect();
    let bulk: Vec<u64> = series.iter().map(|point| point.bulk).collect();
    let direct: Vec<u64> = series
        .iter()
        .map(|point| clamp_non_negative(point.direct()))
        .collect();
    let title = format!("{} Sequences (Last 6 Months)", display_name(pathogen));

    let traces = [
        json!({
            "type": "bar",
            "x": months,
            "y": bulk,
            "name": "NCBI",
            "marker": { "color": BULK_COLOR }
        }),
        json!({
            "type": "bar",
            "x": months,
            "y": direct,
            "name": "Direct",
            "marker": { "color": DIRECT_COLOR }
        }),
    ];
    let layout = json!({
        "title": { "text": title },
        "xaxis": { "title": { "text": "Month" }, "tickangle": -45 },
        "yaxis": { "title": { "text": "Number of Sequences" } },
        "barmode": "stack",
        "legend": { "title": { "text": "Submitter Type" } }
    });
    write_chart_page(path, &title, &traces, &layout)
}

/// Two concentric rings over the same total: submitter type outside,
/// data-use terms inside.
pub fn render_donut_html(path: &Path, pathogen: &str, counts: &DonutCounts) -> Result<()> {
    let title = format!("{} Data Summary", display_name(pathogen));
    let traces = [
        json!({
            "type": "pie",
            "labels": ["OPEN", "RESTRICTED"],
            "values": counts.inner_ring(),
            "direction": "counterclockwise",
            "domain": { "x": [0.15, 0.85], "y": [0.15, 0.85] },
            "hole": 0.5,
            "hoverinfo": "label+percent",
            "marker": { "colors": [OPEN_COLOR, RESTRICTED_COLOR] },
            "name": "Data Use Terms"
        }),
        json!({
            "type": "pie",
            "labels": ["INSDC", "Direct"],
            "values": counts.outer_ring(),
            "direction": "counterclockwise",
            "hole": 0.7,
            "hoverinfo": "label+percent",
            "marker": { "colors": [BULK_COLOR, DIRECT_COLOR] },
            "name": "Submitter Type"
        }),
    ];
    let layout = json!({
        "title": { "text": title },
        "showlegend": true,
        "annotations": [
            {
                "font": { "size": 20 },
                "showarrow": false,
                "text": "Submitter Type",
                "x": 0.5,
                "y": 0.75
            },
            {
                "font": { "size": 20 },
                "showarrow": false,
                "text": "Data Use Terms",
                "x": 0.5,
                "y": 0.25
            }
        ]
    });
    write_chart_page(path, &title, &traces, &layout)
}

/// World map shaded by how many sequences name each country.
pub fn render_country_map_html(
    path: &Path,
    pathogen: &str,
    counts: &[(String, u64)],
) -> Result<()> {
    let countries: Vec<&str> = counts.iter().map(|(country, _)| country.as_str()).collect();
    let values: Vec<u64> = counts.iter().map(|(_, count)| *count).collect();
    let title = format!(
        "Geographic Distribution of {} Sequences",
        display_name(pathogen)
    );
    let traces = [json!({
        "type": "choropleth",
        "locations": countries,
        "locationmode": "country names",
        "z": values,
        "colorscale": "Plasma",
        "colorbar": { "title": { "text": "Number of Sequences" } },
        "hovertemplate": "%{location}<br>%{z} sequences<extra></extra>"
    })];
    let layout = json!({
        "title": { "text": title },
        "geo": { "showframe": false }
    });
    write_chart_page(path, &title, &traces, &layout)
}
