use anyhow::{Context, Result};
use chrono::NaiveDate;
use structopt::StructOpt;

mod api;
mod charts;
mod config;
mod html;
mod months;
mod series;

use api::LapisClient;
use config::ReportConfig;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pathogenreport",
    about = "Chart sequence submission statistics from a LAPIS server"
)]
struct Opt {
    /// Render the static monthly bar charts
    #[structopt(long)]
    counts: bool,
    /// Render the interactive monthly bar charts
    #[structopt(long)]
    interactive: bool,
    /// Render the submitter/data-use donut charts
    #[structopt(long)]
    donut: bool,
    /// Render the per-country choropleth maps
    #[structopt(long)]
    map: bool,
    #[structopt(long, help = "Anchor the trailing window at this date (%Y-%m-%d format)")]
    date: Option<String>,
    #[structopt(long, help = "LAPIS server to query")]
    base_url: Option<String>,
    #[structopt(long, parse(from_os_str), help = "Directory for the generated charts")]
    out_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct ReportKinds {
    counts: bool,
    interactive: bool,
    donut: bool,
    map: bool,
}

impl ReportKinds {
    /// Selected flags, or everything when no flag is given.
    fn from_opt(opt: &Opt) -> ReportKinds {
        if opt.counts || opt.interactive || opt.donut || opt.map {
            ReportKinds {
                counts: opt.counts,
                interactive: opt.interactive,
                donut: opt.donut,
                map: opt.map,
            }
        } else {
            ReportKinds {
                counts: true,
                interactive: true,
                donut: true,
                map: true,
            }
        }
    }

    fn monthly(&self) -> bool {
        self.counts || self.interactive
    }
}

fn run_reports(
    client: &LapisClient,
    config: &ReportConfig,
    kinds: ReportKinds,
    today: NaiveDate,
) -> Result<()> {
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;

    // One pathogen start to finish before the next; every chart for it is
    // rendered right after its fetches.
    for pathogen in &config.pathogens {
        println!("Working on: {}", pathogen);

        if kinds.monthly() {
            let monthly = series::fetch_monthly_series(client, pathogen, today, config);
            series::warn_inconsistent_months(pathogen, &monthly);
            if kinds.counts {
                let path = config.artifact_path(pathogen, "6monthcounts.png");
                charts::render_monthly_bar_png(&path, pathogen, &monthly)?;
                println!("Saved: {}", path.display());
            }
            if kinds.interactive {
                let path = config.artifact_path(pathogen, "6monthcounts_interactive.html");
                html::render_monthly_bar_html(&path, pathogen, &monthly)?;
                println!("Saved: {}", path.display());
            }
        }

        if kinds.donut {
            let counts = series::fetch_donut_counts(client, pathogen, config);
            series::warn_inconsistent_donut(pathogen, &counts);
            let path = config.artifact_path(pathogen, "donut_plot.html");
            html::render_donut_html(&path, pathogen, &counts)?;
            println!("Saved: {}", path.display());
        }

        if kinds.map {
            match series::fetch_country_counts(client, pathogen, config::COUNTRY_FIELD) {
                Ok(counts) => {
                    let path = config.artifact_path(pathogen, "geo_map.html");
                    html::render_country_map_html(&path, pathogen, &counts)?;
                    println!("Saved: {}", path.display());
                }
                Err(err) => println!("Error fetching data for {}: {}", pathogen, err),
            }
        }
    }

    println!("All charts generated successfully!");
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let today = match &opt.date {
        Some(datestr) => NaiveDate::parse_from_str(datestr, "%Y-%m-%d")
            .with_context(|| format!("bad --date {:?}", datestr))?,
        None => chrono::Local::now().date_naive(),
    };

    let mut config = ReportConfig::default();
    if let Some(base_url) = opt.base_url.clone() {
        config.base_url = base_url;
    }
    if let Some(out_dir) = opt.out_dir.clone() {
        config.out_dir = out_dir;
    }

    let kinds = ReportKinds::from_opt(&opt);
    let client = LapisClient::new(&config.base_url);
    run_reports(&client, &config, kinds, today)
}
