use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://lapis.pathoplexus.org";
pub const DEFAULT_OUT_DIR: &str = "images";

/// Ingest account used for bulk imports from the INSDC databases.
pub const BULK_SUBMITTER: &str = "insdc_ingest_user";
/// Data-use-terms category for access-restricted records.
pub const RESTRICTED_TERMS: &str = "RESTRICTED";
/// Sample detail field holding the country of collection.
pub const COUNTRY_FIELD: &str = "geoLocCountry";

pub const TRAILING_MONTHS: usize = 6;

const PATHOGENS: [&str; 5] = ["ebola-zaire", "ebola-sudan", "mpox", "west-nile", "cchf"];

/// Run-wide settings. Defaults mirror the production Pathoplexus instance.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub base_url: String,
    pub pathogens: Vec<String>,
    pub bulk_submitter: String,
    pub out_dir: PathBuf,
    pub trailing_months: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            pathogens: PATHOGENS.iter().map(|p| p.to_string()).collect(),
            bulk_submitter: BULK_SUBMITTER.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            trailing_months: TRAILING_MONTHS,
        }
    }
}

impl ReportConfig {
    /// `{out_dir}/{pathogen}_{suffix}`, the naming convention every chart
    /// artifact follows.
    pub fn artifact_path(&self, pathogen: &str, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("{}_{}", pathogen, suffix))
    }
}

/// "ebola-zaire" -> "Ebola Zaire", for chart titles.
pub fn display_name(pathogen: &str) -> String {
    pathogen
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
