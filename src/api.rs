use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from the LAPIS HTTP layer. A failed request is kept distinct from a
/// successful request that matched zero records.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("bad response body from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },
}

/// Filters accepted by the aggregated endpoint. All optional; an empty filter
/// asks for the all-time total.
#[derive(Debug, Default, Clone)]
pub struct AggregateFilter {
    pub released_from: Option<NaiveDate>,
    pub released_to: Option<NaiveDate>,
    pub submitter: Option<String>,
    pub data_use_terms: Option<String>,
}

impl AggregateFilter {
    pub fn released_between(from: NaiveDate, to: NaiveDate) -> AggregateFilter {
        AggregateFilter {
            released_from: Some(from),
            released_to: Some(to),
            ..Default::default()
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.released_from {
            params.push(("earliestReleaseDateFrom", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(date) = self.released_to {
            params.push(("earliestReleaseDateTo", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(submitter) = &self.submitter {
            params.push(("submitter", submitter.clone()));
        }
        if let Some(terms) = &self.data_use_terms {
            params.push(("dataUseTerms", terms.clone()));
        }
        params
    }
}

/// Response shape shared by both sample endpoints: `{"data": [ ... ]}`.
#[derive(Debug, Deserialize)]
struct AggregatedResponse {
    #[serde(default)]
    data: Vec<AggregatedRecord>,
}

#[derive(Debug, Deserialize)]
struct AggregatedRecord {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    data: Vec<serde_json::Map<String, serde_json::Value>>,
}

pub struct LapisClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl LapisClient {
    pub fn new(base_url: &str) -> LapisClient {
        LapisClient {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Count of samples matching `filter`; 0 when the response carries no
    /// records at all.
    pub fn aggregated_count(
        &self,
        pathogen: &str,
        filter: &AggregateFilter,
    ) -> Result<u64, FetchError> {
        let url = format!("{}/{}/sample/aggregated", self.base_url, pathogen);
        let response = self
            .http
            .get(&url)
            .query(&filter.query())
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body: AggregatedResponse =
            response.json().map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;
        Ok(first_count(&body))
    }

    /// All non-null values of `field` across every sample record. The endpoint
    /// returns the full result set in one page.
    pub fn field_values(&self, pathogen: &str, field: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/{}/sample/details", self.base_url, pathogen);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", field)])
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body: DetailsResponse = response.json().map_err(|source| FetchError::Decode {
            url: url.clone(),
            source,
        })?;
        Ok(extract_field(&body, field))
    }
}

fn first_count(response: &AggregatedResponse) -> u64 {
    response.data.first().map(|record| record.count).unwrap_or(0)
}

fn extract_field(response: &DetailsResponse, field: &str) -> Vec<String> {
    response
        .data
        .iter()
        .filter_map(|record| record.get(field))
        .filter_map(|value| value.as_str())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn count_from_populated_payload() {
        let body: AggregatedResponse =
            serde_json::from_str(r#"{"data":[{"count":412}]}"#).unwrap();
        assert_eq!(first_count(&body), 412);
    }

    #[test]
    fn count_defaults_to_zero_without_records() {
        let empty: AggregatedResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(first_count(&empty), 0);
        let missing: AggregatedResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(first_count(&missing), 0);
    }

    #[test]
    fn first_record_wins_when_multiple() {
        let body: AggregatedResponse =
            serde_json::from_str(r#"{"data":[{"count":7},{"count":9}]}"#).unwrap();
        assert_eq!(first_count(&body), 7);
    }

    #[test]
    fn field_extraction_skips_null_and_missing() {
        let body: DetailsResponse = serde_json::from_str(
            r#"{"data":[
                {"geoLocCountry":"Germany"},
                {"geoLocCountry":null},
                {},
                {"geoLocCountry":"Kenya"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            extract_field(&body, "geoLocCountry"),
            vec!["Germany", "Kenya"]
        );
    }

    #[test]
    fn date_filters_encode_as_iso_query_params() {
        let filter = AggregateFilter::released_between(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        );
        assert_eq!(
            filter.query(),
            vec![
                ("earliestReleaseDateFrom", "2025-03-01".to_string()),
                ("earliestReleaseDateTo", "2025-03-31".to_string()),
            ]
        );
    }

    #[test]
    fn submitter_and_terms_filters_encode() {
        let filter = AggregateFilter {
            submitter: Some("insdc_ingest_user".to_string()),
            data_use_terms: Some("RESTRICTED".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.query(),
            vec![
                ("submitter", "insdc_ingest_user".to_string()),
                ("dataUseTerms", "RESTRICTED".to_string()),
            ]
        );
    }

    // Serves exactly one canned response on a loopback port.
    fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn success_payload_yields_count() {
        let base = one_shot_server("200 OK", r#"{"data":[{"count":55}]}"#);
        let client = LapisClient::new(&base);
        let count = client
            .aggregated_count("mpox", &AggregateFilter::default())
            .unwrap();
        assert_eq!(count, 55);
    }

    #[test]
    fn server_error_is_a_status_error() {
        let base = one_shot_server("500 Internal Server Error", "");
        let client = LapisClient::new(&base);
        let err = client
            .aggregated_count("cchf", &AggregateFilter::default())
            .unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn details_fetch_returns_field_values() {
        let base = one_shot_server(
            "200 OK",
            r#"{"data":[{"geoLocCountry":"Brazil"},{"geoLocCountry":"Brazil"},{"geoLocCountry":"Peru"}]}"#,
        );
        let client = LapisClient::new(&base);
        let values = client.field_values("mpox", "geoLocCountry").unwrap();
        assert_eq!(values, vec!["Brazil", "Brazil", "Peru"]);
    }
}
