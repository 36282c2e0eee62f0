//! Census API Client
//!
//! Fetches ACS 5-year county estimates from the US Census Bureau API.
//! One request per state; the response is a JSON table whose first row
//! holds the column names.

use super::{county_display_name, states, CensusError, CountyStats, DemographicSource, RaceBreakdown};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const TOTAL_POPULATION: &str = "B01003_001E";
const MEDIAN_INCOME: &str = "B19013_001E";
const WHITE: &str = "B02001_002E";
const BLACK: &str = "B02001_003E";
const AMERICAN_INDIAN: &str = "B02001_004E";
const ASIAN: &str = "B02001_005E";
const BELOW_POVERTY: &str = "B17001_002E";

/// Variables requested for every county
pub const CENSUS_VARIABLES: &[&str] = &[
    TOTAL_POPULATION,
    MEDIAN_INCOME,
    WHITE,
    BLACK,
    AMERICAN_INDIAN,
    ASIAN,
    BELOW_POVERTY,
];

/// Configuration for the Census client
#[derive(Debug, Clone)]
pub struct CensusConfig {
    /// Base URL (e.g., "https://api.census.gov/data")
    pub base_url: String,
    /// Survey year
    pub year: u16,
    /// Dataset path under the year
    pub dataset: String,
    /// Optional API key (anonymous requests are rate limited)
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.census.gov/data".to_string(),
            year: 2020,
            dataset: "acs/acs5".to_string(),
            api_key: None,
            request_timeout_ms: 30_000,
        }
    }
}

impl CensusConfig {
    /// Full dataset URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.year,
            self.dataset.trim_matches('/')
        )
    }
}

/// Census Bureau REST API client
pub struct CensusClient {
    client: Client,
    config: CensusConfig,
}

impl CensusClient {
    /// Create a new client with the given configuration
    pub fn new(config: CensusConfig) -> Result<Self, CensusError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CensusConfig {
        &self.config
    }

    /// Fetch every county of one state
    pub async fn fetch_state(&self, state: &str) -> Result<Vec<CountyStats>, CensusError> {
        let info = states::lookup(state).ok_or_else(|| CensusError::UnknownState(state.to_string()))?;

        let get = format!("NAME,{}", CENSUS_VARIABLES.join(","));
        let in_state = format!("state:{}", info.fips);
        let mut params = vec![
            ("get", get.as_str()),
            ("for", "county:*"),
            ("in", in_state.as_str()),
        ];
        if let Some(key) = self.config.api_key.as_deref() {
            params.push(("key", key));
        }

        let url = self.config.endpoint();
        tracing::debug!(url = %url, state = info.abbr, "Requesting county statistics");

        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CensusError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let table: Vec<Vec<Value>> = response.json().await?;
        parse_table(info.abbr, &table)
    }
}

#[async_trait]
impl DemographicSource for CensusClient {
    fn name(&self) -> &str {
        "census-api"
    }

    async fn county_stats(&self, state: &str) -> Result<Vec<CountyStats>, CensusError> {
        self.fetch_state(state).await
    }
}

/// Parse a Census API table into county statistics
///
/// The first row names the columns. Values may arrive as strings or numbers;
/// negative values are Census sentinels for missing data.
pub fn parse_table(state: &str, table: &[Vec<Value>]) -> Result<Vec<CountyStats>, CensusError> {
    let (header, rows) = table
        .split_first()
        .ok_or_else(|| CensusError::ParseError("empty response".to_string()))?;

    let column = |name: &str| -> Result<usize, CensusError> {
        header
            .iter()
            .position(|h| h.as_str() == Some(name))
            .ok_or_else(|| CensusError::ParseError(format!("missing column {}", name)))
    };

    let name_col = column("NAME")?;
    let population_col = column(TOTAL_POPULATION)?;
    let income_col = column(MEDIAN_INCOME)?;
    let white_col = column(WHITE)?;
    let black_col = column(BLACK)?;
    let indian_col = column(AMERICAN_INDIAN)?;
    let asian_col = column(ASIAN)?;
    let poverty_col = column(BELOW_POVERTY)?;

    let mut counties = Vec::with_capacity(rows.len());
    for row in rows {
        let name = row
            .get(name_col)
            .and_then(Value::as_str)
            .ok_or_else(|| CensusError::ParseError("row without NAME".to_string()))?;

        // "Autauga County, Alabama"
        let county = name.split(',').next().unwrap_or(name);
        let count = |col: usize| number(row.get(col)).filter(|n| *n >= 0).unwrap_or(0) as u64;

        let population = count(population_col);
        let white = count(white_col);
        let black = count(black_col);
        let american_indian = count(indian_col);
        let asian = count(asian_col);

        counties.push(CountyStats {
            state: state.to_string(),
            county: county_display_name(county),
            population,
            median_income: number(row.get(income_col))
                .filter(|n| *n >= 0)
                .map(|n| n as u64),
            race: RaceBreakdown {
                white,
                black,
                american_indian,
                asian,
                other: population.saturating_sub(white + black + american_indian + asian),
            },
            poverty_count: count(poverty_col),
        });
    }

    Ok(counties)
}

fn number(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}
