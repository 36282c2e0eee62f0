//! Core record types
//!
//! - `Record`: one normalized incident entry
//! - `RawRecord`: an unvalidated row as supplied by the record source
//! - `Attribute`: the closed set of record fields that can be filtered on

use super::error::{RecordError, RecordResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Format used when a date is compared or displayed as text
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single incident record
///
/// Immutable once built. The date is always a valid calendar date, even when
/// the source row had a missing or garbled month or day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    state: String,
    date: NaiveDate,
    victim_name: Option<String>,
    county: Option<String>,
    victim_race: Option<String>,
    victim_sex: Option<String>,
    alleged_offense: Option<String>,
}

impl Record {
    /// Build a record from raw date parts
    ///
    /// Month and day fall back to 1 when absent, blank, non-numeric or out of
    /// range. The year must parse as an integer and the state must not be blank.
    pub fn new(
        state: impl Into<String>,
        year: Option<&str>,
        month: Option<&str>,
        day: Option<&str>,
    ) -> RecordResult<Self> {
        let state = non_blank(state.into()).ok_or(RecordError::MissingState)?;
        let date = normalize_date(year, month, day)?;
        Ok(Self::with_date(state, date))
    }

    /// Build a record from an already valid date and a known state
    pub fn with_date(state: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            state: state.into().trim().to_string(),
            date,
            victim_name: None,
            county: None,
            victim_race: None,
            victim_sex: None,
            alleged_offense: None,
        }
    }

    /// Builder method: set victim name
    pub fn victim(mut self, name: impl Into<String>) -> Self {
        self.victim_name = non_blank(name.into());
        self
    }

    /// Builder method: set county
    pub fn county(mut self, county: impl Into<String>) -> Self {
        self.county = non_blank(county.into());
        self
    }

    /// Builder method: set victim race
    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.victim_race = non_blank(race.into());
        self
    }

    /// Builder method: set victim sex
    pub fn sex(mut self, sex: impl Into<String>) -> Self {
        self.victim_sex = non_blank(sex.into());
        self
    }

    /// Builder method: set alleged offense
    pub fn offense(mut self, offense: impl Into<String>) -> Self {
        self.alleged_offense = non_blank(offense.into());
        self
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn victim_name(&self) -> Option<&str> {
        self.victim_name.as_deref()
    }

    /// County as stored (not trimmed)
    pub fn county_name(&self) -> Option<&str> {
        self.county.as_deref()
    }

    pub fn victim_race(&self) -> Option<&str> {
        self.victim_race.as_deref()
    }

    pub fn victim_sex(&self) -> Option<&str> {
        self.victim_sex.as_deref()
    }

    pub fn alleged_offense(&self) -> Option<&str> {
        self.alleged_offense.as_deref()
    }

    /// Read an attribute as text
    ///
    /// Dates render as `YYYY-MM-DD`. Absent optional fields return `None`.
    pub fn get(&self, attribute: Attribute) -> Option<Cow<'_, str>> {
        match attribute {
            Attribute::State => Some(Cow::Borrowed(self.state.as_str())),
            Attribute::Date => Some(Cow::Owned(self.date.format(DATE_FORMAT).to_string())),
            Attribute::VictimName => self.victim_name().map(Cow::Borrowed),
            Attribute::County => self.county_name().map(Cow::Borrowed),
            Attribute::VictimRace => self.victim_race().map(Cow::Borrowed),
            Attribute::VictimSex => self.victim_sex().map(Cow::Borrowed),
            Attribute::AllegedOffense => self.alleged_offense().map(Cow::Borrowed),
        }
    }

    /// Exact value equality on one attribute
    pub fn matches(&self, attribute: Attribute, value: &str) -> bool {
        match attribute {
            Attribute::Date => self.date.format(DATE_FORMAT).to_string() == value,
            Attribute::State => self.state == value,
            Attribute::VictimName => self.victim_name() == Some(value),
            Attribute::County => self.county_name() == Some(value),
            Attribute::VictimRace => self.victim_race() == Some(value),
            Attribute::VictimSex => self.victim_sex() == Some(value),
            Attribute::AllegedOffense => self.alleged_offense() == Some(value),
        }
    }
}

impl TryFrom<RawRecord> for Record {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> RecordResult<Self> {
        let mut record = Record::new(
            raw.state,
            raw.year.as_deref(),
            raw.month.as_deref(),
            raw.day.as_deref(),
        )?;
        record.victim_name = raw.victim.and_then(non_blank);
        record.county = raw.county.and_then(non_blank);
        record.victim_race = raw.race.and_then(non_blank);
        record.victim_sex = raw.sex.and_then(non_blank);
        record.alleged_offense = raw.offense.and_then(non_blank);
        Ok(record)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();
        writeln!(f, "State: {}", self.state)?;
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        writeln!(f, "Victim Name: {}", or_dash(self.victim_name()))?;
        writeln!(f, "County: {}", or_dash(self.county_name()))?;
        writeln!(f, "Victim Race: {}", or_dash(self.victim_race()))?;
        writeln!(f, "Victim Sex: {}", or_dash(self.victim_sex()))?;
        write!(f, "Alleged Offense: {}", or_dash(self.alleged_offense()))
    }
}

/// One row from the record source, before validation
///
/// Field names follow the incident CSV header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub state: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub victim: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub offense: Option<String>,
}

/// Filterable record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    State,
    Date,
    VictimName,
    County,
    VictimRace,
    VictimSex,
    AllegedOffense,
}

impl Attribute {
    /// Get all attributes for iteration
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::State,
            Attribute::Date,
            Attribute::VictimName,
            Attribute::County,
            Attribute::VictimRace,
            Attribute::VictimSex,
            Attribute::AllegedOffense,
        ]
    }

    /// Canonical (camelCase) name
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::State => "state",
            Attribute::Date => "date",
            Attribute::VictimName => "victimName",
            Attribute::County => "county",
            Attribute::VictimRace => "victimRace",
            Attribute::VictimSex => "victimSex",
            Attribute::AllegedOffense => "allegedOffense",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = RecordError;

    fn from_str(s: &str) -> RecordResult<Self> {
        match s {
            "state" => Ok(Attribute::State),
            "date" => Ok(Attribute::Date),
            "victimName" | "victim_name" => Ok(Attribute::VictimName),
            "county" => Ok(Attribute::County),
            "victimRace" | "victim_race" => Ok(Attribute::VictimRace),
            "victimSex" | "victim_sex" => Ok(Attribute::VictimSex),
            "allegedOffense" | "alleged_offense" => Ok(Attribute::AllegedOffense),
            other => Err(RecordError::UnknownAttribute(other.to_string())),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_part(part: Option<&str>) -> Option<u32> {
    part.and_then(|s| s.trim().parse::<u32>().ok())
}

/// Resolve year/month/day text into a calendar date
fn normalize_date(
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> RecordResult<NaiveDate> {
    let invalid = || RecordError::InvalidDate(year.map(str::to_string));

    let year: i32 = year
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(invalid)?;

    let month = parse_part(month)
        .filter(|m| (1..=12).contains(m))
        .unwrap_or(1);
    let day = parse_part(day).unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
        .ok_or_else(invalid)
}
