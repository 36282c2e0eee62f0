//! US state lookup table
//!
//! Maps postal abbreviations and full names to FIPS codes. Incident rows and
//! Census responses name states differently, so both sides are normalized to
//! the postal code through this table.

/// One US state (or DC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub abbr: &'static str,
    pub fips: &'static str,
    pub name: &'static str,
}

const fn state(abbr: &'static str, fips: &'static str, name: &'static str) -> StateInfo {
    StateInfo { abbr, fips, name }
}

pub const STATES: &[StateInfo] = &[
    state("AL", "01", "Alabama"),
    state("AK", "02", "Alaska"),
    state("AZ", "04", "Arizona"),
    state("AR", "05", "Arkansas"),
    state("CA", "06", "California"),
    state("CO", "08", "Colorado"),
    state("CT", "09", "Connecticut"),
    state("DE", "10", "Delaware"),
    state("DC", "11", "District of Columbia"),
    state("FL", "12", "Florida"),
    state("GA", "13", "Georgia"),
    state("HI", "15", "Hawaii"),
    state("ID", "16", "Idaho"),
    state("IL", "17", "Illinois"),
    state("IN", "18", "Indiana"),
    state("IA", "19", "Iowa"),
    state("KS", "20", "Kansas"),
    state("KY", "21", "Kentucky"),
    state("LA", "22", "Louisiana"),
    state("ME", "23", "Maine"),
    state("MD", "24", "Maryland"),
    state("MA", "25", "Massachusetts"),
    state("MI", "26", "Michigan"),
    state("MN", "27", "Minnesota"),
    state("MS", "28", "Mississippi"),
    state("MO", "29", "Missouri"),
    state("MT", "30", "Montana"),
    state("NE", "31", "Nebraska"),
    state("NV", "32", "Nevada"),
    state("NH", "33", "New Hampshire"),
    state("NJ", "34", "New Jersey"),
    state("NM", "35", "New Mexico"),
    state("NY", "36", "New York"),
    state("NC", "37", "North Carolina"),
    state("ND", "38", "North Dakota"),
    state("OH", "39", "Ohio"),
    state("OK", "40", "Oklahoma"),
    state("OR", "41", "Oregon"),
    state("PA", "42", "Pennsylvania"),
    state("RI", "44", "Rhode Island"),
    state("SC", "45", "South Carolina"),
    state("SD", "46", "South Dakota"),
    state("TN", "47", "Tennessee"),
    state("TX", "48", "Texas"),
    state("UT", "49", "Utah"),
    state("VT", "50", "Vermont"),
    state("VA", "51", "Virginia"),
    state("WA", "53", "Washington"),
    state("WV", "54", "West Virginia"),
    state("WI", "55", "Wisconsin"),
    state("WY", "56", "Wyoming"),
];

/// Find a state by postal code or full name (case-insensitive)
pub fn lookup(state: &str) -> Option<&'static StateInfo> {
    let state = state.trim();
    STATES
        .iter()
        .find(|s| s.abbr.eq_ignore_ascii_case(state) || s.name.eq_ignore_ascii_case(state))
}

/// Find a state by its two-digit FIPS code
pub fn by_fips(fips: &str) -> Option<&'static StateInfo> {
    STATES.iter().find(|s| s.fips == fips)
}

/// Canonical postal code for a state, or the trimmed input if unknown
pub fn canonical(state: &str) -> String {
    lookup(state)
        .map(|s| s.abbr.to_string())
        .unwrap_or_else(|| state.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("AL").unwrap().fips, "01");
        assert_eq!(lookup("al").unwrap().name, "Alabama");
        assert_eq!(lookup(" Mississippi ").unwrap().abbr, "MS");
        assert!(lookup("Atlantis").is_none());
    }

    #[test]
    fn test_by_fips_and_canonical() {
        assert_eq!(by_fips("13").unwrap().abbr, "GA");
        assert!(by_fips("03").is_none());
        assert_eq!(canonical("georgia"), "GA");
        assert_eq!(canonical(" Unknown "), "Unknown");
        assert_eq!(STATES.len(), 51);
    }
}
