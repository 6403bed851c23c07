use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const INDICATOR_COUNT: usize = 48;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid indicator code: {0}")]
    IndicatorCode(String),
    #[error("rating {rating} for {code} is outside 1..=5")]
    Rating { code: String, rating: u8 },
    #[error("unknown status: {0}")]
    Status(String),
    #[error("unknown dimension: {0}")]
    Dimension(String),
    #[error("duplicate village id: {0}")]
    DuplicateId(VillageId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VillageId(pub u32);

impl fmt::Display for VillageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VillageId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(VillageId)
    }
}

/// ID6 development tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Mandiri,
    Maju,
    Berkembang,
    Tertinggal,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Mandiri,
        Status::Maju,
        Status::Berkembang,
        Status::Tertinggal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Mandiri => "MANDIRI",
            Status::Maju => "MAJU",
            Status::Berkembang => "BERKEMBANG",
            Status::Tertinggal => "TERTINGGAL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mandiri" | "independent" => Ok(Status::Mandiri),
            "maju" | "advanced" => Ok(Status::Maju),
            "berkembang" | "developing" => Ok(Status::Berkembang),
            "tertinggal" | "disadvantaged" => Ok(Status::Tertinggal),
            _ => Err(ModelError::Status(s.to_string())),
        }
    }
}

/// The six ID6 scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    BasicServices,
    Social,
    Economic,
    Environmental,
    Accessibility,
    Governance,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::BasicServices,
        Dimension::Social,
        Dimension::Economic,
        Dimension::Environmental,
        Dimension::Accessibility,
        Dimension::Governance,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Dimension::BasicServices => "DLD",
            Dimension::Social => "DS",
            Dimension::Economic => "DE",
            Dimension::Environmental => "DL",
            Dimension::Accessibility => "DA",
            Dimension::Governance => "DTKPD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::BasicServices => "Layanan Dasar (DLD)",
            Dimension::Social => "Sosial (DS)",
            Dimension::Economic => "Ekonomi (DE)",
            Dimension::Environmental => "Lingkungan (DL)",
            Dimension::Accessibility => "Aksesibilitas (DA)",
            Dimension::Governance => "Tata Kelola (DTKPD)",
        }
    }
}

impl FromStr for Dimension {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Dimension::ALL
            .into_iter()
            .find(|d| d.code().eq_ignore_ascii_case(t))
            .ok_or_else(|| ModelError::Dimension(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionScores {
    #[serde(rename = "DLD")]
    pub basic_services: f64,
    #[serde(rename = "DS")]
    pub social: f64,
    #[serde(rename = "DE")]
    pub economic: f64,
    #[serde(rename = "DL")]
    pub environmental: f64,
    #[serde(rename = "DA")]
    pub accessibility: f64,
    #[serde(rename = "DTKPD")]
    pub governance: f64,
}

impl DimensionScores {
    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::BasicServices => self.basic_services,
            Dimension::Social => self.social,
            Dimension::Economic => self.economic,
            Dimension::Environmental => self.environmental,
            Dimension::Accessibility => self.accessibility,
            Dimension::Governance => self.governance,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

fn indicator_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^I\.(\d{2})$").expect("static indicator pattern"))
}

/// One of the 48 fine-grained indicators, `I.01` through `I.48`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndicatorCode(u8);

impl IndicatorCode {
    pub fn new(n: u8) -> Option<Self> {
        if (1..=INDICATOR_COUNT as u8).contains(&n) {
            Some(IndicatorCode(n))
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = IndicatorCode> {
        (1..=INDICATOR_COUNT as u8).map(IndicatorCode)
    }

    fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for IndicatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I.{:02}", self.0)
    }
}

impl FromStr for IndicatorCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        indicator_pattern()
            .captures(s.trim())
            .and_then(|caps| caps[1].parse::<u8>().ok())
            .and_then(IndicatorCode::new)
            .ok_or_else(|| ModelError::IndicatorCode(s.to_string()))
    }
}

/// Indicator ratings keyed by code. Not every slot has to be populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u8>", into = "BTreeMap<String, u8>")]
pub struct Indicators {
    ratings: [Option<u8>; INDICATOR_COUNT],
}

impl Default for Indicators {
    fn default() -> Self {
        Indicators {
            ratings: [None; INDICATOR_COUNT],
        }
    }
}

impl Indicators {
    pub fn get(&self, code: IndicatorCode) -> Option<u8> {
        self.ratings[code.slot()]
    }

    pub fn set(&mut self, code: IndicatorCode, rating: u8) -> Result<(), ModelError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ModelError::Rating {
                code: code.to_string(),
                rating,
            });
        }
        self.ratings[code.slot()] = Some(rating);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ratings.iter().filter(|r| r.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndicatorCode, u8)> + '_ {
        IndicatorCode::all().filter_map(move |c| self.get(c).map(|r| (c, r)))
    }
}

impl TryFrom<BTreeMap<String, u8>> for Indicators {
    type Error = ModelError;

    fn try_from(map: BTreeMap<String, u8>) -> Result<Self, Self::Error> {
        let mut out = Indicators::default();
        for (key, rating) in map {
            let code = key.parse::<IndicatorCode>()?;
            out.set(code, rating)?;
        }
        Ok(out)
    }
}

impl From<Indicators> for BTreeMap<String, u8> {
    fn from(ind: Indicators) -> Self {
        ind.iter().map(|(c, r)| (c.to_string(), r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageRecord {
    pub id: VillageId,
    pub code: String,
    pub name: String,
    pub district: String,
    pub status: Status,
    pub total_score: f64,
    pub dimensions: DimensionScores,
    pub indicators: Indicators,
}

/// Fails on the first id that appears twice.
pub fn ensure_unique_ids(records: &[VillageRecord]) -> Result<(), ModelError> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id) {
            return Err(ModelError::DuplicateId(r.id));
        }
    }
    Ok(())
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_code_parses_and_formats() {
        let c: IndicatorCode = "I.07".parse().unwrap();
        assert_eq!(c.number(), 7);
        assert_eq!(c.to_string(), "I.07");
        assert!("I.00".parse::<IndicatorCode>().is_err());
        assert!("I.49".parse::<IndicatorCode>().is_err());
        assert!("I.7".parse::<IndicatorCode>().is_err());
        assert!("i.07".parse::<IndicatorCode>().is_err());
        assert_eq!(IndicatorCode::all().count(), INDICATOR_COUNT);
    }

    #[test]
    fn status_accepts_source_and_english_names() {
        assert_eq!("MAJU".parse::<Status>().unwrap(), Status::Maju);
        assert_eq!("advanced".parse::<Status>().unwrap(), Status::Maju);
        assert_eq!("Independent".parse::<Status>().unwrap(), Status::Mandiri);
        assert_eq!(
            "disadvantaged".parse::<Status>().unwrap(),
            Status::Tertinggal
        );
        assert!("ALL".parse::<Status>().is_err());
    }

    #[test]
    fn indicators_reject_bad_ratings_and_keys() {
        let mut ind = Indicators::default();
        let code = IndicatorCode::new(3).unwrap();
        assert!(ind.set(code, 0).is_err());
        assert!(ind.set(code, 6).is_err());
        ind.set(code, 5).unwrap();
        assert_eq!(ind.get(code), Some(5));
        assert_eq!(ind.len(), 1);

        let bad: Result<Indicators, _> = serde_json::from_str(r#"{"I.99": 3}"#);
        assert!(bad.is_err());
        let bad: Result<Indicators, _> = serde_json::from_str(r#"{"I.01": 9}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn record_json_uses_source_keys() {
        let json = r#"{
            "id": 7,
            "code": "1807000007",
            "name": "Raman Endra",
            "district": "Raman Utara",
            "status": "MANDIRI",
            "total_score": 83.62,
            "dimensions": {"DLD": 14.1, "DS": 13.0, "DE": 15.2, "DL": 12.9, "DA": 20.0, "DTKPD": 13.5},
            "indicators": {"I.01": 4, "I.48": 5}
        }"#;
        let rec: VillageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, VillageId(7));
        assert_eq!(rec.status, Status::Mandiri);
        assert_eq!(rec.dimensions.get(Dimension::Accessibility), 20.0);
        assert_eq!(rec.indicators.len(), 2);

        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["indicators"]["I.48"], 5);
        assert_eq!(back["dimensions"]["DTKPD"], 13.5);
    }

    #[test]
    fn dimensions_require_exactly_six_keys() {
        let missing = r#"{"DLD": 1, "DS": 1, "DE": 1, "DL": 1, "DA": 1}"#;
        assert!(serde_json::from_str::<DimensionScores>(missing).is_err());
        let extra = r#"{"DLD": 1, "DS": 1, "DE": 1, "DL": 1, "DA": 1, "DTKPD": 1, "DX": 1}"#;
        assert!(serde_json::from_str::<DimensionScores>(extra).is_err());
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(70.0849), 70.08);
        assert_eq!(round2(77.956), 77.96);
    }
}
