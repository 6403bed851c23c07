use crate::village::{Dimension, Status, VillageId};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    District,
    Status,
    TotalScore,
    Dimension(Dimension),
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::District => "district",
            SortKey::Status => "status",
            SortKey::TotalScore => "score",
            SortKey::Dimension(d) => d.code(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        match t.as_str() {
            "name" | "nama" | "desa" => Ok(SortKey::Name),
            "district" | "kecamatan" => Ok(SortKey::District),
            "status" => Ok(SortKey::Status),
            "score" | "total" | "totalscore" | "total_score" | "skor_total" => {
                Ok(SortKey::TotalScore)
            }
            _ => t.parse::<Dimension>().map(SortKey::Dimension).map_err(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }

    /// ALL → MANDIRI → MAJU → BERKEMBANG → TERTINGGAL → ALL
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::ALL[0]),
            StatusFilter::Only(s) => {
                let idx = Status::ALL.iter().position(|x| *x == s).unwrap_or(0);
                Status::ALL
                    .get(idx + 1)
                    .map(|n| StatusFilter::Only(*n))
                    .unwrap_or(StatusFilter::All)
            }
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("ALL"),
            StatusFilter::Only(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = crate::village::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>().map(StatusFilter::Only)
    }
}

/// Session-local view state. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search_text: String,
    pub status_filter: StatusFilter,
    pub sort: Option<SortConfig>,
    pub page: usize,
    pub expanded_id: Option<VillageId>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            search_text: String::new(),
            status_filter: StatusFilter::All,
            sort: None,
            page: 1,
            expanded_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_parse_source_and_english_names() {
        assert_eq!("nama".parse::<SortKey>(), Ok(SortKey::Name));
        assert_eq!("District".parse::<SortKey>(), Ok(SortKey::District));
        assert_eq!("skor_total".parse::<SortKey>(), Ok(SortKey::TotalScore));
        assert_eq!(
            "dtkpd".parse::<SortKey>(),
            Ok(SortKey::Dimension(Dimension::Governance))
        );
        assert!("population".parse::<SortKey>().is_err());
    }

    #[test]
    fn status_filter_cycles_back_to_all() {
        let mut f = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..5 {
            f = f.next();
            seen.push(f);
        }
        assert_eq!(seen[0], StatusFilter::Only(Status::Mandiri));
        assert_eq!(seen[3], StatusFilter::Only(Status::Tertinggal));
        assert_eq!(seen[4], StatusFilter::All);
    }

    #[test]
    fn status_filter_parses_all() {
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "maju".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::Maju)
        );
        assert!("nope".parse::<StatusFilter>().is_err());
    }
}
