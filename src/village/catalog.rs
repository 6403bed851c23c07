//! Static lookup tables for indicator display names and dimension grouping.

use crate::village::model::{Dimension, IndicatorCode};

const INDICATOR_NAMES: &[(u8, &str)] = &[
    (1, "Akses Kesehatan Dasar"),
    (2, "Dokter/Nakes Desa"),
    (3, "Jaminan Kesehatan Warga"),
    (5, "Akses Pendidikan Non-Formal"),
    (6, "Ketersediaan TBM/Perpus"),
    (10, "Aktivitas Posyandu"),
    (13, "Akses Sanitasi Layak"),
    (15, "Gotong Royong"),
    (16, "Ruang Publik Terbuka"),
    (17, "Kearifan Lokal/Budaya"),
    (23, "Keberagaman Produksi"),
    (25, "Akses Toko/Warung Digital"),
    (26, "Kinerja BUMDes"),
    (29, "Akses Logistik/Jalan"),
    (30, "Akses Pasar Ekspor"),
    (31, "Pencemaran Lingkungan"),
    (32, "Pengelolaan Sampah"),
    (38, "Waktu Tempuh Prasarana"),
    (40, "Kualitas Musdes"),
    (41, "Dokumen Perencanaan"),
    (42, "Transparansi Keuangan"),
    (47, "Inovasi/PADes"),
];

const GROUPS: [(Dimension, &[u8]); 6] = [
    (Dimension::BasicServices, &[1, 2, 3, 5, 6, 10, 13]),
    (Dimension::Social, &[15, 16, 17]),
    (Dimension::Economic, &[23, 25, 26, 29, 30]),
    (Dimension::Environmental, &[31, 32]),
    (Dimension::Accessibility, &[38]),
    (Dimension::Governance, &[40, 41, 42, 47]),
];

pub fn indicator_name(code: IndicatorCode) -> Option<&'static str> {
    INDICATOR_NAMES
        .iter()
        .find(|(n, _)| *n == code.number())
        .map(|(_, name)| *name)
}

/// Display label, falling back to a generic one for unnamed indicators.
pub fn indicator_label(code: IndicatorCode) -> String {
    match indicator_name(code) {
        Some(name) => name.to_string(),
        None => format!("Indikator {}", code),
    }
}

/// Indicator codes shown under a dimension, in table order.
pub fn group_members(dim: Dimension) -> Vec<IndicatorCode> {
    GROUPS
        .iter()
        .find(|(d, _)| *d == dim)
        .map(|(_, members)| {
            members
                .iter()
                .filter_map(|n| IndicatorCode::new(*n))
                .collect()
        })
        .unwrap_or_default()
}

pub fn is_grouped(code: IndicatorCode) -> bool {
    GROUPS
        .iter()
        .any(|(_, members)| members.contains(&code.number()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(n: u8) -> IndicatorCode {
        IndicatorCode::new(n).unwrap()
    }

    #[test]
    fn every_dimension_has_a_group() {
        for dim in Dimension::ALL {
            assert!(!group_members(dim).is_empty(), "{:?} has no members", dim);
        }
        let total: usize = Dimension::ALL.iter().map(|d| group_members(*d).len()).sum();
        assert_eq!(total, 22);
        assert!(is_grouped(code(47)));
        assert!(!is_grouped(code(48)));
    }

    #[test]
    fn groups_do_not_overlap() {
        let mut seen = std::collections::HashSet::new();
        for dim in Dimension::ALL {
            for c in group_members(dim) {
                assert!(seen.insert(c), "{} listed twice", c);
            }
        }
    }

    #[test]
    fn unnamed_indicators_get_generic_labels() {
        assert_eq!(indicator_label(code(26)), "Kinerja BUMDes");
        assert_eq!(indicator_label(code(4)), "Indikator I.04");
        assert_eq!(indicator_name(code(48)), None);
    }
}
