//! Seeded demo data. The same seed always yields the same record set.

use crate::village::model::{
    round2, DimensionScores, IndicatorCode, Indicators, Status, VillageId, VillageRecord,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_COUNT: usize = 264;
/// Upper bound on one generated set.
pub const MAX_COUNT: usize = 10_000;

const DISTRICTS: &[&str] = &[
    "Sukadana",
    "Labuhan Ratu",
    "Batanghari",
    "Sekampung",
    "Pekalongan",
    "Way Jepara",
    "Purbolinggo",
    "Raman Utara",
    "Metro Kibang",
    "Marga Tiga",
    "Mataram Baru",
    "Bandar Sribhawono",
    "Melinting",
    "Gunung Pelindung",
    "Jabung",
    "Waway Karya",
    "Batanghari Nuban",
    "Bumi Agung",
];

const PREFIXES: &[&str] = &[
    "Sumber", "Marg", "Tulus", "Bumi", "Sido", "Braja", "Raman", "Giri", "Banjar", "Sri",
];

const SUFFIXES: &[&str] = &[
    "Rejo", "Agung", "Mulyo", "Sari", "Makmur", "Jaya", "Baru", "Indah", "Asri", "Bhakti",
];

pub const PILOTS: &[(&str, &str, Status, f64)] = &[
    ("Braja Gemilang", "Braja Slebah", Status::Maju, 70.08),
    ("Banjar Rejo", "Batanghari", Status::Maju, 77.95),
    ("Tulus Rejo", "Pekalongan", Status::Mandiri, 86.77),
    ("Margototo", "Metro Kibang", Status::Maju, 74.65),
    ("Labuhan Ratu IX", "Labuhan Ratu", Status::Mandiri, 84.09),
    ("Raman Endra", "Raman Utara", Status::Mandiri, 83.62),
    ("Pugung Raharjo", "Sekampung Udik", Status::Mandiri, 82.36),
    ("Giri Mulyo", "Marga Sekampung", Status::Maju, 73.23),
    ("Sukadana Baru", "Marga Tiga", Status::Maju, 70.87),
    ("Sri Menanti", "Bandar Sribhawono", Status::Mandiri, 85.51),
    ("Raman Fajar", "Raman Utara", Status::Mandiri, 83.78),
    ("Bumi Mulyo", "Sekampung Udik", Status::Maju, 76.22),
];

/// Pilot villages first, then generated ones, ids assigned from 1.
/// `count` is capped at [`MAX_COUNT`].
pub fn generate_villages(count: usize, seed: u64) -> Vec<VillageRecord> {
    let count = count.min(MAX_COUNT);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(count);

    for (name, district, status, score) in PILOTS.iter().take(count) {
        let Some(id) = next_id(&out) else { break };
        out.push(create_village(&mut rng, id, name, district, *status, *score));
    }

    while out.len() < count {
        let Some(id) = next_id(&out) else { break };
        let district = DISTRICTS[rng.gen_range(0..DISTRICTS.len())];
        let mut name = format!(
            "{} {}",
            PREFIXES[rng.gen_range(0..PREFIXES.len())],
            SUFFIXES[rng.gen_range(0..SUFFIXES.len())]
        );
        if rng.gen_range(0..10) > 8 {
            name.push_str(" II");
        }

        let roll: f64 = rng.gen();
        let (status, base) = if roll > 0.85 {
            (Status::Mandiri, 82.0)
        } else if roll > 0.55 {
            (Status::Maju, 71.0)
        } else if roll > 0.15 {
            (Status::Berkembang, 55.0)
        } else {
            (Status::Tertinggal, 45.0)
        };
        let score = base + rng.gen_range(-5.0..5.0);
        out.push(create_village(&mut rng, id, &name, district, status, score));
    }

    out
}

fn next_id(out: &[VillageRecord]) -> Option<u32> {
    u32::try_from(out.len() + 1).ok()
}

fn create_village(
    rng: &mut StdRng,
    id: u32,
    name: &str,
    district: &str,
    status: Status,
    total_score: f64,
) -> VillageRecord {
    let base = total_score / 6.0;
    let mut dim = || round2((base + rng.gen_range(-10.0..10.0)).clamp(20.0, 100.0));
    let dimensions = DimensionScores {
        basic_services: dim(),
        social: dim(),
        economic: dim(),
        environmental: dim(),
        accessibility: dim(),
        governance: dim(),
    };

    let mut indicators = Indicators::default();
    for code in IndicatorCode::all() {
        let rating = match status {
            Status::Mandiri => rng.gen_range(4..=5),
            Status::Tertinggal => rng.gen_range(1..=3),
            _ => rng.gen_range(1..=5),
        };
        // ranges above stay inside 1..=5
        let _ = indicators.set(code, rating);
    }

    VillageRecord {
        id: VillageId(id),
        code: format!("1807{:06}", id),
        name: name.to_string(),
        district: district.to_string(),
        status,
        total_score: round2(total_score),
        dimensions,
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::village::model::{ensure_unique_ids, INDICATOR_COUNT};

    #[test]
    fn same_seed_same_records() {
        assert_eq!(generate_villages(50, 7), generate_villages(50, 7));
        assert_ne!(generate_villages(50, 7), generate_villages(50, 8));
    }

    #[test]
    fn pilots_come_first_with_sequential_ids() {
        let set = generate_villages(DEFAULT_COUNT, 1);
        assert_eq!(set.len(), DEFAULT_COUNT);
        assert_eq!(set[0].name, "Braja Gemilang");
        assert_eq!(set[0].code, "1807000001");
        assert_eq!(set[11].name, "Bumi Mulyo");
        assert_eq!(set[263].id, VillageId(264));
        ensure_unique_ids(&set).unwrap();
    }

    #[test]
    fn generated_values_stay_in_range() {
        for r in generate_villages(120, 42) {
            assert_eq!(r.indicators.len(), INDICATOR_COUNT);
            for (_, v) in r.dimensions.iter() {
                assert!((20.0..=100.0).contains(&v));
            }
            assert!((0.0..=100.0).contains(&r.total_score));
            if r.status == Status::Mandiri {
                assert!(r.indicators.iter().all(|(_, v)| v >= 4));
            }
        }
    }

    #[test]
    fn short_counts_truncate_pilots() {
        let set = generate_villages(3, 0);
        assert_eq!(set.len(), 3);
        assert_eq!(set[2].name, "Tulus Rejo");
    }

    #[test]
    fn oversized_counts_are_capped() {
        let set = generate_villages(usize::MAX, 8);
        assert_eq!(set.len(), MAX_COUNT);
        assert_eq!(set.last().map(|r| r.id), Some(VillageId(MAX_COUNT as u32)));
    }
}
