use crate::village::catalog;
use crate::village::{Dimension, IndicatorCode, VillageRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorEntry {
    pub code: IndicatorCode,
    pub label: String,
    /// `None` when the record carries no rating for this code.
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorGroup {
    pub dimension: Dimension,
    pub entries: Vec<IndicatorEntry>,
}

/// Drill-down payload for the expanded row.
#[derive(Debug, Clone, PartialEq)]
pub struct VillageDetail<'a> {
    pub record: &'a VillageRecord,
    pub dimensions: Vec<(Dimension, f64)>,
    pub groups: Vec<IndicatorGroup>,
    /// Rated indicators outside every group, in code order.
    pub ungrouped: Vec<IndicatorEntry>,
}

impl<'a> VillageDetail<'a> {
    pub fn for_record(record: &'a VillageRecord) -> Self {
        let groups = Dimension::ALL
            .into_iter()
            .map(|dimension| IndicatorGroup {
                dimension,
                entries: catalog::group_members(dimension)
                    .into_iter()
                    .map(|code| IndicatorEntry {
                        code,
                        label: catalog::indicator_label(code),
                        rating: record.indicators.get(code),
                    })
                    .collect(),
            })
            .collect();

        let ungrouped = record
            .indicators
            .iter()
            .filter(|(code, _)| !catalog::is_grouped(*code))
            .map(|(code, rating)| IndicatorEntry {
                code,
                label: catalog::indicator_label(code),
                rating: Some(rating),
            })
            .collect();

        VillageDetail {
            record,
            dimensions: record.dimensions.iter().collect(),
            groups,
            ungrouped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::village::fixture::generate_villages;
    use crate::village::model::Indicators;

    #[test]
    fn detail_lists_six_dimensions_and_six_groups() {
        let set = generate_villages(1, 3);
        let d = VillageDetail::for_record(&set[0]);
        assert_eq!(d.dimensions.len(), 6);
        assert_eq!(d.groups.len(), 6);
        assert_eq!(d.groups[0].dimension, Dimension::BasicServices);
        assert_eq!(d.groups[0].entries.len(), 7);
        assert_eq!(d.groups[4].entries[0].code.to_string(), "I.38");
        assert!(d
            .groups
            .iter()
            .flat_map(|g| &g.entries)
            .all(|e| e.rating.is_some()));
    }

    #[test]
    fn missing_ratings_stay_absent() {
        let mut rec = generate_villages(1, 3).remove(0);
        rec.indicators = Indicators::default();
        let d = VillageDetail::for_record(&rec);
        assert!(d
            .groups
            .iter()
            .flat_map(|g| &g.entries)
            .all(|e| e.rating.is_none()));
        assert_eq!(d.groups[5].entries[3].label, "Inovasi/PADes");
        assert!(d.ungrouped.is_empty());
    }

    #[test]
    fn ratings_outside_the_groups_get_generic_labels() {
        let set = generate_villages(1, 3);
        let d = VillageDetail::for_record(&set[0]);
        assert_eq!(d.ungrouped.len(), 26);
        let first = &d.ungrouped[0];
        assert_eq!(first.code.to_string(), "I.04");
        assert_eq!(first.label, "Indikator I.04");
        assert_eq!(first.rating, set[0].indicators.get(first.code));
        assert_eq!(d.ungrouped[25].code.to_string(), "I.48");
    }
}
