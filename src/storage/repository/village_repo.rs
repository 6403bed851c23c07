use crate::storage::entity::village::{
    self, ActiveModel as VillageActiveModel, Entity as Village, Model as VillageModel,
};
use crate::village::{ModelError, Status, VillageId, VillageRecord};
use chrono::Utc;
use log::warn;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use std::collections::HashSet;

const INSERT_CHUNK: usize = 100;

#[derive(thiserror::Error, Debug)]
pub enum RecordDecodeError {
    #[error("id {0} does not fit a village id")]
    Id(i64),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("invalid {column}: {source}")]
    Json {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TryFrom<VillageModel> for VillageRecord {
    type Error = RecordDecodeError;

    fn try_from(model: VillageModel) -> Result<Self, Self::Error> {
        let id = u32::try_from(model.id).map_err(|_| RecordDecodeError::Id(model.id))?;
        let dimensions = serde_json::from_str(&model.dimensions_json).map_err(|source| {
            RecordDecodeError::Json {
                column: "dimensions_json",
                source,
            }
        })?;
        let indicators = serde_json::from_str(&model.indicators_json).map_err(|source| {
            RecordDecodeError::Json {
                column: "indicators_json",
                source,
            }
        })?;

        Ok(VillageRecord {
            id: VillageId(id),
            code: model.code,
            name: model.name,
            district: model.district,
            status: model.status.parse::<Status>()?,
            total_score: model.total_score,
            dimensions,
            indicators,
        })
    }
}

fn to_active_model(record: &VillageRecord, now: i64) -> Result<VillageActiveModel, DbErr> {
    let dimensions_json =
        serde_json::to_string(&record.dimensions).map_err(|e| DbErr::Custom(e.to_string()))?;
    let indicators_json =
        serde_json::to_string(&record.indicators).map_err(|e| DbErr::Custom(e.to_string()))?;

    Ok(VillageActiveModel {
        id: Set(i64::from(record.id.0)),
        code: Set(record.code.clone()),
        name: Set(record.name.clone()),
        district: Set(record.district.clone()),
        status: Set(record.status.label().to_string()),
        total_score: Set(record.total_score),
        dimensions_json: Set(dimensions_json),
        indicators_json: Set(indicators_json),
        created_at: Set(now),
    })
}

pub struct VillageRepository;

impl VillageRepository {
    /// All decodable rows ordered by id. Broken rows are logged and skipped.
    pub async fn load_all(db: &DatabaseConnection) -> Result<Vec<VillageRecord>, DbErr> {
        let models = Village::find()
            .order_by_asc(village::Column::Id)
            .all(db)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let id = model.id;
            match VillageRecord::try_from(model) {
                Ok(record) => out.push(record),
                Err(e) => warn!("skipping village row {}: {}", id, e),
            }
        }
        Ok(out)
    }

    /// Inserts records whose id is not stored yet; returns how many were added.
    pub async fn insert_missing(
        db: &DatabaseConnection,
        records: &[VillageRecord],
    ) -> Result<usize, DbErr> {
        if records.is_empty() {
            return Ok(0);
        }

        let existing: HashSet<i64> = Village::find()
            .select_only()
            .column(village::Column::Id)
            .into_tuple::<i64>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let now = Utc::now().timestamp();
        let mut seen = HashSet::new();
        let mut to_insert = Vec::new();
        for record in records {
            let id = i64::from(record.id.0);
            if existing.contains(&id) || !seen.insert(id) {
                continue;
            }
            to_insert.push(to_active_model(record, now)?);
        }

        let inserted = to_insert.len();
        for chunk in to_insert.chunks(INSERT_CHUNK) {
            Village::insert_many(chunk.to_vec()).exec(db).await?;
        }
        Ok(inserted)
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Village::find().count(db).await
    }

    pub async fn clear(db: &DatabaseConnection) -> Result<u64, DbErr> {
        let res = Village::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}
