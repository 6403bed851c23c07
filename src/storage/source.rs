use crate::storage::repository::VillageRepository;
use crate::village::VillageRecord;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

/// Supplies the full record set in one go.
#[async_trait]
pub trait VillageSource: Send + Sync {
    async fn load(&self) -> Result<Vec<VillageRecord>, SourceError>;
}

pub struct DatabaseSource {
    db: Arc<DatabaseConnection>,
}

impl DatabaseSource {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VillageSource for DatabaseSource {
    async fn load(&self) -> Result<Vec<VillageRecord>, SourceError> {
        Ok(VillageRepository::load_all(&self.db).await?)
    }
}
