use sea_orm::{entity::prelude::*, sea_query::OnConflict, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Matches the column width in the migration.
pub const MAX_KEY_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_key")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub key: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_key(key: &str) -> Result<(), errors::ModelError> {
    if key.trim().is_empty() {
        return Err(errors::ModelError::Validation("key must not be empty".into()));
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(errors::ModelError::Validation(format!("key longer than {MAX_KEY_LEN} characters")));
    }
    Ok(())
}

/// Insert unless the key already exists; `Ok(true)` when a row was written.
/// Concurrent inserts of the same key resolve on the unique index without error.
pub async fn insert_if_absent<C: ConnectionTrait>(db: &C, key: &str) -> Result<bool, errors::ModelError> {
    validate_key(key)?;
    let am = ActiveModel {
        key: Set(key.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Key).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(inserted == 1)
}

pub async fn find_by_key<C: ConnectionTrait>(db: &C, key: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Key.eq(key)).one(db).await?)
}

/// Delete by key value; returns the number of rows removed.
pub async fn delete_by_key<C: ConnectionTrait>(db: &C, key: &str) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many().filter(Column::Key.eq(key)).exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn list_keys<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, errors::ModelError> {
    let rows = Entity::find().order_by_asc(Column::Key).all(db).await?;
    Ok(rows.into_iter().map(|m| m.key).collect())
}
