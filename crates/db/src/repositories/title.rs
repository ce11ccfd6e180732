//! Title repository.

use std::sync::Arc;

use crate::entities::{genre, genre_title, title, GenreTitle, Title};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use yamdb_common::{AppError, AppResult, IdGenerator};

/// Filter for listing titles. All fields are optional and combined with AND.
#[derive(Debug, Clone, Default)]
pub struct TitleQuery {
    /// Filter by resolved category ID.
    pub category_id: Option<String>,
    /// Filter by resolved genre ID (via the association table).
    pub genre_id: Option<String>,
    /// Filter by name substring.
    pub name: Option<String>,
    /// Filter by exact year.
    pub year: Option<i16>,
}

/// Title repository for database operations.
#[derive(Clone)]
pub struct TitleRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl TitleRepository {
    /// Create a new title repository.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a title by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<title::Model>> {
        Title::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a title by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<title::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TitleNotFound(id.to_string()))
    }

    /// Check whether a title exists.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Create a new title.
    pub async fn create(&self, model: title::ActiveModel) -> AppResult<title::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a title.
    pub async fn update(&self, model: title::ActiveModel) -> AppResult<title::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a title. Reviews (and their comments) cascade.
    pub async fn delete(&self, model: title::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List titles matching the filter (paginated, newest year first).
    pub async fn list(
        &self,
        filter: &TitleQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<title::Model>> {
        let mut query = Title::find()
            .order_by_desc(title::Column::Year)
            .order_by_asc(title::Column::Id);

        if let Some(ref category_id) = filter.category_id {
            query = query.filter(title::Column::CategoryId.eq(category_id));
        }

        if let Some(ref genre_id) = filter.genre_id {
            query = query
                .join(JoinType::InnerJoin, title::Relation::GenreTitles.def())
                .filter(genre_title::Column::GenreId.eq(genre_id));
        }

        if let Some(ref name) = filter.name {
            query = query.filter(title::Column::Name.contains(name));
        }

        if let Some(year) = filter.year {
            query = query.filter(title::Column::Year.eq(year));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Genres attached to a title.
    pub async fn genres_for(&self, title: &title::Model) -> AppResult<Vec<genre::Model>> {
        title
            .find_related(crate::entities::Genre)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace the genre set of a title with the given genre IDs.
    ///
    /// Delete and re-insert run in one transaction so a failure cannot leave
    /// the title with its genre set wiped.
    pub async fn set_genres(&self, title_id: &str, genre_ids: &[String]) -> AppResult<()> {
        let rows: Vec<genre_title::ActiveModel> = genre_ids
            .iter()
            .map(|genre_id| genre_title::ActiveModel {
                id: Set(self.id_gen.generate()),
                title_id: Set(title_id.to_string()),
                genre_id: Set(genre_id.clone()),
            })
            .collect();
        let title_id = title_id.to_string();

        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    GenreTitle::delete_many()
                        .filter(genre_title::Column::TitleId.eq(&title_id))
                        .exec(txn)
                        .await?;

                    if !rows.is_empty() {
                        GenreTitle::insert_many(rows).exec(txn).await?;
                    }

                    Ok(())
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
