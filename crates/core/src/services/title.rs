//! Title catalog management.
//!
//! Read endpoints return titles hydrated with their category, genres and the
//! derived rating. Writes accept category and genres as slugs and resolve
//! them before touching the title row.

use chrono::{Datelike, Utc};
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_common::{AppError, AppResult, IdGenerator};
use yamdb_db::{
    entities::{category, genre, title, user},
    repositories::{CategoryRepository, GenreRepository, ReviewRepository, TitleQuery, TitleRepository},
};

use crate::services::{policy, rating};

/// Title create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTitleInput {
    /// Display name.
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    /// Release year, must not lie in the future.
    pub year: i16,
    /// Optional description.
    pub description: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Genre slugs.
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Title update request. Absent fields are left unchanged; a present
/// `genre` list replaces the whole genre set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTitleInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

/// Filter parameters for listing titles, all by value as they arrive from
/// the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleListQuery {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Name substring.
    pub name: Option<String>,
    /// Exact year.
    pub year: Option<i16>,
}

/// A title hydrated for read responses.
#[derive(Debug, Clone, Serialize)]
pub struct TitleWithRating {
    /// The title row.
    pub title: title::Model,
    /// Resolved category, if any.
    pub category: Option<category::Model>,
    /// Attached genres.
    pub genres: Vec<genre::Model>,
    /// Mean review score, `None` when unreviewed.
    pub rating: Option<f64>,
}

/// Title service.
#[derive(Clone)]
pub struct TitleService {
    title_repo: TitleRepository,
    category_repo: CategoryRepository,
    genre_repo: GenreRepository,
    review_repo: ReviewRepository,
    id_gen: IdGenerator,
}

impl TitleService {
    /// Create a new title service.
    #[must_use]
    pub fn new(
        title_repo: TitleRepository,
        category_repo: CategoryRepository,
        genre_repo: GenreRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            title_repo,
            category_repo,
            genre_repo,
            review_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List titles matching the filter. Open to everyone.
    ///
    /// Unknown category or genre slugs in the filter simply match nothing.
    pub async fn list(
        &self,
        query: &TitleListQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<TitleWithRating>> {
        let mut filter = TitleQuery {
            name: query.name.clone(),
            year: query.year,
            ..Default::default()
        };

        if let Some(ref slug) = query.category {
            match self.category_repo.find_by_slug(slug).await? {
                Some(cat) => filter.category_id = Some(cat.id),
                None => return Ok(vec![]),
            }
        }

        if let Some(ref slug) = query.genre {
            match self.genre_repo.find_by_slug(slug).await? {
                Some(g) => filter.genre_id = Some(g.id),
                None => return Ok(vec![]),
            }
        }

        let titles = self.title_repo.list(&filter, limit, offset).await?;

        let mut hydrated = Vec::with_capacity(titles.len());
        for t in titles {
            hydrated.push(self.hydrate(t).await?);
        }
        Ok(hydrated)
    }

    /// Fetch a single title with rating. Open to everyone.
    pub async fn get(&self, id: &str) -> AppResult<TitleWithRating> {
        let t = self.title_repo.get_by_id(id).await?;
        self.hydrate(t).await
    }

    /// Create a title (admin only).
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateTitleInput,
    ) -> AppResult<TitleWithRating> {
        if !policy::can_manage_catalog(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage the catalog".to_string(),
            ));
        }
        input.validate()?;
        Self::check_year(input.year)?;

        let category = match input.category {
            Some(ref slug) => Some(self.resolve_category(slug).await?),
            None => None,
        };
        let genres = self.resolve_genres(&input.genre).await?;

        let model = title::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            year: Set(input.year),
            description: Set(input.description),
            category_id: Set(category.as_ref().map(|c| c.id.clone())),
            ..Default::default()
        };

        let created = self.title_repo.create(model).await?;
        let genre_ids: Vec<String> = genres.iter().map(|g| g.id.clone()).collect();
        self.title_repo.set_genres(&created.id, &genre_ids).await?;

        tracing::info!(title_id = %created.id, name = %created.name, "Created title");

        Ok(TitleWithRating {
            title: created,
            category,
            genres,
            rating: None,
        })
    }

    /// Update a title (admin only).
    pub async fn update(
        &self,
        actor: &user::Model,
        id: &str,
        input: UpdateTitleInput,
    ) -> AppResult<TitleWithRating> {
        if !policy::can_manage_catalog(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage the catalog".to_string(),
            ));
        }
        input.validate()?;
        if let Some(year) = input.year {
            Self::check_year(year)?;
        }

        let existing = self.title_repo.get_by_id(id).await?;
        let mut model = existing.into_active_model();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(year) = input.year {
            model.year = Set(year);
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }
        if let Some(ref slug) = input.category {
            let cat = self.resolve_category(slug).await?;
            model.category_id = Set(Some(cat.id));
        }

        let updated = self.title_repo.update(model).await?;

        if let Some(ref slugs) = input.genre {
            let genres = self.resolve_genres(slugs).await?;
            let genre_ids: Vec<String> = genres.iter().map(|g| g.id.clone()).collect();
            self.title_repo.set_genres(&updated.id, &genre_ids).await?;
        }

        self.hydrate(updated).await
    }

    /// Delete a title (admin only). Its reviews and their comments cascade.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<()> {
        if !policy::can_manage_catalog(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage the catalog".to_string(),
            ));
        }

        let existing = self.title_repo.get_by_id(id).await?;
        self.title_repo.delete(existing).await?;
        tracing::info!(title_id = %id, "Deleted title");
        Ok(())
    }

    fn check_year(year: i16) -> AppResult<()> {
        let current = i16::try_from(Utc::now().year()).unwrap_or(i16::MAX);
        if year > current {
            return Err(AppError::Validation(format!(
                "Year {year} lies in the future"
            )));
        }
        Ok(())
    }

    async fn resolve_category(&self, slug: &str) -> AppResult<category::Model> {
        self.category_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown category slug: {slug}")))
    }

    async fn resolve_genres(&self, slugs: &[String]) -> AppResult<Vec<genre::Model>> {
        // Repeated slugs collapse to a single association.
        let mut unique: Vec<String> = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if !unique.contains(slug) {
                unique.push(slug.clone());
            }
        }

        let genres = self.genre_repo.find_by_slugs(&unique).await?;
        if genres.len() != unique.len() {
            let found: Vec<&str> = genres.iter().map(|g| g.slug.as_str()).collect();
            let missing: Vec<&str> = unique
                .iter()
                .map(String::as_str)
                .filter(|s| !found.contains(s))
                .collect();
            return Err(AppError::Validation(format!(
                "Unknown genre slugs: {}",
                missing.join(", ")
            )));
        }
        Ok(genres)
    }

    async fn hydrate(&self, t: title::Model) -> AppResult<TitleWithRating> {
        let scores = self.review_repo.scores_for_title(&t.id).await?;
        let rating = rating::rating_of(&scores);

        let category = match t.category_id {
            Some(ref category_id) => self.category_repo.find_by_id(category_id).await?,
            None => None,
        };

        let genres = self.title_repo.genres_for(&t).await?;

        Ok(TitleWithRating {
            title: t,
            category,
            genres,
            rating,
        })
    }
}
