//! PostgREST-style HTTP implementation of [`RemoteStore`].
//!
//! Tables live under `{base_url}/rest/v1/{table}`. Requests carry the
//! project API key and the user's bearer token; row-level filtering by
//! `user_id` is always added explicitly.

use dreamshape_core::models::exercise::CatalogEntry;
use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::models::workout::WorkoutLog;
use dreamshape_core::storage_keys::table;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::StorageError;
use crate::remote::{BoxFuture, RemoteStore};
use crate::rows::{CustomExerciseRow, ProfileRow, TemplateRow, WorkoutRow};

#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: String,
    user_id: Uuid,
}

type Filters = Vec<(&'static str, String)>;

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

impl RestStore {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: &str,
        access_token: &str,
        user_id: Uuid,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.to_string(),
            user_id,
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{table}", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
    }

    fn owned(&self) -> Filters {
        vec![("user_id", eq(self.user_id))]
    }

    async fn check(table: &str, resp: Response) -> Result<Response, StorageError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorageError::Unauthorized(body));
        }
        Err(StorageError::Status {
            table: table.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        mut filters: Filters,
        order: &str,
    ) -> Result<Vec<T>, StorageError> {
        filters.push(("select", "*".to_string()));
        filters.push(("order", order.to_string()));
        let resp = self
            .request(Method::GET, table)
            .query(&filters)
            .send()
            .await?;
        let rows = Self::check(table, resp).await?.json::<Vec<T>>().await?;
        tracing::debug!(table, count = rows.len(), "remote select");
        Ok(rows)
    }

    /// Insert one row. An existing row with the same key is left as is.
    async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StorageError> {
        let resp = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        if resp.status() == StatusCode::CONFLICT {
            tracing::debug!(table, "row already exists, skipping insert");
            return Ok(());
        }
        Self::check(table, resp).await?;
        Ok(())
    }

    async fn update<T: Serialize>(
        &self,
        table: &str,
        filters: Filters,
        body: &T,
    ) -> Result<(), StorageError> {
        let resp = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=minimal")
            .query(&filters)
            .json(body)
            .send()
            .await?;
        Self::check(table, resp).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, filters: Filters) -> Result<(), StorageError> {
        let resp = self
            .request(Method::DELETE, table)
            .query(&filters)
            .send()
            .await?;
        Self::check(table, resp).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ProfilePatch<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct TemplatePatch<'a> {
    name: &'a str,
    exercises: &'a [dreamshape_core::models::exercise::TemplateExercise],
    notes: Option<&'a str>,
}

impl RemoteStore for RestStore {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn fetch_profile(&self) -> BoxFuture<'_, Result<Option<UserProfile>, StorageError>> {
        Box::pin(async move {
            let rows: Vec<ProfileRow> = self
                .select(table::PROFILES, vec![("id", eq(self.user_id))], "id")
                .await?;
            Ok(rows.into_iter().next().map(UserProfile::from))
        })
    }

    fn update_profile(&self, profile: UserProfile) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.update(
                table::PROFILES,
                vec![("id", eq(self.user_id))],
                &ProfilePatch {
                    name: &profile.name,
                },
            )
            .await
        })
    }

    fn list_templates(&self) -> BoxFuture<'_, Result<Vec<WorkoutTemplate>, StorageError>> {
        Box::pin(async move {
            let rows: Vec<TemplateRow> = self
                .select(table::TEMPLATES, self.owned(), "created_at.desc")
                .await?;
            Ok(rows.into_iter().map(WorkoutTemplate::from).collect())
        })
    }

    fn insert_template(
        &self,
        template: WorkoutTemplate,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let row = TemplateRow::new(self.user_id, template);
            self.insert(table::TEMPLATES, &row).await
        })
    }

    fn update_template(
        &self,
        template: WorkoutTemplate,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut filters = self.owned();
            filters.push(("id", eq(template.id)));
            let patch = TemplatePatch {
                name: &template.name,
                exercises: &template.exercises,
                notes: template.notes.as_deref(),
            };
            self.update(table::TEMPLATES, filters, &patch).await
        })
    }

    fn delete_template(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut filters = self.owned();
            filters.push(("id", eq(id)));
            self.delete(table::TEMPLATES, filters).await
        })
    }

    fn list_workouts(&self) -> BoxFuture<'_, Result<Vec<WorkoutLog>, StorageError>> {
        Box::pin(async move {
            let rows: Vec<WorkoutRow> = self
                .select(table::WORKOUTS, self.owned(), "date.desc")
                .await?;
            Ok(rows.into_iter().map(WorkoutLog::from).collect())
        })
    }

    fn insert_workout(&self, log: WorkoutLog) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let row = WorkoutRow::new(self.user_id, log);
            self.insert(table::WORKOUTS, &row).await
        })
    }

    fn delete_workout(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut filters = self.owned();
            filters.push(("id", eq(id)));
            self.delete(table::WORKOUTS, filters).await
        })
    }

    fn list_custom_exercises(&self) -> BoxFuture<'_, Result<Vec<CatalogEntry>, StorageError>> {
        Box::pin(async move {
            let rows: Vec<CustomExerciseRow> = self
                .select(table::CUSTOM_EXERCISES, self.owned(), "name")
                .await?;
            Ok(rows.into_iter().map(CatalogEntry::from).collect())
        })
    }

    fn insert_custom_exercise(
        &self,
        entry: CatalogEntry,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let row = CustomExerciseRow::new(self.user_id, entry);
            self.insert(table::CUSTOM_EXERCISES, &row).await
        })
    }

    fn delete_custom_exercise(&self, name: String) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut filters = self.owned();
            filters.push(("name", eq(&name)));
            self.delete(table::CUSTOM_EXERCISES, filters).await
        })
    }
}
