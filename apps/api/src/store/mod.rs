//! Persistent Prompt Store: the durable collection of saved prompts.
//!
//! The store is the only writer to the `saved_prompts` table. Each logical
//! operation is a single statement (SQLite runs it in its own implicit
//! transaction); an import batch is wrapped in one explicit transaction.
//! Failures are surfaced as `AppError::Storage` and never retried here.

pub mod handlers;
pub mod transfer;

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Sqlite, SqlitePool};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::saved_prompt::{NewSavedPrompt, SavedPrompt, SavedPromptRow};
use crate::store::transfer::{parse_import, ImportReport};

const SELECT_COLUMNS: &str = "SELECT id, timestamp, name, framework_id, category, components, \
     free_text, generated_prompt, prompt_to_copy, language, display_name, notes \
     FROM saved_prompts";

#[derive(Clone)]
pub struct PromptStore {
    pool: SqlitePool,
}

impl PromptStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new saved prompt and returns the id assigned by the database.
    pub async fn add(&self, prompt: &NewSavedPrompt) -> Result<i64, AppError> {
        let id = insert(&self.pool, prompt, Utc::now()).await?;
        info!("Saved prompt {id} ('{}')", prompt.name);
        Ok(id)
    }

    /// All saved prompts, newest first. Rows that cannot be decoded are skipped.
    pub async fn get_all(&self) -> Result<Vec<SavedPrompt>, AppError> {
        let rows = sqlx::query_as::<_, SavedPromptRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        let mut prompts: Vec<SavedPrompt> = rows
            .into_iter()
            .filter_map(|row| match SavedPrompt::try_from(row) {
                Ok(prompt) => Some(prompt),
                Err(e) => {
                    warn!("Skipping unreadable saved prompt: {e}");
                    None
                }
            })
            .collect();

        // Sorted here rather than in SQL: the stored timestamp text does not
        // have a fixed number of fractional digits.
        prompts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(prompts)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<SavedPrompt>, AppError> {
        let row = sqlx::query_as::<_, SavedPromptRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SavedPrompt::try_from).transpose()
    }

    /// Overwrites every field of an existing prompt and refreshes its timestamp.
    pub async fn update(&self, prompt: &SavedPrompt) -> Result<SavedPrompt, AppError> {
        let timestamp = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE saved_prompts
            SET timestamp = ?, name = ?, framework_id = ?, category = ?, components = ?,
                free_text = ?, generated_prompt = ?, prompt_to_copy = ?, language = ?,
                display_name = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(timestamp)
        .bind(&prompt.name)
        .bind(&prompt.framework_id)
        .bind(prompt.category.as_str())
        .bind(Json(&prompt.components))
        .bind(&prompt.free_text)
        .bind(&prompt.generated_prompt)
        .bind(&prompt.prompt_to_copy)
        .bind(prompt.language.as_str())
        .bind(&prompt.display_name)
        .bind(&prompt.notes)
        .bind(prompt.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Saved prompt {} not found", prompt.id)));
        }

        Ok(SavedPrompt {
            timestamp,
            ..prompt.clone()
        })
    }

    /// Deletes by id. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM saved_prompts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let removed = result.rows_affected() > 0;
        if removed {
            info!("Deleted saved prompt {id}");
        }
        Ok(removed)
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<SavedPrompt, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name must not be empty".to_string()));
        }
        let existing = self.require(id).await?;
        self.update(&SavedPrompt {
            name: name.to_string(),
            ..existing
        })
        .await
    }

    pub async fn update_notes(&self, id: i64, notes: Option<String>) -> Result<SavedPrompt, AppError> {
        let existing = self.require(id).await?;
        let notes = notes.filter(|n| !n.trim().is_empty());
        self.update(&SavedPrompt { notes, ..existing }).await
    }

    /// The full collection as one pretty-printed JSON array.
    pub async fn export_json(&self) -> Result<String, AppError> {
        let prompts = self.get_all().await?;
        Ok(serde_json::to_string_pretty(&prompts)?)
    }

    /// Writes the export document to `path`; returns the number of prompts written.
    pub async fn export_to_file(&self, path: &Path) -> Result<usize, AppError> {
        let prompts = self.get_all().await?;
        let document = serde_json::to_string_pretty(&prompts)?;
        tokio::fs::write(path, document).await?;
        info!("Exported {} prompts to {}", prompts.len(), path.display());
        Ok(prompts.len())
    }

    /// Inserts every valid record of a JSON array as a new prompt. Invalid records
    /// are reported in the result and do not abort the batch.
    pub async fn import_json(&self, raw: &str) -> Result<ImportReport, AppError> {
        let (records, skipped) = parse_import(raw)?;
        let timestamp = Utc::now();

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(records.len());
        for record in &records {
            ids.push(insert(&mut *tx, record, timestamp).await?);
        }
        tx.commit().await?;

        for skip in &skipped {
            warn!("Import skipped record {}: {}", skip.index, skip.reason);
        }
        info!(
            "Imported {} prompts ({} skipped)",
            ids.len(),
            skipped.len()
        );

        Ok(ImportReport {
            imported: ids.len(),
            ids,
            skipped,
        })
    }

    pub async fn import_from_file(&self, path: &Path) -> Result<ImportReport, AppError> {
        let raw = tokio::fs::read_to_string(path).await?;
        self.import_json(&raw).await
    }

    async fn require(&self, id: i64) -> Result<SavedPrompt, AppError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Saved prompt {id} not found")))
    }
}

async fn insert<'e, E>(
    executor: E,
    prompt: &NewSavedPrompt,
    timestamp: DateTime<Utc>,
) -> Result<i64, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO saved_prompts
            (timestamp, name, framework_id, category, components, free_text,
             generated_prompt, prompt_to_copy, language, display_name, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(timestamp)
    .bind(&prompt.name)
    .bind(&prompt.framework_id)
    .bind(prompt.category.as_str())
    .bind(Json(&prompt.components))
    .bind(&prompt.free_text)
    .bind(&prompt.generated_prompt)
    .bind(&prompt.prompt_to_copy)
    .bind(prompt.language.as_str())
    .bind(&prompt.display_name)
    .bind(&prompt.notes)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}
