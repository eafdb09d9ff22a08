//! PostgreSQL plan store

use chrono::{DateTime, Utc};
use shared::{CropDefinition, CultivationPlan, NewPlan, PlanCropEntry};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{CustomCropStore, PlanEdit, PlanRepository};
use crate::error::{AppError, AppResult};

/// Plan repository backed by the `cultivation_plans` table
#[derive(Clone)]
pub struct PgPlanRepository {
    db: PgPool,
}

/// Plan row. Crops live in a JSONB column in display order.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: Option<String>,
    crops: Json<Vec<PlanCropEntry>>,
    is_primary: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlanRow> for CultivationPlan {
    fn from(row: PlanRow) -> Self {
        CultivationPlan {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            crops: row.crops.0,
            is_primary: row.is_primary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PLAN_COLUMNS: &str =
    "id, owner_id, name, description, crops, is_primary, created_at, updated_at";

/// A second primary plan for the same owner trips the partial unique index
fn map_primary_conflict(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => AppError::Conflict {
            resource: "plan".to_string(),
            message: "Another plan was made primary at the same time".to_string(),
        },
        _ => AppError::DatabaseError(error),
    }
}

impl PgPlanRepository {
    /// Create a new PgPlanRepository instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl PlanRepository for PgPlanRepository {
    async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<CultivationPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM cultivation_plans
            WHERE owner_id = $1
            ORDER BY is_primary DESC, created_at ASC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CultivationPlan::from).collect())
    }

    async fn get_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM cultivation_plans WHERE id = $1 AND owner_id = $2"
        ))
        .bind(plan_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan".to_string()))?;

        Ok(row.into())
    }

    async fn create_plan(&self, owner_id: Uuid, plan: NewPlan) -> AppResult<CultivationPlan> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            INSERT INTO cultivation_plans (owner_id, name, description, crops, is_primary)
            VALUES ($1, $2, $3, '[]'::jsonb,
                    NOT EXISTS (SELECT 1 FROM cultivation_plans WHERE owner_id = $1))
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(plan.name.trim())
        .bind(&plan.description)
        .fetch_one(&self.db)
        .await
        .map_err(map_primary_conflict)?;

        Ok(row.into())
    }

    async fn modify_plan(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        edit: PlanEdit<'_>,
    ) -> AppResult<CultivationPlan> {
        // Dropping the transaction on an early return rolls it back
        let mut tx = self.db.begin().await?;

        let mut plan: CultivationPlan = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM cultivation_plans WHERE id = $1 AND owner_id = $2 FOR UPDATE"
        ))
        .bind(plan_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan".to_string()))?
        .into();

        edit(&mut plan)?;

        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            UPDATE cultivation_plans
            SET name = $1, description = $2, crops = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(Json(&plan.crops))
        .bind(plan_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn delete_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cultivation_plans WHERE id = $1 AND owner_id = $2")
            .bind(plan_id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plan".to_string()));
        }

        Ok(())
    }

    async fn set_primary_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM cultivation_plans WHERE id = $1 AND owner_id = $2",
        )
        .bind(plan_id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Plan".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE cultivation_plans
            SET is_primary = FALSE, updated_at = NOW()
            WHERE owner_id = $1 AND is_primary AND id <> $2
            "#,
        )
        .bind(owner_id)
        .bind(plan_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            UPDATE cultivation_plans
            SET is_primary = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(plan_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_primary_conflict)?;

        tx.commit().await?;

        Ok(row.into())
    }

    fn storage_kind(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CustomCropStore for PgPlanRepository {
    async fn load_custom_crops(&self) -> AppResult<Vec<CropDefinition>> {
        let rows = sqlx::query_scalar::<_, Json<CropDefinition>>(
            "SELECT definition FROM custom_crops ORDER BY created_at ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn save_custom_crop(&self, crop: &CropDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO custom_crops (id, display_name, definition)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET display_name = EXCLUDED.display_name, definition = EXCLUDED.definition
            "#,
        )
        .bind(&crop.id)
        .bind(&crop.display_name)
        .bind(Json(crop))
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
