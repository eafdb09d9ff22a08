//! Plan persistence
//!
//! The planner talks to storage through [`PlanRepository`]. PostgreSQL backs
//! it in production; the in-memory store serves local runs and tests.

mod memory;
mod postgres;

pub use memory::MemoryPlanRepository;
pub use postgres::PgPlanRepository;

use shared::{CropDefinition, CultivationPlan, NewPlan, PlanUpdate};
use uuid::Uuid;

use crate::error::AppResult;

/// In-place change to a stored plan. An error leaves the plan untouched.
pub type PlanEdit<'a> = Box<dyn FnOnce(&mut CultivationPlan) -> AppResult<()> + Send + 'a>;

/// Storage port for cultivation plans.
///
/// Missing or foreign plans yield `AppError::NotFound`; storage failures
/// yield `AppError::DatabaseError`.
#[async_trait::async_trait]
pub trait PlanRepository: Send + Sync {
    /// All plans of an owner, primary plan first, then oldest first
    async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<CultivationPlan>>;

    async fn get_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan>;

    /// Create an empty plan. It becomes primary iff it is the owner's first.
    async fn create_plan(&self, owner_id: Uuid, plan: NewPlan) -> AppResult<CultivationPlan>;

    /// Run `edit` against the stored plan and persist the result. No other
    /// write to the same plan can interleave between the read and the write.
    async fn modify_plan(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        edit: PlanEdit<'_>,
    ) -> AppResult<CultivationPlan>;

    /// Merge the present fields of `update` into the plan
    async fn update_plan(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        update: PlanUpdate,
    ) -> AppResult<CultivationPlan> {
        self.modify_plan(
            owner_id,
            plan_id,
            Box::new(move |plan: &mut CultivationPlan| -> AppResult<()> {
                plan.apply(update);
                Ok(())
            }),
        )
        .await
    }

    async fn delete_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<()>;

    /// Mark a plan primary and unmark the previous one in a single step
    async fn set_primary_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan>;

    /// Short name of the storage backend, reported by the health check
    fn storage_kind(&self) -> &'static str;

    /// Check that storage is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Storage port for crops registered through the custom crop lookup
#[async_trait::async_trait]
pub trait CustomCropStore: Send + Sync {
    async fn load_custom_crops(&self) -> AppResult<Vec<CropDefinition>>;

    async fn save_custom_crop(&self, crop: &CropDefinition) -> AppResult<()>;
}
