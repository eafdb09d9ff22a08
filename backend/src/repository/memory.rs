//! In-memory plan store

use shared::{CropDefinition, CultivationPlan, NewPlan};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CustomCropStore, PlanEdit, PlanRepository};
use crate::error::{AppError, AppResult};

/// Plan repository held in process memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryPlanRepository {
    /// Insertion ordered
    plans: RwLock<Vec<CultivationPlan>>,
    custom_crops: RwLock<Vec<CropDefinition>>,
}

impl MemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Plan".to_string())
}

#[async_trait::async_trait]
impl PlanRepository for MemoryPlanRepository {
    async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<CultivationPlan>> {
        let plans = self.plans.read().await;
        let mut owned: Vec<CultivationPlan> = plans
            .iter()
            .filter(|plan| plan.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|plan| !plan.is_primary);
        Ok(owned)
    }

    async fn get_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan> {
        let plans = self.plans.read().await;
        plans
            .iter()
            .find(|plan| plan.id == plan_id && plan.owner_id == owner_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_plan(&self, owner_id: Uuid, plan: NewPlan) -> AppResult<CultivationPlan> {
        let mut plans = self.plans.write().await;
        let is_first = !plans.iter().any(|existing| existing.owner_id == owner_id);
        let created = CultivationPlan::new(owner_id, plan, is_first);
        plans.push(created.clone());
        Ok(created)
    }

    async fn modify_plan(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        edit: PlanEdit<'_>,
    ) -> AppResult<CultivationPlan> {
        let mut plans = self.plans.write().await;
        let stored = plans
            .iter_mut()
            .find(|plan| plan.id == plan_id && plan.owner_id == owner_id)
            .ok_or_else(not_found)?;

        let mut edited = stored.clone();
        edit(&mut edited)?;
        *stored = edited.clone();
        Ok(edited)
    }

    async fn delete_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        let mut plans = self.plans.write().await;
        let position = plans
            .iter()
            .position(|plan| plan.id == plan_id && plan.owner_id == owner_id)
            .ok_or_else(not_found)?;
        plans.remove(position);
        Ok(())
    }

    async fn set_primary_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan> {
        let mut plans = self.plans.write().await;
        if !plans
            .iter()
            .any(|plan| plan.id == plan_id && plan.owner_id == owner_id)
        {
            return Err(not_found());
        }

        let mut primary = None;
        for plan in plans.iter_mut().filter(|plan| plan.owner_id == owner_id) {
            plan.is_primary = plan.id == plan_id;
            if plan.is_primary {
                primary = Some(plan.clone());
            }
        }
        primary.ok_or_else(not_found)
    }

    fn storage_kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl CustomCropStore for MemoryPlanRepository {
    async fn load_custom_crops(&self) -> AppResult<Vec<CropDefinition>> {
        Ok(self.custom_crops.read().await.clone())
    }

    async fn save_custom_crop(&self, crop: &CropDefinition) -> AppResult<()> {
        let mut crops = self.custom_crops.write().await;
        match crops.iter_mut().find(|existing| existing.id == crop.id) {
            Some(existing) => *existing = crop.clone(),
            None => crops.push(crop.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{CropCatalog, PlanCropEntry, PlanUpdate, PlanningError};

    fn new_plan(name: &str) -> NewPlan {
        NewPlan {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_first_plan_is_primary() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let first = repo.create_plan(owner, new_plan("Spring")).await.unwrap();
        let second = repo.create_plan(owner, new_plan("Autumn")).await.unwrap();
        assert!(first.is_primary);
        assert!(!second.is_primary);
        assert!(first.crops.is_empty());

        let other = repo.create_plan(Uuid::new_v4(), new_plan("Other")).await.unwrap();
        assert!(other.is_primary);
    }

    #[tokio::test]
    async fn test_set_primary_leaves_exactly_one() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let first = repo.create_plan(owner, new_plan("Spring")).await.unwrap();
        let second = repo.create_plan(owner, new_plan("Autumn")).await.unwrap();

        let primary = repo.set_primary_plan(owner, second.id).await.unwrap();
        assert_eq!(primary.id, second.id);

        let plans = repo.list_plans(owner).await.unwrap();
        assert_eq!(plans.iter().filter(|p| p.is_primary).count(), 1);
        assert_eq!(plans[0].id, second.id);
        assert!(!repo.get_plan(owner, first.id).await.unwrap().is_primary);
    }

    #[tokio::test]
    async fn test_set_primary_unknown_plan() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let plan = repo.create_plan(owner, new_plan("Spring")).await.unwrap();

        let result = repo.set_primary_plan(owner, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        // previous primary untouched
        assert!(repo.get_plan(owner, plan.id).await.unwrap().is_primary);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let plan = repo
            .create_plan(
                owner,
                NewPlan {
                    name: "Spring".to_string(),
                    description: Some("Raised beds".to_string()),
                },
            )
            .await
            .unwrap();

        let catalog = CropCatalog::builtin();
        let entry = PlanCropEntry::estimated(&catalog, "peas", Decimal::from(20)).unwrap();
        let updated = repo
            .update_plan(owner, plan.id, PlanUpdate::crops(vec![entry]))
            .await
            .unwrap();

        assert_eq!(updated.name, "Spring");
        assert_eq!(updated.description.as_deref(), Some("Raised beds"));
        assert_eq!(updated.crops.len(), 1);
        assert_eq!(updated.crops[0].estimated_yield_kg, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_plan_unchanged() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let plan = repo.create_plan(owner, new_plan("Spring")).await.unwrap();

        let result = repo
            .modify_plan(
                owner,
                plan.id,
                Box::new(|plan: &mut CultivationPlan| -> AppResult<()> {
                    plan.name = "Renamed".to_string();
                    Err(PlanningError::CropNotInPlan("kale".to_string()).into())
                }),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Planning(PlanningError::CropNotInPlan(_)))
        ));
        assert_eq!(repo.get_plan(owner, plan.id).await.unwrap().name, "Spring");
    }

    #[tokio::test]
    async fn test_modify_foreign_plan() {
        let repo = MemoryPlanRepository::new();
        let plan = repo.create_plan(Uuid::new_v4(), new_plan("Spring")).await.unwrap();

        let untouched = |_: &mut CultivationPlan| -> AppResult<()> { Ok(()) };
        let result = repo
            .modify_plan(Uuid::new_v4(), plan.id, Box::new(untouched))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_plans_are_scoped_to_owner() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let plan = repo.create_plan(owner, new_plan("Spring")).await.unwrap();

        assert!(matches!(
            repo.get_plan(stranger, plan.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_plan(stranger, plan.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(repo.list_plans(stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_plan() {
        let repo = MemoryPlanRepository::new();
        let owner = Uuid::new_v4();
        let plan = repo.create_plan(owner, new_plan("Spring")).await.unwrap();

        repo.delete_plan(owner, plan.id).await.unwrap();
        assert!(repo.list_plans(owner).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete_plan(owner, plan.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_custom_crop_store_upserts() {
        let repo = MemoryPlanRepository::new();
        let catalog = CropCatalog::builtin();
        let mut crop = catalog.get("kale").unwrap().clone();
        crop.id = "custom-kale".to_string();

        repo.save_custom_crop(&crop).await.unwrap();
        crop.kcal_per_kg = Decimal::from(500);
        repo.save_custom_crop(&crop).await.unwrap();

        let stored = repo.load_custom_crops().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].kcal_per_kg, Decimal::from(500));
    }
}
