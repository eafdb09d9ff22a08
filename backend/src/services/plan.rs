//! Plan service: plan CRUD, crop editing and derived projections

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    CropCatalog, CultivationPlan, Household, MonthlyActivity, NewPlan, NutritionSummary,
    PlanCropEntry, PlanUpdate, PlanningError,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::PlanRepository;
use crate::services::catalog::SharedCatalog;

/// Plan service for managing an owner's cultivation plans
#[derive(Clone)]
pub struct PlanService {
    plans: Arc<dyn PlanRepository>,
    catalog: SharedCatalog,
}

/// Input for creating a plan
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanInput {
    #[validate(custom = "validate_plan_name")]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Input for updating a plan. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlanInput {
    #[validate(custom = "validate_plan_name")]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Replaces the whole crop list; yields are re-estimated
    pub crops: Option<Vec<CropQuantityInput>>,
}

/// A crop and how many units to plant
#[derive(Debug, Clone, Deserialize)]
pub struct CropQuantityInput {
    pub crop_id: String,
    pub quantity: Decimal,
}

/// Input for changing the quantity of a crop already in a plan
#[derive(Debug, Deserialize)]
pub struct UpdateCropInput {
    pub quantity: Decimal,
}

/// Everything the plan dashboard shows, computed in one pass
#[derive(Debug, Serialize)]
pub struct PlanProjections {
    pub plan: CultivationPlan,
    pub nutrition: NutritionSummary,
    pub activities: Vec<MonthlyActivity>,
}

fn validate_plan_name(name: &str) -> Result<(), validator::ValidationError> {
    shared::validate_plan_name(name).map_err(|message| {
        let mut error = validator::ValidationError::new("plan_name");
        error.message = Some(message.into());
        error
    })
}

impl PlanService {
    /// Create a new PlanService instance
    pub fn new(plans: Arc<dyn PlanRepository>, catalog: SharedCatalog) -> Self {
        Self { plans, catalog }
    }

    /// List the owner's plans, primary first
    pub async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<CultivationPlan>> {
        self.plans.list_plans(owner_id).await
    }

    pub async fn get_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan> {
        self.plans.get_plan(owner_id, plan_id).await
    }

    /// Create an empty plan
    pub async fn create_plan(
        &self,
        owner_id: Uuid,
        input: CreatePlanInput,
    ) -> AppResult<CultivationPlan> {
        input.validate()?;

        let plan = self
            .plans
            .create_plan(
                owner_id,
                NewPlan {
                    name: input.name,
                    description: input.description,
                },
            )
            .await?;

        tracing::info!(plan_id = %plan.id, %owner_id, primary = plan.is_primary, "plan created");
        Ok(plan)
    }

    /// Update name, description or the full crop list
    pub async fn update_plan(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        input: UpdatePlanInput,
    ) -> AppResult<CultivationPlan> {
        input.validate()?;

        let crops = match input.crops {
            Some(crops) => Some(self.estimate_entries(&crops).await?),
            None => None,
        };

        self.plans
            .update_plan(
                owner_id,
                plan_id,
                PlanUpdate {
                    name: input.name,
                    description: input.description,
                    crops,
                },
            )
            .await
    }

    pub async fn delete_plan(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        self.plans.delete_plan(owner_id, plan_id).await?;
        tracing::info!(%plan_id, %owner_id, "plan deleted");
        Ok(())
    }

    /// Make a plan the owner's primary plan
    pub async fn set_primary(&self, owner_id: Uuid, plan_id: Uuid) -> AppResult<CultivationPlan> {
        self.plans.set_primary_plan(owner_id, plan_id).await
    }

    /// Add a crop to a plan. A crop already in the plan is rejected.
    pub async fn add_crop(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        input: CropQuantityInput,
    ) -> AppResult<CultivationPlan> {
        let catalog = self.catalog.read().await;
        self.plans
            .modify_plan(
                owner_id,
                plan_id,
                Box::new(|plan: &mut CultivationPlan| -> AppResult<()> {
                    plan.add_crop(&catalog, &input.crop_id, input.quantity)?;
                    Ok(())
                }),
            )
            .await
    }

    /// Change the quantity of a crop in a plan and re-estimate its yield
    pub async fn update_crop(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        crop_id: &str,
        input: UpdateCropInput,
    ) -> AppResult<CultivationPlan> {
        let catalog = self.catalog.read().await;
        self.plans
            .modify_plan(
                owner_id,
                plan_id,
                Box::new(|plan: &mut CultivationPlan| -> AppResult<()> {
                    plan.update_crop(&catalog, crop_id, input.quantity)?;
                    Ok(())
                }),
            )
            .await
    }

    /// Remove a crop from a plan
    pub async fn remove_crop(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        crop_id: &str,
    ) -> AppResult<CultivationPlan> {
        let catalog = self.catalog.read().await;
        self.plans
            .modify_plan(
                owner_id,
                plan_id,
                Box::new(|plan: &mut CultivationPlan| -> AppResult<()> {
                    plan.remove_crop(&catalog, crop_id)?;
                    Ok(())
                }),
            )
            .await
    }

    /// Nutrition summary of a plan for a household
    pub async fn nutrition(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        household: Household,
    ) -> AppResult<NutritionSummary> {
        let plan = self.plans.get_plan(owner_id, plan_id).await?;
        let catalog = self.catalog.read().await;
        summarize(&catalog, &plan, household)
    }

    /// Twelve month sowing and harvest calendar of a plan
    pub async fn activities(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<Vec<MonthlyActivity>> {
        let plan = self.plans.get_plan(owner_id, plan_id).await?;
        let catalog = self.catalog.read().await;
        Ok(shared::generate_monthly_activities(&catalog, &plan.crops))
    }

    /// Plan, nutrition and calendar in one response
    pub async fn projections(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        household: Household,
    ) -> AppResult<PlanProjections> {
        let plan = self.plans.get_plan(owner_id, plan_id).await?;
        let catalog = self.catalog.read().await;
        let nutrition = summarize(&catalog, &plan, household)?;
        let activities = shared::generate_monthly_activities(&catalog, &plan.crops);
        Ok(PlanProjections {
            plan,
            nutrition,
            activities,
        })
    }

    async fn estimate_entries(&self, crops: &[CropQuantityInput]) -> AppResult<Vec<PlanCropEntry>> {
        let catalog = self.catalog.read().await;
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(crops.len());
        for crop in crops {
            let entry = PlanCropEntry::estimated(&catalog, &crop.crop_id, crop.quantity)?;
            if !seen.insert(entry.crop_id.clone()) {
                return Err(PlanningError::DuplicateCrop(entry.crop_id).into());
            }
            entries.push(entry);
        }
        Ok(entries)
    }
}

fn summarize(
    catalog: &CropCatalog,
    plan: &CultivationPlan,
    household: Household,
) -> AppResult<NutritionSummary> {
    let summary =
        shared::summarize_nutrition(catalog, &plan.crops, household.size, household.period_days)?;
    shared::validate_household(household.size, household.period_days)
        .map_err(|message| AppError::validation("household", message))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryPlanRepository;
    use tokio::sync::RwLock;

    fn service() -> PlanService {
        PlanService::new(
            Arc::new(MemoryPlanRepository::new()),
            Arc::new(RwLock::new(CropCatalog::builtin())),
        )
    }

    async fn plan_named(service: &PlanService, owner: Uuid, name: &str) -> CultivationPlan {
        service
            .create_plan(
                owner,
                CreatePlanInput {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
    }

    fn household(size: i32, period_days: i32) -> Household {
        Household { size, period_days }
    }

    fn crop(crop_id: &str, quantity: i64) -> CropQuantityInput {
        CropQuantityInput {
            crop_id: crop_id.to_string(),
            quantity: Decimal::from(quantity),
        }
    }

    #[tokio::test]
    async fn test_create_plan_rejects_blank_name() {
        let service = service();
        let result = service
            .create_plan(
                Uuid::new_v4(),
                CreatePlanInput {
                    name: "   ".to_string(),
                    description: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation { field, .. }) if field == "name"));
    }

    #[tokio::test]
    async fn test_add_crop_estimates_yield() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Summer").await;

        let plan = service.add_crop(owner, plan.id, crop("tomato", 10)).await.unwrap();
        assert_eq!(plan.crops.len(), 1);
        assert_eq!(plan.crops[0].estimated_yield_kg, Decimal::from(25));
    }

    #[tokio::test]
    async fn test_add_crop_twice_is_duplicate() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Summer").await;

        service.add_crop(owner, plan.id, crop("kale", 4)).await.unwrap();
        let result = service.add_crop(owner, plan.id, crop("Kale", 2)).await;
        assert!(matches!(
            result,
            Err(AppError::Planning(PlanningError::DuplicateCrop(id))) if id == "kale"
        ));

        let stored = service.get_plan(owner, plan.id).await.unwrap();
        assert_eq!(stored.crops.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_remove_crop() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;
        service.add_crop(owner, plan.id, crop("tomato", 10)).await.unwrap();

        let plan = service
            .update_crop(
                owner,
                plan.id,
                "tomato",
                UpdateCropInput {
                    quantity: Decimal::from(2),
                },
            )
            .await
            .unwrap();
        assert_eq!(plan.crops[0].quantity, Decimal::from(2));
        assert_eq!(plan.crops[0].estimated_yield_kg, Decimal::from(5));

        let plan = service.remove_crop(owner, plan.id, "tomato").await.unwrap();
        assert!(plan.crops.is_empty());

        let result = service.remove_crop(owner, plan.id, "tomato").await;
        assert!(matches!(
            result,
            Err(AppError::Planning(PlanningError::CropNotInPlan(_)))
        ));
    }

    #[tokio::test]
    async fn test_edit_crop_by_name() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;
        service.add_crop(owner, plan.id, crop("Tomato", 10)).await.unwrap();

        let plan = service
            .update_crop(
                owner,
                plan.id,
                "Tomato",
                UpdateCropInput {
                    quantity: Decimal::from(4),
                },
            )
            .await
            .unwrap();
        assert_eq!(plan.crops[0].estimated_yield_kg, Decimal::from(10));

        let plan = service.remove_crop(owner, plan.id, "Tomato").await.unwrap();
        assert!(plan.crops.is_empty());
    }

    #[tokio::test]
    async fn test_add_huge_quantity_overflows() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;

        let result = service
            .add_crop(
                owner,
                plan.id,
                CropQuantityInput {
                    crop_id: "pumpkin".to_string(),
                    quantity: Decimal::MAX,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(AppError::Planning(PlanningError::Overflow(_)))
        ));
        assert!(service.get_plan(owner, plan.id).await.unwrap().crops.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_of_same_crop() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;

        let plan_id = plan.id;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.add_crop(owner, plan_id, crop("kale", 1)).await })
            })
            .collect();

        let mut added = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => added += 1,
                Err(AppError::Planning(PlanningError::DuplicateCrop(id))) => assert_eq!(id, "kale"),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(added, 1);
        assert_eq!(service.get_plan(owner, plan.id).await.unwrap().crops.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_keep_every_crop() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;
        let plan_id = plan.id;
        let crop_ids = ["potato", "tomato", "carrot", "onion", "cabbage", "kale"];

        let tasks: Vec<_> = crop_ids
            .into_iter()
            .map(|crop_id| {
                let service = service.clone();
                tokio::spawn(async move { service.add_crop(owner, plan_id, crop(crop_id, 2)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = service.get_plan(owner, plan.id).await.unwrap();
        let mut stored_ids = stored.crop_ids();
        stored_ids.sort();
        let mut expected: Vec<String> = crop_ids.iter().map(|id| id.to_string()).collect();
        expected.sort();
        assert_eq!(stored_ids, expected);
    }

    #[tokio::test]
    async fn test_replace_crops_rejects_duplicates() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;

        let result = service
            .update_plan(
                owner,
                plan.id,
                UpdatePlanInput {
                    crops: Some(vec![crop("peas", 10), crop("PEAS", 5)]),
                    ..UpdatePlanInput::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(AppError::Planning(PlanningError::DuplicateCrop(_)))
        ));
    }

    #[tokio::test]
    async fn test_tomato_projections() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Tomatoes").await;
        service.add_crop(owner, plan.id, crop("tomato", 10)).await.unwrap();

        let projections = service.projections(owner, plan.id, Household::default()).await.unwrap();
        assert_eq!(projections.nutrition.total_kcal, Decimal::from(4500));
        assert_eq!(projections.nutrition.target_kcal_per_day, Decimal::from(2000));
        assert_eq!(projections.nutrition.percent_of_target, Decimal::from(1));
        assert_eq!(projections.activities.len(), 12);
        assert_eq!(projections.activities[2].sowing_crops, vec!["tomato"]);
        assert_eq!(projections.activities[7].harvesting_crops, vec!["tomato"]);
    }

    #[tokio::test]
    async fn test_nutrition_rejects_bad_household() {
        let service = service();
        let owner = Uuid::new_v4();
        let plan = plan_named(&service, owner, "Beds").await;

        let result = service.nutrition(owner, plan.id, household(0, 365)).await;
        assert!(matches!(
            result,
            Err(AppError::Planning(PlanningError::InvalidHouseholdSize(0)))
        ));

        let result = service.nutrition(owner, plan.id, household(1000, 365)).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_foreign_plan_is_not_found() {
        let service = service();
        let plan = plan_named(&service, Uuid::new_v4(), "Mine").await;

        let result = service.activities(Uuid::new_v4(), plan.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
