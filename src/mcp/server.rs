//! MacroMenu MCP Server Implementation
//!
//! Implements the MCP server with all MacroMenu tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::engine::MenuGenerator;
use crate::models::{OverrideItem, Overrides, SavedMealItem, TargetInput};
use crate::tools::foods;
use crate::tools::meals;
use crate::tools::saved_meals;
use crate::tools::status::StatusTracker;

/// MacroMenu MCP Service
#[derive(Clone)]
pub struct MacroMenuService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    generator: Arc<MenuGenerator>,
    tool_router: ToolRouter<MacroMenuService>,
}

impl MacroMenuService {
    pub fn new(database_path: PathBuf, database: Database, generator: MenuGenerator, catalog_source: String) -> Self {
        let catalog = generator.catalog();
        let tracker = StatusTracker::new(
            database_path,
            catalog_source,
            catalog.nutrients.len(),
            catalog.compatibility.len(),
        );
        Self {
            status_tracker: Arc::new(tracker),
            database,
            generator: Arc::new(generator),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Bad input and unknown ids are the caller's fault; storage failures are not
fn saved_meal_error(e: saved_meals::SavedMealError) -> McpError {
    if e.is_caller_error() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

// ============================================================================
// Generation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TargetParams {
    /// Protein grams (> 0)
    pub protein: Option<f64>,
    /// Carbohydrate grams (> 0)
    pub carbohydrate: Option<f64>,
    /// Fat grams (> 0)
    pub fat: Option<f64>,
    /// Ignored; calories are derived as 4P + 4C + 9G
    pub calories: Option<f64>,
}

impl From<TargetParams> for TargetInput {
    fn from(p: TargetParams) -> Self {
        TargetInput {
            protein: p.protein,
            carbohydrate: p.carbohydrate,
            fat: p.fat,
            calories: p.calories,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct OverrideItemParams {
    /// Catalog food name
    pub name: String,
    /// Fixed grams; omit or 0 to let the generator choose
    pub quantity: Option<f64>,
    /// Allow the final correction to change a fixed quantity
    #[serde(default)]
    pub modifiable: bool,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct OverridesParams {
    #[serde(default)]
    pub proteins: Vec<OverrideItemParams>,
    #[serde(default)]
    pub carbs: Vec<OverrideItemParams>,
    #[serde(default)]
    pub fats: Vec<OverrideItemParams>,
}

impl From<OverridesParams> for Overrides {
    fn from(p: OverridesParams) -> Self {
        let convert = |items: Vec<OverrideItemParams>| -> Vec<OverrideItem> {
            items
                .into_iter()
                .map(|i| OverrideItem {
                    name: i.name,
                    quantity: i.quantity,
                    modifiable: i.modifiable,
                })
                .collect()
        };
        Overrides {
            proteins: convert(p.proteins),
            carbs: convert(p.carbs),
            fats: convert(p.fats),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateMealParams {
    pub target: TargetParams,
    /// Foods that must appear, per category
    pub overrides: Option<OverridesParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateMealsParams {
    pub target: TargetParams,
    #[serde(default = "default_meal_count")]
    pub count: usize,
    pub overrides: Option<OverridesParams>,
}

fn default_meal_count() -> usize {
    3
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateDailyMenuParams {
    /// Macro totals for the whole day
    pub daily: TargetParams,
    /// Number of meals (1-8); 3 to 5 at random when omitted
    pub meals: Option<usize>,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    /// protein, carbohydrate or fat
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodParams {
    pub name: String,
}

// ============================================================================
// Saved Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SavedMealItemParams {
    pub food_name: String,
    /// Grams (> 0)
    pub quantity: f64,
}

fn to_items(items: Vec<SavedMealItemParams>) -> Vec<SavedMealItem> {
    items
        .into_iter()
        .map(|i| SavedMealItem {
            food_name: i.food_name,
            quantity: i.quantity,
        })
        .collect()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveMealParams {
    pub name: Option<String>,
    /// 2 to 8 catalog foods with grams
    pub items: Vec<SavedMealItemParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSavedMealParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSavedMealsParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSavedMealParams {
    pub id: i64,
    pub name: Option<String>,
    /// Replaces all items when given
    pub items: Option<Vec<SavedMealItemParams>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteSavedMealParams {
    pub id: i64,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl MacroMenuService {
    // --- Status ---

    #[tool(description = "Get the current status of the MacroMenu service including build info, catalog size, database status, generation counters and process information")]
    async fn macromenu_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status_tracker.get_status();
        to_json(&status)
    }

    // --- Catalog ---

    #[tool(description = "List catalog foods with per-gram macros, optionally only those dominated by one macro (protein, carbohydrate or fat)")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(self.generator.catalog(), p.category.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a catalog food by name with its macros per 100 g and its compatible proteins, carbohydrates and fats")]
    fn get_food(&self, Parameters(p): Parameters<GetFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::get_food(self.generator.catalog(), &p.name).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Generation ---

    #[tool(description = "Generate one meal whose protein, carbohydrate and fat land within tolerance of the target (protein ±3 g, carbohydrate ±1.5 g, fat ±1.5 g, calories ±6 kcal). Overrides force specific foods per category. A result with fallback=true is a fixed safe meal used when no match was found.")]
    fn generate_meal(&self, Parameters(p): Parameters<GenerateMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::generate_meal(&self.generator, p.target.into(), p.overrides.map(Overrides::from))
            .map_err(|e| McpError::invalid_params(e, None))?;
        self.status_tracker.record([&result.meal]);
        to_json(&result)
    }

    #[tool(description = "Generate several independent meal options (1-20) for the same macro target")]
    fn generate_meals(&self, Parameters(p): Parameters<GenerateMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::generate_meals(&self.generator, p.count, p.target.into(), p.overrides.map(Overrides::from))
            .map_err(|e| McpError::invalid_params(e, None))?;
        self.status_tracker.record(&result.meals);
        to_json(&result)
    }

    #[tool(description = "Split daily macro totals across 1-8 meals with random proportions and generate a meal for each")]
    fn generate_daily_menu(&self, Parameters(p): Parameters<GenerateDailyMenuParams>) -> Result<CallToolResult, McpError> {
        let result = meals::generate_daily_menu(&self.generator, p.daily.into(), p.meals)
            .map_err(|e| McpError::invalid_params(e, None))?;
        self.status_tracker.record(result.meals.iter().map(|m| &m.meal));
        to_json(&result)
    }

    // --- Saved Meals ---

    #[tool(description = "Save a meal of 2-8 catalog foods with quantities in grams; totals are computed from the catalog")]
    fn save_meal(&self, Parameters(p): Parameters<SaveMealParams>) -> Result<CallToolResult, McpError> {
        let result = saved_meals::save_meal(&self.database, self.generator.catalog(), p.name, to_items(p.items))
            .map_err(saved_meal_error)?;
        to_json(&result)
    }

    #[tool(description = "Get a saved meal with its items and cached totals")]
    fn get_saved_meal(&self, Parameters(p): Parameters<GetSavedMealParams>) -> Result<CallToolResult, McpError> {
        let result = saved_meals::get_saved_meal(&self.database, p.id).map_err(saved_meal_error)?;
        to_json(&result)
    }

    #[tool(description = "List saved meals, newest first, with pagination")]
    fn list_saved_meals(&self, Parameters(p): Parameters<ListSavedMealsParams>) -> Result<CallToolResult, McpError> {
        let result = saved_meals::list_saved_meals(&self.database, p.limit, p.offset)
            .map_err(saved_meal_error)?;
        to_json(&result)
    }

    #[tool(description = "Rename a saved meal and/or replace its items (2-8 catalog foods)")]
    fn update_saved_meal(&self, Parameters(p): Parameters<UpdateSavedMealParams>) -> Result<CallToolResult, McpError> {
        let result = saved_meals::update_saved_meal(
            &self.database,
            self.generator.catalog(),
            p.id,
            p.name,
            p.items.map(to_items),
        )
        .map_err(saved_meal_error)?;
        to_json(&result)
    }

    #[tool(description = "Delete a saved meal and its items")]
    fn delete_saved_meal(&self, Parameters(p): Parameters<DeleteSavedMealParams>) -> Result<CallToolResult, McpError> {
        let result = saved_meals::delete_saved_meal(&self.database, p.id).map_err(saved_meal_error)?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacroMenuService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macromenu".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MacroMenu".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MacroMenu - generates meals from a fixed food catalog that match protein/carbohydrate/fat targets. \
                 Catalog: list_foods, get_food. \
                 Generation: generate_meal (optional overrides per category), generate_meals, generate_daily_menu. \
                 Results flagged fallback=true are a fixed safe meal, not a match for the target. \
                 Saved meals: save_meal/get_saved_meal/list_saved_meals/update_saved_meal/delete_saved_meal. \
                 Status: macromenu_status."
                    .into(),
            ),
        }
    }
}
