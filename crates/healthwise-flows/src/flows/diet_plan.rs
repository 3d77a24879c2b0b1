//! Personalized diet plan generation.
//!
//! Besides its schema, a diet plan reply must be internally consistent: the
//! stated total has to equal the sum of its meals. That check is registered
//! on the verifier under [`CALORIES_ADD_UP`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use healthwise_contracts::{
    contract::{ContractRule, ContractRuleType, ResponseContract},
    error::{HealthwiseError, HealthwiseResult},
};
use healthwise_core::{
    traits::{ResponseVerifier, TextGenerator},
    PromptTemplate, StructuredFlow,
};

pub const FLOW_NAME: &str = "dietPlanFlow";

/// Name of the registered check comparing `totalCalories` with the meals.
pub const CALORIES_ADD_UP: &str = "diet-calories-add-up";

const PROMPT: &str = r#"You are a registered dietitian creating a personalized diet plan.

Consider the following medical conditions: {{{medicalConditions}}}
The user needs to consume approximately {{{calorieNeeds}}} calories per day.

Create a diet plan with meal suggestions, a breakdown of calories for each meal, and a shopping list.

Important:
- Ensure the total calories in the diet plan match the calorie needs of the user.
- The shopping list should contain all the items required to prepare the meals in the diet plan.
- Consider the medical conditions and avoid any ingredient that could be harmful for the user.
- Generate shopping list items with realistic quantities.
- Include "notes" about the medical conditions that the user should be aware of.

Respond with a JSON object of this shape:
{
  "dietPlan": [
    { "name": "Meal 1 Name", "ingredients": "Ingredient 1, Ingredient 2", "calories": 500 },
    { "name": "Meal 2 Name", "ingredients": "Ingredient A, Ingredient B", "calories": 600 }
  ],
  "totalCalories": 1100,
  "shoppingList": [
    { "item": "Ingredient 1", "quantity": "100g" },
    { "item": "Ingredient 2", "quantity": "50g" }
  ],
  "notes": "Avoid processed foods."
}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanRequest {
    /// Comma-separated conditions, e.g. "type 2 diabetes, hypertension".
    pub medical_conditions: String,
    /// Daily calorie target.
    pub calorie_needs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub ingredients: String,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub item: String,
    /// Free-form amount, e.g. "200g" or "1 loaf".
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub diet_plan: Vec<Meal>,
    pub total_calories: f64,
    pub shopping_list: Vec<ShoppingListItem>,
    pub notes: String,
}

pub fn contract() -> ResponseContract {
    ResponseContract {
        contract_id: "diet-plan-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "dietPlan": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "ingredients": { "type": "string" },
                            "calories": { "type": "number", "minimum": 0 }
                        },
                        "required": ["name", "ingredients", "calories"]
                    }
                },
                "totalCalories": { "type": "number", "minimum": 0 },
                "shoppingList": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "item": { "type": "string" },
                            "quantity": { "type": "string" }
                        },
                        "required": ["item", "quantity"]
                    }
                },
                "notes": { "type": "string" }
            },
            "required": ["dietPlan", "totalCalories", "shoppingList", "notes"]
        }),
        rules: vec![ContractRule {
            rule_id: "calories-add-up".to_string(),
            description: "totalCalories equals the sum of meal calories".to_string(),
            rule_type: ContractRuleType::Custom {
                function_name: CALORIES_ADD_UP.to_string(),
            },
        }],
    }
}

pub fn flow() -> StructuredFlow<DietPlan> {
    StructuredFlow::new(FLOW_NAME, PromptTemplate::new(PROMPT), contract())
}

/// The check registered under [`CALORIES_ADD_UP`].
///
/// Meals without a numeric `calories` are left to the schema; the sums are
/// compared to the nearest calorie.
pub fn calories_add_up(payload: &Value) -> Option<String> {
    let total = payload.get("totalCalories")?.as_f64()?;
    let meals = payload.get("dietPlan")?.as_array()?;
    let sum: f64 = meals
        .iter()
        .filter_map(|meal| meal.get("calories").and_then(Value::as_f64))
        .sum();

    if (total - sum).abs() >= 1.0 {
        Some(format!("totalCalories is {total} but the meals add up to {sum}"))
    } else {
        None
    }
}

/// Generate a diet plan. A zero calorie target is `InvalidInput`.
pub fn generate_diet_plan(
    request: &DietPlanRequest,
    generator: &dyn TextGenerator,
    verifier: &dyn ResponseVerifier,
) -> HealthwiseResult<DietPlan> {
    if request.calorie_needs == 0 {
        return Err(HealthwiseError::invalid_input("calorie needs must be greater than zero"));
    }
    let request = DietPlanRequest {
        medical_conditions: request.medical_conditions.trim().to_string(),
        calorie_needs: request.calorie_needs,
    };
    flow().run(&request, generator, verifier)
}
