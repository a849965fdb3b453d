//! # AI-Assisted Recipe Filler
//!
//! Thin client around a generative text-completion service (Gemini) that
//! turns a recipe name into a list of recipe rows drawn from the ingredient
//! inventory. The service is asked for a structured JSON array of
//! `{ingredientName, quantity}` objects constrained to known ingredient
//! names; returned names are matched case-insensitively against the store and
//! unmatched entries are dropped silently.
//!
//! There is no retry, backoff, timeout, or streaming. The call either
//! produces a usable row list or a [`RecipeFillError`], and every failure
//! path leaves the caller's existing rows untouched.

use crate::model::RecipeRow;
use crate::store::EntityStore;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One ingredient suggestion returned by the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedIngredient {
    #[serde(rename = "ingredientName")]
    pub ingredient_name: String,
    pub quantity: f64,
}

/// User-facing failure modes of the recipe fill operation.
#[derive(Debug, Clone)]
pub enum RecipeFillError {
    /// The recipe name was empty or whitespace
    EmptyRecipeName,
    /// The service answered but nothing it suggested exists in inventory
    NoMatches,
    /// Request or response handling failed (network, status, malformed JSON)
    Service(String),
}

impl fmt::Display for RecipeFillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeFillError::EmptyRecipeName => {
                write!(f, "Please enter a recipe name first.")
            }
            RecipeFillError::NoMatches => write!(
                f,
                "Could not find any matching ingredients in inventory for this recipe."
            ),
            RecipeFillError::Service(_) => {
                write!(f, "Failed to generate recipe. Please try again.")
            }
        }
    }
}

impl std::error::Error for RecipeFillError {}

/// Gemini API request body.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini API response body, reduced to the path we read.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Response schema constraining the completion to a JSON array of
/// `{ingredientName, quantity}` objects.
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "ingredientName": { "type": "STRING" },
                "quantity": { "type": "NUMBER" }
            }
        }
    })
}

/// Parse the JSON text payload of a completion into suggestions.
fn parse_suggestions(text: &str) -> Result<Vec<SuggestedIngredient>> {
    serde_json::from_str(text).context("Completion payload is not a valid suggestion array")
}

/// Client for the Gemini structured-completion endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with the default model.
    pub fn new(api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the completion model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt and parse the structured completion into suggestions.
    pub async fn generate_ingredient_list(&self, prompt: &str) -> Result<Vec<SuggestedIngredient>> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Completion request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read completion response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Completion service returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            ));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).context("Malformed completion response")?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("Completion response contained no text"))?;

        parse_suggestions(&text)
    }
}

/// Build the inventory-constrained prompt for a recipe name.
///
/// Each known ingredient is listed with the unit of measure of its first
/// price-list item, or "units" when nothing quotes it yet.
pub fn build_recipe_prompt(recipe_name: &str, store: &EntityStore) -> String {
    let inventory = store
        .ingredients
        .iter()
        .map(|ing| {
            let uom = store
                .first_price_for_ingredient(&ing.id)
                .map(|item| item.uom.as_str())
                .unwrap_or("units");
            format!("\"{}\" (typical unit: {})", ing.name, uom)
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a kitchen assistant. Create a simple ingredient list for the recipe: \"{}\".\n\n\
         IMPORTANT: You must ONLY use ingredients from the following available list if possible. Match the names exactly.\n\
         Available Inventory: {}\n\n\
         If the recipe requires an ingredient NOT in the list, please OMIT it. We only want to cost what is in inventory.\n\n\
         For each ingredient, provide the quantity based on the \"typical unit\" provided in the list.\n\n\
         Return a JSON array of objects with these properties:\n\
         - ingredientName (string, exact match from inventory)\n\
         - quantity (number)",
        recipe_name, inventory
    )
}

/// Map suggestions onto inventory recipe rows.
///
/// Names match case-insensitively; suggestions naming unknown ingredients
/// are dropped without notice.
pub fn match_suggestions(store: &EntityStore, suggestions: &[SuggestedIngredient]) -> Vec<RecipeRow> {
    suggestions
        .iter()
        .filter_map(|s| {
            store
                .find_ingredient_by_name(&s.ingredient_name)
                .map(|ing| RecipeRow::new(&ing.id, s.quantity))
        })
        .collect()
}

/// Map suggestions onto recipe rows, failing when nothing the service
/// suggested exists in inventory. An all-unknown suggestion list yields
/// [`RecipeFillError::NoMatches`] rather than an empty row list, so callers
/// never replace their rows with nothing.
pub fn suggestions_to_rows(
    store: &EntityStore,
    suggestions: &[SuggestedIngredient],
) -> std::result::Result<Vec<RecipeRow>, RecipeFillError> {
    let rows = match_suggestions(store, suggestions);
    if rows.is_empty() {
        return Err(RecipeFillError::NoMatches);
    }
    Ok(rows)
}

/// Run the full fill operation: prompt, completion, and inventory matching.
///
/// Returns the replacement row list on success. On any error the caller
/// keeps its existing rows; nothing here mutates state. Overlapping calls are
/// not guarded against, so whichever response resolves last is the one the
/// caller ends up applying.
pub async fn auto_fill(
    client: &GeminiClient,
    store: &EntityStore,
    recipe_name: &str,
) -> std::result::Result<Vec<RecipeRow>, RecipeFillError> {
    if recipe_name.trim().is_empty() {
        return Err(RecipeFillError::EmptyRecipeName);
    }

    let prompt = build_recipe_prompt(recipe_name, store);
    info!(
        "Requesting ingredient suggestions for recipe '{}' from {}",
        recipe_name,
        client.model()
    );

    let suggestions = client
        .generate_ingredient_list(&prompt)
        .await
        .map_err(|e| {
            warn!("Recipe fill failed for '{}': {:#}", recipe_name, e);
            RecipeFillError::Service(e.to_string())
        })?;

    let rows = suggestions_to_rows(store, &suggestions)?;
    info!(
        "Matched {} of {} suggested ingredients against inventory",
        rows.len(),
        suggestions.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_inventory_with_units() {
        let mut store = EntityStore::seeded();
        store.items.push(crate::model::PriceListItem {
            id: "pli_1".to_string(),
            supplier_id: "sup_1".to_string(),
            ingredient_id: "ing_1".to_string(),
            price: 4.0,
            currency: "USD".to_string(),
            pack_size: 1.0,
            uom: "kg".to_string(),
            effective_date: "2025-01-01".to_string(),
        });

        let prompt = build_recipe_prompt("Tomato Soup", &store);
        assert!(prompt.contains("recipe: \"Tomato Soup\""));
        assert!(prompt.contains("\"Tomato\" (typical unit: kg)"));
        // Garlic has no price item, so its unit falls back
        assert!(prompt.contains("\"Garlic\" (typical unit: units)"));
        assert!(prompt.contains("Return a JSON array"));
    }

    #[test]
    fn test_match_suggestions_case_insensitive_and_drops_unknown() {
        let store = EntityStore::seeded();
        let suggestions = vec![
            SuggestedIngredient {
                ingredient_name: "tomato".to_string(),
                quantity: 2.0,
            },
            SuggestedIngredient {
                ingredient_name: "GARLIC".to_string(),
                quantity: 0.5,
            },
            SuggestedIngredient {
                ingredient_name: "Unicorn Dust".to_string(),
                quantity: 1.0,
            },
        ];

        let rows = match_suggestions(&store, &suggestions);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ingredient_id, "ing_1");
        assert_eq!(rows[0].qty, 2.0);
        assert_eq!(rows[1].ingredient_id, "ing_2");
    }

    #[test]
    fn test_all_unknown_suggestions_yield_no_matches() {
        let store = EntityStore::seeded();
        let suggestions = vec![
            SuggestedIngredient {
                ingredient_name: "Unicorn Dust".to_string(),
                quantity: 1.0,
            },
            SuggestedIngredient {
                ingredient_name: "Dragon Fruit".to_string(),
                quantity: 2.0,
            },
        ];

        // Nothing matches inventory, so the fill fails instead of handing the
        // caller an empty replacement row list
        assert!(match_suggestions(&store, &suggestions).is_empty());
        let result = suggestions_to_rows(&store, &suggestions);
        assert!(matches!(result, Err(RecipeFillError::NoMatches)));

        // An empty suggestion list fails the same way
        let result = suggestions_to_rows(&store, &[]);
        assert!(matches!(result, Err(RecipeFillError::NoMatches)));
    }

    #[test]
    fn test_parse_suggestions_payload() {
        let payload = r#"[
            {"ingredientName": "Tomato", "quantity": 3},
            {"ingredientName": "Olive Oil", "quantity": 0.25}
        ]"#;
        let suggestions = parse_suggestions(payload).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].ingredient_name, "Tomato");
        assert_eq!(suggestions[1].quantity, 0.25);

        assert!(parse_suggestions("not json").is_err());
        assert!(parse_suggestions(r#"{"ingredientName": "Tomato"}"#).is_err());
    }

    #[test]
    fn test_response_schema_shape() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["properties"]["ingredientName"]["type"], "STRING");
        assert_eq!(schema["items"]["properties"]["quantity"]["type"], "NUMBER");
    }

    #[test]
    fn test_extracting_text_from_response_body() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "[{\"ingredientName\": \"Garlic\", \"quantity\": 1}]"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        let text = &parsed.candidates[0].content.parts[0].text;
        let suggestions = parse_suggestions(text).unwrap();
        assert_eq!(suggestions[0].ingredient_name, "Garlic");
    }

    #[tokio::test]
    async fn test_auto_fill_rejects_empty_recipe_name() {
        let store = EntityStore::seeded();
        let client = GeminiClient::new("test-key");

        for name in ["", "   ", "\t\n"] {
            let result = auto_fill(&client, &store, name).await;
            assert!(matches!(result, Err(RecipeFillError::EmptyRecipeName)));
        }
    }

    #[test]
    fn test_error_notices() {
        assert_eq!(
            format!("{}", RecipeFillError::EmptyRecipeName),
            "Please enter a recipe name first."
        );
        assert_eq!(
            format!("{}", RecipeFillError::NoMatches),
            "Could not find any matching ingredients in inventory for this recipe."
        );
        assert_eq!(
            format!("{}", RecipeFillError::Service("boom".to_string())),
            "Failed to generate recipe. Please try again."
        );
    }

    #[test]
    fn test_client_model_override() {
        let client = GeminiClient::new("k").with_model("gemini-other");
        assert_eq!(client.model(), "gemini-other");
        assert_eq!(GeminiClient::new("k").model(), DEFAULT_MODEL);
    }
}
