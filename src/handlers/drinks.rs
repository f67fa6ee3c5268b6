use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::drink::{self, Drink, DrinkChanges, DrinkShort, NewDrink};
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::middleware::auth::AuthContext;

/// GET /drinks - public listing with abbreviated recipes
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let drinks = state.store.list().await?;
    let drinks: Vec<DrinkShort> = drinks.iter().map(Drink::short).collect();
    Ok(Json(json!({ "success": true, "drinks": drinks })))
}

/// GET /drinks-detail - full recipes, requires `get:drinks-detail`
pub async fn list_detail(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let drinks = state.store.list().await?;
    let drinks: Vec<Value> = drinks.iter().map(|d| json!(d.long())).collect();
    Ok(Json(json!({ "success": true, "drinks": drinks })))
}

/// POST /drinks - create a drink, requires `post:drinks`
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(draft): ApiJson<NewDrink>,
) -> Result<Json<Value>, ApiError> {
    drink::validate(&draft.title, &draft.recipe)?;

    let created = state.store.insert(draft).await?;
    tracing::info!(subject = %auth.subject, drink = created.id, "created drink");

    Ok(Json(json!({ "success": true, "drink": created.long() })))
}

/// PATCH /drinks/:id - update title and/or recipe, requires `patch:drinks`
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<DrinkChanges>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_drink_id(&id)?;

    if changes.is_empty() {
        return Err(ApiError::unprocessable_entity(
            "update requires a title or recipe field",
        ));
    }
    if let Some(title) = &changes.title {
        drink::validate_title(title)?;
    }
    if let Some(recipe) = &changes.recipe {
        drink::validate_recipe(recipe)?;
    }

    let updated = state.store.update(id, changes).await?;
    tracing::info!(subject = %auth.subject, drink = id, "updated drink");

    Ok(Json(json!({ "success": true, "drink": updated.long() })))
}

/// DELETE /drinks/:id - remove a drink, requires `delete:drinks`
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_drink_id(&id)?;

    state.store.delete(id).await?;
    tracing::info!(subject = %auth.subject, drink = id, "deleted drink");

    Ok(Json(json!({ "success": true, "delete": id })))
}

/// Unknown ids look the same whether they are non-numeric or just absent.
fn parse_drink_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("drink {} not found", raw)))
}
