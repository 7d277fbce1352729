//! Drink endpoints.
//!
//! Every handler takes `Authorized<_>` as its first extractor, so the token
//! and permission are checked before the path, the body, or the store are
//! touched.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use serde::Serialize;

use super::error::ApiError;
use crate::auth::guard::{DeleteDrinks, GetDrinks, GetDrinksDetail, PatchDrinks, PostDrinks};
use crate::auth::{Authorized, Claims};
use crate::drinks::{DrinkChanges, DrinkId, DrinkLong, DrinkShort, DrinkStore, NewDrink};

/// Successful response carrying drinks.
#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    const fn ok(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// Successful response to a delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: DrinkId,
}

fn caller(claims: &Claims) -> &str {
    claims.sub.as_deref().unwrap_or("<unknown>")
}

/// `GET /drinks`: all drinks, short form.
pub async fn list_drinks(
    _auth: Authorized<GetDrinks>,
    State(store): State<Arc<DrinkStore>>,
) -> Json<DrinksResponse<DrinkShort>> {
    let drinks = store.list().await.iter().map(|drink| drink.short()).collect();
    Json(DrinksResponse::ok(drinks))
}

/// `GET /drinks-detail`: all drinks, long form.
pub async fn drinks_detail(
    _auth: Authorized<GetDrinksDetail>,
    State(store): State<Arc<DrinkStore>>,
) -> Json<DrinksResponse<DrinkLong>> {
    let drinks = store.list().await.iter().map(|drink| drink.long()).collect();
    Json(DrinksResponse::ok(drinks))
}

/// `POST /drinks`: create a drink.
pub async fn create_drink(
    auth: Authorized<PostDrinks>,
    State(store): State<Arc<DrinkStore>>,
    body: Result<Json<NewDrink>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, ApiError> {
    let Json(new_drink) = body?;
    let drink = store.insert(new_drink).await?;

    tracing::debug!("{} created drink {}", caller(auth.claims()), drink.id);
    Ok(Json(DrinksResponse::ok(vec![drink.long()])))
}

/// `PATCH /drinks/{id}`: change a drink's title and/or recipe.
pub async fn update_drink(
    auth: Authorized<PatchDrinks>,
    State(store): State<Arc<DrinkStore>>,
    id: Result<Path<DrinkId>, PathRejection>,
    body: Result<Json<DrinkChanges>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = body?;
    let drink = store.update(id, changes).await?;

    tracing::debug!("{} updated drink {id}", caller(auth.claims()));
    Ok(Json(DrinksResponse::ok(vec![drink.long()])))
}

/// `DELETE /drinks/{id}`: remove a drink.
pub async fn delete_drink(
    auth: Authorized<DeleteDrinks>,
    State(store): State<Arc<DrinkStore>>,
    id: Result<Path<DrinkId>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    store.delete(id).await?;

    tracing::debug!("{} deleted drink {id}", caller(auth.claims()));
    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known paths hit with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
