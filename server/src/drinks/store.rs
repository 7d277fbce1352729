//! In-memory drink storage.
//!
//! # Thread Safety
//!
//! The store uses a `tokio::sync::RwLock`: listings and lookups share the
//! lock, writes take it exclusively. Each operation holds the lock for its
//! whole read-check-write sequence, so title uniqueness cannot race.
//!
//! # Invariants
//!
//! - Ids are assigned from 1 upwards and never reused.
//! - No two stored drinks share a title.
//! - Every stored drink satisfies the title and recipe validation rules.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::model::{
    Drink, DrinkChanges, DrinkId, Ingredient, NewDrink, ValidationError, validate_recipe,
    validate_title,
};

/// Errors returned by `DrinkStore` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No drink has the given id.
    NotFound(DrinkId),
    /// Another drink already has this title.
    DuplicateTitle(String),
    /// The submitted drink breaks a validation rule.
    Invalid(ValidationError),
    /// The id space is exhausted.
    IdsExhausted,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "drink {id} not found"),
            Self::DuplicateTitle(title) => write!(f, "a drink titled '{title}' already exists"),
            Self::Invalid(e) => write!(f, "invalid drink: {e}"),
            Self::IdsExhausted => write!(f, "no drink ids left"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::NotFound(_) | Self::DuplicateTitle(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}

#[derive(Debug, Default)]
struct Inner {
    drinks: BTreeMap<DrinkId, Drink>,
    next_id: DrinkId,
}

impl Inner {
    fn title_taken(&self, title: &str, except: Option<DrinkId>) -> bool {
        self.drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

/// Drink storage shared by all requests.
#[derive(Debug)]
pub struct DrinkStore {
    inner: RwLock<Inner>,
}

impl Default for DrinkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DrinkStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                drinks: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store holding the starter drink, `water`.
    #[must_use]
    pub fn seeded() -> Self {
        let mut inner = Inner {
            drinks: BTreeMap::new(),
            next_id: 2,
        };
        inner.drinks.insert(
            1,
            Drink {
                id: 1,
                title: "water".to_string(),
                recipe: vec![Ingredient {
                    name: "water".to_string(),
                    color: "blue".to_string(),
                    parts: 1,
                }],
            },
        );
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// All drinks, ordered by id.
    pub async fn list(&self) -> Vec<Drink> {
        self.inner.read().await.drinks.values().cloned().collect()
    }

    /// The drink with `id`.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if there is no such drink.
    pub async fn get(&self, id: DrinkId) -> Result<Drink, StoreError> {
        self.inner
            .read()
            .await
            .drinks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Store a new drink and return it with its assigned id.
    ///
    /// # Errors
    /// Returns `StoreError::Invalid` if the drink breaks a validation rule,
    /// and `StoreError::DuplicateTitle` if the title is taken.
    pub async fn insert(&self, new_drink: NewDrink) -> Result<Drink, StoreError> {
        let recipe: Vec<Ingredient> = new_drink.recipe.into();
        validate_title(&new_drink.title)?;
        validate_recipe(&recipe)?;

        let mut inner = self.inner.write().await;
        if inner.title_taken(&new_drink.title, None) {
            return Err(StoreError::DuplicateTitle(new_drink.title));
        }

        let id = inner.next_id;
        inner.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        let drink = Drink {
            id,
            title: new_drink.title,
            recipe,
        };
        inner.drinks.insert(id, drink.clone());
        drop(inner);

        tracing::info!("created drink {id}");
        Ok(drink)
    }

    /// Apply `changes` to the drink with `id` and return the result.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if there is no such drink,
    /// `StoreError::Invalid` if a change breaks a validation rule, and
    /// `StoreError::DuplicateTitle` if the new title is taken by another drink.
    pub async fn update(&self, id: DrinkId, changes: DrinkChanges) -> Result<Drink, StoreError> {
        let recipe: Option<Vec<Ingredient>> = changes.recipe.map(Into::into);
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &recipe {
            validate_recipe(recipe)?;
        }

        let mut inner = self.inner.write().await;
        if !inner.drinks.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(title) = &changes.title {
            if inner.title_taken(title, Some(id)) {
                return Err(StoreError::DuplicateTitle(title.clone()));
            }
        }

        let drink = inner.drinks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(title) = changes.title {
            drink.title = title;
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }
        let updated = drink.clone();
        drop(inner);

        tracing::info!("updated drink {id}");
        Ok(updated)
    }

    /// Remove the drink with `id`.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if there is no such drink.
    pub async fn delete(&self, id: DrinkId) -> Result<Drink, StoreError> {
        let removed = self
            .inner
            .write()
            .await
            .drinks
            .remove(&id)
            .ok_or(StoreError::NotFound(id))?;

        tracing::info!("deleted drink {id}");
        Ok(removed)
    }
}
