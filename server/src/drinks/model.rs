//! The drink resource and its two public representations.
//!
//! # Invariants
//! - A stored drink has a non-empty title of at most `MAX_TITLE_LENGTH` characters.
//! - A stored drink has at least one ingredient, and every ingredient has at
//!   least one part.

use serde::{Deserialize, Serialize};

/// Maximum number of characters in a drink title.
pub const MAX_TITLE_LENGTH: usize = 80;

/// Identifier of a stored drink.
pub type DrinkId = u64;

/// One ingredient of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name, e.g. "milk".
    pub name: String,
    /// Color used when drawing the drink.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// An ingredient without its name, as shown to callers with `get:drinks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient {
    /// Color used when drawing the drink.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// A stored drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    /// Store-assigned id.
    pub id: DrinkId,
    /// Unique title.
    pub title: String,
    /// Ingredients, in drawing order.
    pub recipe: Vec<Ingredient>,
}

/// Short representation: ingredient names are hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Long representation: the full recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkLong {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// The representation for callers allowed to list drinks.
    #[must_use]
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| ShortIngredient {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }

    /// The representation for callers allowed to see recipes.
    #[must_use]
    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

/// A recipe as submitted by a client: one ingredient or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    /// A single ingredient object.
    One(Ingredient),
    /// A list of ingredients.
    Many(Vec<Ingredient>),
}

impl From<RecipeInput> for Vec<Ingredient> {
    fn from(input: RecipeInput) -> Self {
        match input {
            RecipeInput::One(ingredient) => vec![ingredient],
            RecipeInput::Many(ingredients) => ingredients,
        }
    }
}

/// Body of `POST /drinks`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: RecipeInput,
}

/// Body of `PATCH /drinks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrinkChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

/// Why a title or recipe was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is empty or only whitespace.
    EmptyTitle,
    /// The title is longer than `MAX_TITLE_LENGTH` characters.
    TitleTooLong(usize),
    /// The recipe has no ingredients.
    EmptyRecipe,
    /// An ingredient has zero parts.
    ZeroParts(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong(length) => write!(
                f,
                "title is {length} characters, at most {MAX_TITLE_LENGTH} allowed"
            ),
            Self::EmptyRecipe => write!(f, "recipe must have at least one ingredient"),
            Self::ZeroParts(name) => write!(f, "ingredient '{name}' must have at least one part"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a title against the drink invariants.
///
/// # Errors
/// Returns `ValidationError` if the title is blank or too long.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let length = title.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong(length));
    }
    Ok(())
}

/// Check a recipe against the drink invariants.
///
/// # Errors
/// Returns `ValidationError` if the recipe is empty or an ingredient has no parts.
pub fn validate_recipe(recipe: &[Ingredient]) -> Result<(), ValidationError> {
    if recipe.is_empty() {
        return Err(ValidationError::EmptyRecipe);
    }
    if let Some(ingredient) = recipe.iter().find(|ingredient| ingredient.parts == 0) {
        return Err(ValidationError::ZeroParts(ingredient.name.clone()));
    }
    Ok(())
}
