//! The drink resource: model, representations and storage.

pub mod model;
pub mod store;

pub use model::{Drink, DrinkChanges, DrinkId, DrinkLong, DrinkShort, Ingredient, NewDrink};
pub use store::{DrinkStore, StoreError};
