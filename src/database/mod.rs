pub mod models;
pub mod store;

pub use models::{Drink, DrinkChanges, Ingredient, NewDrink};
pub use store::{DrinkStore, StoreError};
