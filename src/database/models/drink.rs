use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One recipe entry: how many parts of which ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// A drink on the menu. The store keeps `recipe` as serialized JSON text;
/// by the time a `Drink` exists the list has already been decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Abbreviated recipe entry for the public listing: ingredient names are
/// withheld, color and proportions are enough to render a glass.
#[derive(Debug, Serialize)]
pub struct IngredientShort<'a> {
    pub color: &'a str,
    pub parts: i64,
}

/// Abbreviated drink representation.
#[derive(Debug, Serialize)]
pub struct DrinkShort<'a> {
    pub id: i64,
    pub title: &'a str,
    pub recipe: Vec<IngredientShort<'a>>,
}

/// Full drink representation, including ingredient names.
#[derive(Debug, Serialize)]
pub struct DrinkLong<'a> {
    pub id: i64,
    pub title: &'a str,
    pub recipe: &'a [Ingredient],
}

impl Drink {
    pub fn short(&self) -> DrinkShort<'_> {
        DrinkShort {
            id: self.id,
            title: &self.title,
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientShort {
                    color: &i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> DrinkLong<'_> {
        DrinkLong {
            id: self.id,
            title: &self.title,
            recipe: &self.recipe,
        }
    }
}

/// Payload for creating a drink.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Partial update payload; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("title must not be blank")]
    BlankTitle,

    #[error("ingredient name must not be blank")]
    BlankIngredientName,

    #[error("ingredient color must not be blank")]
    BlankIngredientColor,

    #[error("ingredient parts must be at least 1, got {0}")]
    InvalidParts(i64),
}

pub fn validate(title: &str, recipe: &[Ingredient]) -> Result<(), ValidationError> {
    validate_title(title)?;
    validate_recipe(recipe)
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    Ok(())
}

pub fn validate_recipe(recipe: &[Ingredient]) -> Result<(), ValidationError> {
    for ingredient in recipe {
        if ingredient.name.trim().is_empty() {
            return Err(ValidationError::BlankIngredientName);
        }
        if ingredient.color.trim().is_empty() {
            return Err(ValidationError::BlankIngredientColor);
        }
        if ingredient.parts < 1 {
            return Err(ValidationError::InvalidParts(ingredient.parts));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Drink {
        Drink {
            id: 1,
            title: "Water".to_string(),
            recipe: vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        }
    }

    #[test]
    fn short_withholds_ingredient_names() {
        let value = serde_json::to_value(water().short()).unwrap();
        assert_eq!(value["title"], "Water");
        assert_eq!(value["recipe"][0]["color"], "blue");
        assert_eq!(value["recipe"][0]["parts"], 1);
        assert!(value["recipe"][0].get("name").is_none());
    }

    #[test]
    fn long_keeps_the_full_recipe() {
        let value = serde_json::to_value(water().long()).unwrap();
        assert_eq!(value["recipe"][0]["name"], "water");
        assert_eq!(value["recipe"][0]["color"], "blue");
        assert_eq!(value["recipe"][0]["parts"], 1);
    }

    #[test]
    fn create_payload_deserializes_from_the_wire_shape() {
        let draft: NewDrink = serde_json::from_str(
            r#"{"title":"Water","recipe":[{"name":"water","color":"blue","parts":1}]}"#,
        )
        .unwrap();
        assert_eq!(draft.title, "Water");
        assert_eq!(draft.recipe.len(), 1);
        assert_eq!(draft.recipe[0].parts, 1);
    }

    #[test]
    fn validation_rejects_blank_and_nonsense_fields() {
        let good = water().recipe;
        assert_eq!(validate("  ", &good), Err(ValidationError::BlankTitle));

        let nameless = vec![Ingredient {
            name: "".to_string(),
            color: "blue".to_string(),
            parts: 1,
        }];
        assert_eq!(
            validate("Water", &nameless),
            Err(ValidationError::BlankIngredientName)
        );

        let zero_parts = vec![Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 0,
        }];
        assert_eq!(
            validate("Water", &zero_parts),
            Err(ValidationError::InvalidParts(0))
        );
    }

    #[test]
    fn an_empty_recipe_list_is_allowed() {
        assert!(validate("Espresso", &[]).is_ok());
    }

    #[test]
    fn changes_know_when_they_are_empty() {
        assert!(DrinkChanges::default().is_empty());
        let retitle = DrinkChanges {
            title: Some("Mud".to_string()),
            recipe: None,
        };
        assert!(!retitle.is_empty());
    }
}
