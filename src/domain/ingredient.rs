use super::{AttributeName, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    pub user_id: UserId,
    pub name: AttributeName,
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)
    }
}

#[test]
fn test_ingredient_displays_as_name() {
    let ingredient = Ingredient {
        id: 1,
        user_id: UserId::default(),
        name: AttributeName::parse("Cucumber".to_owned()).unwrap(),
    };
    assert_eq!(ingredient.to_string(), "Cucumber");
}
