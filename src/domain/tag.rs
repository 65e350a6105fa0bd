use super::{AttributeName, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub user_id: UserId,
    pub name: AttributeName,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)
    }
}

#[test]
fn test_tag_displays_as_name() {
    let tag = Tag {
        id: 1,
        user_id: UserId::default(),
        name: AttributeName::parse("Vegan".to_owned()).unwrap(),
    };
    assert_eq!(tag.to_string(), "Vegan");
}
