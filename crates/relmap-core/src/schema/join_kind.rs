use serde::Deserialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
}

impl JoinKind {
    pub fn is_inner(self) -> bool {
        matches!(self, JoinKind::Inner)
    }

    pub fn is_left(self) -> bool {
        matches!(self, JoinKind::Left)
    }
}
