use super::Filter;

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    /// Group key members
    pub members: Vec<String>,

    /// Filter applied to the groups
    pub having: Filter,
}

impl Grouping {
    pub fn by(members: impl IntoIterator<Item = impl Into<String>>) -> Grouping {
        Grouping {
            members: members.into_iter().map(Into::into).collect(),
            having: Filter::all(),
        }
    }

    pub fn having(mut self, filter: impl Into<Filter>) -> Grouping {
        self.having = filter.into();
        self
    }
}
