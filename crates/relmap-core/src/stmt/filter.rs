use super::Condition;

/// A boolean filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Condition(Condition),

    Composite(Combinator, Vec<Filter>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Filter {
    /// A filter with no restriction.
    pub fn all() -> Filter {
        Filter::Composite(Combinator::And, vec![])
    }

    pub fn and(filters: impl IntoIterator<Item = impl Into<Filter>>) -> Filter {
        Filter::Composite(Combinator::And, filters.into_iter().map(Into::into).collect())
    }

    pub fn or(filters: impl IntoIterator<Item = impl Into<Filter>>) -> Filter {
        Filter::Composite(Combinator::Or, filters.into_iter().map(Into::into).collect())
    }

    /// Returns true if the tree holds no conditions at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::Condition(_) => false,
            Filter::Composite(_, children) => children.iter().all(Filter::is_empty),
        }
    }

    /// Every condition in the tree, depth first, left to right.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut ret = vec![];
        self.collect_conditions(&mut ret);
        ret
    }

    fn collect_conditions<'a>(&'a self, dst: &mut Vec<&'a Condition>) {
        match self {
            Filter::Condition(condition) => dst.push(condition),
            Filter::Composite(_, children) => {
                for child in children {
                    child.collect_conditions(dst);
                }
            }
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::all()
    }
}

impl From<Condition> for Filter {
    fn from(value: Condition) -> Self {
        Filter::Condition(value)
    }
}
