use super::{Direction, Filter, Grouping, Paging, Sorting};

/// A structured select request against one root entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Name of the root entity
    pub entity: String,

    pub filter: Filter,

    /// Projected member paths. Empty selects every mapped column of the
    /// root entity and its ancestors.
    pub members: Vec<String>,

    pub sorting: Vec<Sorting>,

    pub grouping: Option<Grouping>,

    pub paging: Option<Paging>,
}

impl Query {
    pub fn new(entity: impl Into<String>) -> Query {
        Query {
            entity: entity.into(),
            filter: Filter::all(),
            members: vec![],
            sorting: vec![],
            grouping: None,
            paging: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Query {
        self.filter = filter.into();
        self
    }

    pub fn members(mut self, members: impl IntoIterator<Item = impl Into<String>>) -> Query {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, member: impl Into<String>, direction: Direction) -> Query {
        self.sorting.push(Sorting {
            members: vec![member.into()],
            direction,
        });
        self
    }

    pub fn sorting(mut self, sorting: Sorting) -> Query {
        self.sorting.push(sorting);
        self
    }

    pub fn group(mut self, grouping: Grouping) -> Query {
        self.grouping = Some(grouping);
        self
    }

    pub fn page(mut self, index: u64, size: u64) -> Query {
        self.paging = Some(Paging::page(index, size));
        self
    }

    pub fn paging(mut self, paging: Paging) -> Query {
        self.paging = Some(paging);
        self
    }
}
