#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort members sharing one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Sorting {
    pub members: Vec<String>,
    pub direction: Direction,
}

impl Sorting {
    pub fn asc(members: impl IntoIterator<Item = impl Into<String>>) -> Sorting {
        Sorting {
            members: members.into_iter().map(Into::into).collect(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(members: impl IntoIterator<Item = impl Into<String>>) -> Sorting {
        Sorting {
            members: members.into_iter().map(Into::into).collect(),
            direction: Direction::Desc,
        }
    }
}
