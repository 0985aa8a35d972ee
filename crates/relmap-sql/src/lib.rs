mod coerce;
pub use coerce::coerce;

mod flavor;
pub use flavor::Flavor;

pub mod serializer;
pub use serializer::Serializer;

pub mod stmt;
pub use stmt::Statement;
