//! Fuzzy mapping of free text onto closed enumerations.

mod mapper;
pub mod similarity;

pub use mapper::EnumMapper;
pub use similarity::similarity;
