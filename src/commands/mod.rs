pub mod blanks;
pub mod trim;
