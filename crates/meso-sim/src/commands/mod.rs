pub mod charging;
pub mod ordering;
pub mod prepare;
