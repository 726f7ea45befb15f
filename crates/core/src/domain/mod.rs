pub mod draft;
pub mod records;
