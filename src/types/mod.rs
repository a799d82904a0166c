pub mod rating;
pub mod status;
pub mod timestamp;
pub mod uuid;

pub mod author;
pub mod book;
pub mod series;
