pub mod choice;
pub mod pagination;
pub mod question;
