pub mod companies;
pub mod documents;
pub mod email;
pub mod health;
pub mod logos;
pub mod plants;
pub mod report;
