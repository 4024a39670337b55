pub mod company;
pub mod plant;
pub mod report;
