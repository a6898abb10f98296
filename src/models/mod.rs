pub mod portfolio;
pub mod token;
pub mod vault;
