pub mod check;
pub mod token;
