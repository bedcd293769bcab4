pub mod check;
pub mod config;
pub mod corpus;
pub mod generate;
pub mod serve;
