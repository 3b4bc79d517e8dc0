//! Policy portfolio: data types, CSV persistence, and synthetic generation

mod data;
pub mod generate;
pub mod loader;

pub use data::{
    DecrementEvent, Gender, Policy, PolicyStatus, SimulatedOutcome, SimulatedPolicy,
};
pub use generate::{generate_portfolio, PortfolioConfig};
