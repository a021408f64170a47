//! Problem models solved by the search.

mod facility;
mod integer;
mod knapsack;

pub use facility::FacilityLocation;
pub use integer::IntegerProgram;
pub use knapsack::KnapsackProblem;
