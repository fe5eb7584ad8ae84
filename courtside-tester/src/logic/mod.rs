pub mod coach;
pub mod reports;
pub mod rosters;
pub mod seeds;
pub mod tester;

pub use seeds::resolve_seed_inputs;
pub use tester::*;
