pub mod util;

pub use util::{play_log_digest, split_csv};
