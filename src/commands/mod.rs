pub mod keygen_command;
pub mod simulate_command;

pub use self::{keygen_command::*, simulate_command::*};
