#[macro_use]
mod macros;

pub mod cost;
pub mod emission;
pub mod energy;
pub mod power;
pub mod price;
mod zero;

pub use self::zero::Zero;
