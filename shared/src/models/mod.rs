//! Domain models for the Farm Ledger

mod costs;
mod crop_cycle;
mod harvest;
mod improvement;
mod machinery;
mod operation;
mod property;
mod user;

pub use costs::*;
pub use crop_cycle::*;
pub use harvest::*;
pub use improvement::*;
pub use machinery::*;
pub use operation::*;
pub use property::*;
pub use user::*;
