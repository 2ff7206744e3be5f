pub mod boss;
pub mod contract;
pub mod task;
pub mod user;

pub mod prelude;
pub mod schema;

pub use prelude::*;
