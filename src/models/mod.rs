pub mod boss;
pub mod contract;
pub mod task;
pub mod user;
pub mod validation;

pub use boss::*;
pub use contract::*;
pub use task::*;
pub use user::*;
pub use validation::ValidationErrors;
