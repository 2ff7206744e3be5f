pub use super::boss::Entity as Boss;
pub use super::contract::Entity as Contract;
pub use super::task::Entity as Task;
pub use super::user::Entity as User;
