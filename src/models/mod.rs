mod activity;
mod admin;
mod product;
mod transaction;
mod user;

pub use activity::*;
pub use admin::*;
pub use product::*;
pub use transaction::*;
pub use user::*;
