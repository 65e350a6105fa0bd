mod attribute_name;
mod data_stores;
mod email;
mod error;
mod ingredient;
mod password;
mod recipe;
mod tag;
mod user;
mod user_id;
mod user_password_hash;

pub use attribute_name::*;
pub use data_stores::*;
pub use email::*;
pub use error::*;
pub use ingredient::*;
pub use password::*;
pub use recipe::*;
pub use tag::*;
pub use user::*;
pub use user_id::*;
pub use user_password_hash::*;
