mod create_token;
mod create_user;
mod me;

pub use create_token::*;
pub use create_user::*;
pub use me::*;
