mod comment;
mod memory;
mod photo;
mod postgres;
mod store;
mod user;

pub use comment::*;
pub use memory::*;
pub use photo::*;
pub use postgres::*;
pub use store::*;
pub use user::*;
