pub mod comment;
pub mod mutation_response;
pub mod photo;
pub mod user;
