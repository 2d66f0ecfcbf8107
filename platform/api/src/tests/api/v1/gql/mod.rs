mod feed;
mod photo;
mod user;
