pub mod gateway;
pub mod routes;

pub use gateway::{AskResponse, Gateway, EMPTY_QUERY_MESSAGE};
pub use routes::{router, serve};
