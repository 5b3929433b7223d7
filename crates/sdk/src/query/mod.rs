//! Generic get/list queries over the indexing service.

mod addresses;
mod handler;
mod paging;
mod request;

pub use addresses::*;
pub use handler::*;
pub use paging::*;
pub use request::*;
