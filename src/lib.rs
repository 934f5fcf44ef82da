mod connect;
mod dao;
mod entity;
mod error;
mod executor;
mod page;
mod registry;
mod schema;
mod statement;
mod transaction;
mod util;
mod value;

pub use connect::*;
pub use dao::*;
pub use entity::*;
pub use error::*;
pub use page::*;
pub use registry::*;
pub use schema::*;
pub use statement::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
