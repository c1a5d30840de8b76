pub mod convert;
pub mod init;
pub mod paginate;

pub use convert::{convert, ConvertArgs};
pub use init::{init, InitArgs};
pub use paginate::{paginate, PaginateArgs};
