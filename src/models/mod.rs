pub mod request;
pub mod response;
pub mod sections;

pub use request::*;
pub use response::*;
pub use sections::*;
