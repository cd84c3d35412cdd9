pub mod driver;
pub mod source;
pub mod timeline;

pub use driver::Sim;
pub use source::Source;
pub use timeline::{EventKey, EventKind, EventQueue};
