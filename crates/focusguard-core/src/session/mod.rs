mod machine;

pub use machine::{Session, SessionKind};
