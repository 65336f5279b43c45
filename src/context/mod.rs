pub mod storage;

pub use storage::{ReferenceContext, ReferenceStore};
