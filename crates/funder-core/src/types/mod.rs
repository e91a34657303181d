//! 공통 값 타입.

mod nav;

pub use nav::*;
