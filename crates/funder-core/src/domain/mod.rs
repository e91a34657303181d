//! 펀드 기준가 수집을 위한 도메인 모델.

mod archive;
mod fund;
mod net_value;

pub use archive::*;
pub use fund::*;
pub use net_value::*;
