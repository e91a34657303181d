//! 기준가(NAV) 정밀도 유틸리티.
//!
//! 기준가는 저장소에서 `NUMERIC(8, 4)`로 표현됩니다.
//! 전체 유효숫자 8자리 중 소수부 4자리, 정수부 최대 4자리입니다.

use rust_decimal::{Decimal, RoundingStrategy};

/// 기준가 타입.
pub type Nav = Decimal;

/// 소수부 자릿수.
pub const NAV_SCALE: u32 = 4;

/// 전체 유효숫자 자릿수.
pub const NAV_PRECISION: u32 = 8;

/// 저장 정밀도에 맞춰 반올림합니다.
///
/// PostgreSQL `NUMERIC` 반올림과 동일하게 0.5는 0에서 먼 쪽으로 올립니다.
pub fn quantize_nav(value: Decimal) -> Nav {
    value.round_dp_with_strategy(NAV_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 값이 `NUMERIC(8, 4)` 범위에 들어가는지 확인합니다.
pub fn fits_nav_precision(value: Decimal) -> bool {
    let limit = Decimal::from(10_i64.pow(NAV_PRECISION - NAV_SCALE));
    quantize_nav(value).abs() < limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantize_nav() {
        assert_eq!(quantize_nav(dec!(1.23456)), dec!(1.2346));
        assert_eq!(quantize_nav(dec!(1.23455)), dec!(1.2346));
        assert_eq!(quantize_nav(dec!(-1.23455)), dec!(-1.2346));
        assert_eq!(quantize_nav(dec!(1.2)), dec!(1.2));
    }

    #[test]
    fn test_fits_nav_precision() {
        assert!(fits_nav_precision(dec!(9999.9999)));
        assert!(fits_nav_precision(dec!(-9999.9999)));
        assert!(!fits_nav_precision(dec!(10000)));
        // 반올림 후 자릿수가 넘치는 경우
        assert!(!fits_nav_precision(dec!(9999.99995)));
    }
}
