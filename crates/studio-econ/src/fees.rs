//! Talent fee quotes.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use studio_core::{Talent, Tier};

/// Largest discount heat can earn on a fee.
pub const MAX_HEAT_DISCOUNT: f64 = 0.2;

/// Heat a studio needs before a star will take the meeting.
///
/// Talent with power above 7 requires `(power - 7) * 20` heat.
pub fn required_heat(power: f32) -> f32 {
    if power > 7.0 {
        (power - 7.0) * 20.0
    } else {
        0.0
    }
}

/// Fee the studio must pay to attach `talent`.
///
/// Bigger studios pay an agent premium; hot studios get a discount of up to
/// 20% (linear in heat).
pub fn quote_fee(talent: &Talent, heat: f32, tier: Tier) -> Decimal {
    let discount = (f64::from(heat.clamp(0.0, 100.0)) / 100.0 * MAX_HEAT_DISCOUNT)
        .clamp(0.0, MAX_HEAT_DISCOUNT);
    let factor = 1.0 + tier.fee_premium() - discount;
    let factor = Decimal::from_f64(factor).unwrap_or(Decimal::ONE);
    (talent.fee * factor).round_dp(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use studio_core::{TalentId, TalentRole};

    fn talent(fee: i64, power: f32) -> Talent {
        Talent {
            id: TalentId::from("tal-1"),
            name: "Rosa Quill".to_string(),
            role: TalentRole::Actor,
            fee: Decimal::new(fee, 0),
            power,
            committed_to: None,
        }
    }

    #[test]
    fn cold_indie_pays_list_price() {
        let t = talent(1_000_000, 5.0);
        assert_eq!(quote_fee(&t, 0.0, Tier::IndieStudio), Decimal::new(1_000_000, 0));
        assert_eq!(quote_fee(&t, 100.0, Tier::IndieStudio), Decimal::new(800_000, 0));
        assert_eq!(quote_fee(&t, 0.0, Tier::MajorStudio), Decimal::new(1_200_000, 0));
    }

    #[test]
    fn stars_need_heat() {
        assert_eq!(required_heat(6.0), 0.0);
        assert_eq!(required_heat(7.0), 0.0);
        assert!((required_heat(9.0) - 40.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn fee_within_bounds(fee in 0i64..50_000_000, heat in 0.0f32..100.0) {
            let t = talent(fee, 5.0);
            let q = quote_fee(&t, heat, Tier::IndieStudio);
            prop_assert!(q <= t.fee);
            prop_assert!(q >= (t.fee * Decimal::new(8, 1)).round_dp(0));
        }

        #[test]
        fn hotter_studio_never_pays_more(fee in 1i64..50_000_000, h in 0.0f32..90.0, dh in 0.0f32..10.0) {
            let t = talent(fee, 5.0);
            prop_assert!(quote_fee(&t, h + dh, Tier::MidTier) <= quote_fee(&t, h, Tier::MidTier));
        }
    }
}
