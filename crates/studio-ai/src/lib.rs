#![deny(warnings)]

//! Heuristic advisor for a studio run.
//!
//! The scoring functions rank crisis and decision options; [`Autopilot`]
//! strings them together with simple slate management to play whole weeks
//! headlessly, against a bare [`studio_runtime::StudioManager`] or a
//! persisted [`studio_runtime::Session`].

pub mod autopilot;

pub use autopilot::{Autopilot, StudioDriver, TurnSummary};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use studio_core::{Crisis, CrisisOption, DecisionItem, DecisionOption, OptionId};

/// Below this much cash every dollar counts three times as much.
const TIGHT_CASH: Decimal = Decimal::from_parts(2_000_000, 0, 0, false, 0);

/// Knobs for the autopilot. Missing YAML keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotPolicy {
    /// Cash that discretionary spending never touches.
    pub cash_reserve: Decimal,
    /// Marketing spend as a share of the production budget.
    pub marketing_share: Decimal,
    /// Largest talent fee as a share of the production budget before the
    /// advisor settles for the cheapest option.
    pub talent_share: Decimal,
    /// Unreleased projects the slate may carry at once.
    pub max_active_projects: usize,
    /// Scripts below this quality are passed.
    pub min_script_quality: f32,
    pub pursue_sequels: bool,
}

impl Default for AutopilotPolicy {
    fn default() -> Self {
        Self {
            cash_reserve: Decimal::new(2_000_000, 0),
            marketing_share: Decimal::new(4, 1),
            talent_share: Decimal::new(25, 2),
            max_active_projects: 3,
            min_script_quality: 6.5,
            pursue_sequels: true,
        }
    }
}

impl AutopilotPolicy {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

fn millions(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0) / 1_000_000.0
}

/// Utility of a crisis option: cash matters most, lost weeks and quality
/// follow. Cash is weighted up when the studio is short.
pub fn crisis_option_score(option: &CrisisOption, cash: Decimal) -> f64 {
    let cash_weight = if cash < TIGHT_CASH { 3.0 } else { 1.0 };
    cash_weight * millions(option.cash_delta) - 0.15 * f64::from(option.schedule_delta)
        + 0.8 * f64::from(option.quality_delta)
}

/// Utility of a decision option.
pub fn decision_option_score(option: &DecisionOption) -> f64 {
    millions(option.cash_delta) + 0.25 * f64::from(option.heat_delta)
}

/// Best way out of `crisis` for a studio holding `cash`.
pub fn choose_crisis_option(crisis: &Crisis, cash: Decimal) -> Option<&OptionId> {
    crisis
        .options
        .iter()
        .map(|o| (o, crisis_option_score(o, cash)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(o, _)| &o.id)
}

/// Best answer to a decision.
pub fn choose_decision_option(item: &DecisionItem) -> Option<&OptionId> {
    item.options
        .iter()
        .map(|o| (o, decision_option_score(o)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(o, _)| &o.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use studio_core::{CrisisId, DecisionId, Severity};

    fn option(id: &str, cash: i64, weeks: i32, quality: f32) -> CrisisOption {
        CrisisOption {
            id: OptionId::from(id),
            label: id.to_string(),
            preview: String::new(),
            cash_delta: Decimal::new(cash, 0),
            schedule_delta: weeks,
            quality_delta: quality,
        }
    }

    fn crisis(options: Vec<CrisisOption>) -> Crisis {
        Crisis {
            id: CrisisId::from("crisis-1"),
            title: "Lead walks off".to_string(),
            body: String::new(),
            severity: Severity::High,
            project_id: None,
            arc_hook: None,
            options,
            raised_week: 1,
        }
    }

    #[test]
    fn short_studio_saves_cash() {
        let c = crisis(vec![
            option("meet-demands", -400_000, 0, 0.0),
            option("shoot-around", 0, 1, -0.2),
        ]);
        let rich = Decimal::new(20_000_000, 0);
        let poor = Decimal::new(500_000, 0);
        assert_eq!(choose_crisis_option(&c, poor).unwrap().as_str(), "shoot-around");
        assert!(
            crisis_option_score(&c.options[0], rich) > crisis_option_score(&c.options[0], poor)
        );
    }

    #[test]
    fn decision_prefers_money_over_small_heat() {
        let item = DecisionItem {
            id: DecisionId::from("decision-1"),
            title: "Streaming license".to_string(),
            body: String::new(),
            weeks_until_expiry: 2,
            default_option: Some(OptionId::from("decline")),
            options: vec![
                DecisionOption {
                    id: OptionId::from("accept"),
                    label: "Accept".to_string(),
                    preview: String::new(),
                    cash_delta: Decimal::new(1_500_000, 0),
                    heat_delta: -2.0,
                },
                DecisionOption {
                    id: OptionId::from("decline"),
                    label: "Decline".to_string(),
                    preview: String::new(),
                    cash_delta: Decimal::ZERO,
                    heat_delta: 1.0,
                },
            ],
        };
        assert_eq!(choose_decision_option(&item).unwrap().as_str(), "accept");
    }

    #[test]
    fn policy_yaml_fills_defaults() {
        let p = AutopilotPolicy::from_yaml("max_active_projects: 5\ncash_reserve: \"500000\"\n")
            .unwrap();
        assert_eq!(p.max_active_projects, 5);
        assert_eq!(p.cash_reserve, Decimal::new(500_000, 0));
        assert_eq!(p.marketing_share, AutopilotPolicy::default().marketing_share);
    }

    proptest! {
        #[test]
        fn chosen_option_scores_highest(
            deltas in proptest::collection::vec((-2_000_000i64..2_000_000, -3i32..4, -1.0f32..1.0), 1..5),
            cash in -1_000_000i64..30_000_000,
        ) {
            let options: Vec<CrisisOption> = deltas
                .iter()
                .enumerate()
                .map(|(i, (c, w, q))| option(&format!("opt-{i}"), *c, *w, *q))
                .collect();
            let c = crisis(options);
            let cash = Decimal::new(cash, 0);
            let chosen = choose_crisis_option(&c, cash).unwrap();
            let best = c.option(chosen).map(|o| crisis_option_score(o, cash)).unwrap();
            for o in &c.options {
                prop_assert!(crisis_option_score(o, cash) <= best);
            }
        }
    }
}
