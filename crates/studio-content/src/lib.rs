#![deny(warnings)]

//! Content catalogs: crisis and decision templates, the script pool, the
//! starting talent roster and partner list.
//!
//! Catalogs ship embedded in the binary and can be overridden per file from a
//! directory of YAML files with the same names.

pub mod embedded;

use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use studio_core::{
    ArcKind, Crisis, CrisisId, CrisisOption, DecisionId, DecisionItem, DecisionOption, Genre,
    OptionId, Partner, PartnerId, PartnerKind, ProjectId, Script, ScriptId, Severity, Stance,
    Talent, TalentId, TalentRole,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid yaml in {file}: {message}")]
    InvalidYaml { file: String, message: String },
    #[error("catalog {0} is empty")]
    Empty(&'static str),
    #[error("invalid content: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ContentError {
    fn from(e: std::io::Error) -> Self {
        ContentError::Io(e.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrisisOptionTemplate {
    pub key: String,
    pub label: String,
    pub preview: String,
    pub cash_delta: Decimal,
    pub schedule_delta: i32,
    pub quality_delta: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrisisTemplate {
    pub key: String,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub arc_hook: Option<ArcKind>,
    pub options: Vec<CrisisOptionTemplate>,
}

impl CrisisTemplate {
    pub fn instantiate(&self, id: CrisisId, project: Option<ProjectId>, week: u32) -> Crisis {
        Crisis {
            id,
            title: self.title.clone(),
            body: self.body.clone(),
            severity: self.severity,
            project_id: project,
            arc_hook: self.arc_hook,
            options: self
                .options
                .iter()
                .map(|o| CrisisOption {
                    id: OptionId::new(o.key.clone()),
                    label: o.label.clone(),
                    preview: o.preview.clone(),
                    cash_delta: o.cash_delta,
                    schedule_delta: o.schedule_delta,
                    quality_delta: o.quality_delta,
                })
                .collect(),
            raised_week: week,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionOptionTemplate {
    pub key: String,
    pub label: String,
    pub preview: String,
    pub cash_delta: Decimal,
    pub heat_delta: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTemplate {
    pub key: String,
    pub title: String,
    pub body: String,
    pub weeks_until_expiry: i32,
    pub default_option: Option<String>,
    pub options: Vec<DecisionOptionTemplate>,
}

impl DecisionTemplate {
    pub fn instantiate(&self, id: DecisionId) -> DecisionItem {
        DecisionItem {
            id,
            title: self.title.clone(),
            body: self.body.clone(),
            weeks_until_expiry: self.weeks_until_expiry,
            default_option: self.default_option.clone().map(OptionId::new),
            options: self
                .options
                .iter()
                .map(|o| DecisionOption {
                    id: OptionId::new(o.key.clone()),
                    label: o.label.clone(),
                    preview: o.preview.clone(),
                    cash_delta: o.cash_delta,
                    heat_delta: o.heat_delta,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptTemplate {
    pub title: String,
    pub genre: Genre,
    pub quality_min: f32,
    pub quality_max: f32,
    pub asking_price: Decimal,
    pub production_budget: Decimal,
}

impl ScriptTemplate {
    /// Offer this script on the market with a rolled quality.
    pub fn roll<R: Rng>(&self, id: ScriptId, rng: &mut R) -> Script {
        let quality = if self.quality_max > self.quality_min {
            rng.gen_range(self.quality_min..=self.quality_max)
        } else {
            self.quality_min
        };
        Script {
            id,
            title: self.title.clone(),
            genre: self.genre,
            // One decimal place keeps coverage notes readable.
            quality: (quality * 10.0).round() / 10.0,
            asking_price: self.asking_price,
            production_budget: self.production_budget,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TalentSeed {
    pub id: String,
    pub name: String,
    pub role: TalentRole,
    pub fee: Decimal,
    pub power: f32,
}

impl TalentSeed {
    pub fn to_talent(&self) -> Talent {
        Talent {
            id: TalentId::new(self.id.clone()),
            name: self.name.clone(),
            role: self.role,
            fee: self.fee,
            power: self.power,
            committed_to: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartnerSeed {
    pub id: String,
    pub name: String,
    pub kind: PartnerKind,
    pub stance: Stance,
}

impl PartnerSeed {
    pub fn to_partner(&self) -> Partner {
        Partner {
            id: PartnerId::new(self.id.clone()),
            name: self.name.clone(),
            kind: self.kind,
            stance: self.stance,
        }
    }
}

/// All catalogs a studio draws from.
#[derive(Debug, Clone)]
pub struct ContentPack {
    pub crises: Vec<CrisisTemplate>,
    pub decisions: Vec<DecisionTemplate>,
    pub scripts: Vec<ScriptTemplate>,
    pub roster: Vec<TalentSeed>,
    pub partners: Vec<PartnerSeed>,
}

fn parse<T: for<'de> Deserialize<'de>>(file: &str, text: &str) -> Result<Vec<T>, ContentError> {
    serde_yaml::from_str(text).map_err(|e| ContentError::InvalidYaml {
        file: file.to_string(),
        message: e.to_string(),
    })
}

fn embedded_text(name: &'static str) -> Result<String, ContentError> {
    embedded::get_yaml(name)
        .map(str::to_string)
        .ok_or_else(|| ContentError::Invalid(format!("no embedded catalog named {name}")))
}

impl ContentPack {
    /// Catalogs shipped with the game.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_sources(embedded_text)
    }

    /// Catalogs from `dir/<name>.yaml`, falling back to the embedded copy for
    /// files that are absent.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        Self::from_sources(|name| {
            let path = dir.join(format!("{name}.yaml"));
            if path.exists() {
                info!("Loading content override: {}", path.display());
                Ok(fs::read_to_string(&path)?)
            } else {
                embedded_text(name)
            }
        })
    }

    fn from_sources<F>(mut source: F) -> Result<Self, ContentError>
    where
        F: FnMut(&'static str) -> Result<String, ContentError>,
    {
        let [crises, decisions, scripts, roster, partners] = embedded::CATALOGS;
        let pack = Self {
            crises: parse(crises, &source(crises)?)?,
            decisions: parse(decisions, &source(decisions)?)?,
            scripts: parse(scripts, &source(scripts)?)?,
            roster: parse(roster, &source(roster)?)?,
            partners: parse(partners, &source(partners)?)?,
        };
        pack.validate()?;
        Ok(pack)
    }

    /// Check cross-field rules YAML alone cannot express.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.crises.is_empty() {
            return Err(ContentError::Empty("crises"));
        }
        if self.scripts.is_empty() {
            return Err(ContentError::Empty("scripts"));
        }
        for c in &self.crises {
            if c.options.is_empty() {
                return Err(ContentError::Invalid(format!("crisis {} has no options", c.key)));
            }
        }
        for d in &self.decisions {
            if d.options.is_empty() {
                return Err(ContentError::Invalid(format!(
                    "decision {} has no options",
                    d.key
                )));
            }
            if let Some(default) = &d.default_option {
                if !d.options.iter().any(|o| &o.key == default) {
                    return Err(ContentError::Invalid(format!(
                        "decision {} defaults to unknown option {default}",
                        d.key
                    )));
                }
            }
        }
        for s in &self.scripts {
            if !(0.0..=10.0).contains(&s.quality_min)
                || !(0.0..=10.0).contains(&s.quality_max)
                || s.quality_min > s.quality_max
            {
                return Err(ContentError::Invalid(format!(
                    "script {} has an invalid quality range",
                    s.title
                )));
            }
            if s.production_budget <= Decimal::ZERO {
                return Err(ContentError::Invalid(format!(
                    "script {} needs a positive budget",
                    s.title
                )));
            }
        }
        for t in &self.roster {
            if !(0.0..=10.0).contains(&t.power) {
                return Err(ContentError::Invalid(format!("talent {} power out of range", t.id)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn builtin_catalogs_parse() {
        let pack = ContentPack::builtin().unwrap();
        assert!(pack.crises.len() >= 5);
        assert!(!pack.decisions.is_empty());
        assert!(pack.roster.iter().any(|t| t.role == TalentRole::Director));
        assert!(pack
            .partners
            .iter()
            .any(|p| p.kind == PartnerKind::Exhibitor));
        assert!(pack.crises.iter().any(|c| c.arc_hook == Some(ArcKind::LeakPiracy)));
    }

    #[test]
    fn crisis_instantiates_with_option_ids() {
        let pack = ContentPack::builtin().unwrap();
        let crisis = pack.crises[0].instantiate(
            CrisisId::from("crisis-1"),
            Some(ProjectId::from("proj-1")),
            4,
        );
        assert_eq!(crisis.options.len(), pack.crises[0].options.len());
        let first = &pack.crises[0].options[0];
        assert!(crisis.option(&OptionId::new(first.key.clone())).is_some());
        assert_eq!(crisis.raised_week, 4);
    }

    #[test]
    fn script_roll_stays_in_range() {
        let pack = ContentPack::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for (i, t) in pack.scripts.iter().enumerate() {
            let s = t.roll(ScriptId::new(format!("script-{i}")), &mut rng);
            assert!(s.quality >= t.quality_min - 0.05 && s.quality <= t.quality_max + 0.05);
        }
    }

    #[test]
    fn dangling_default_option_is_rejected() {
        let mut pack = ContentPack::builtin().unwrap();
        pack.decisions[0].default_option = Some("nope".to_string());
        assert!(matches!(pack.validate(), Err(ContentError::Invalid(_))));
    }

    #[test]
    fn load_dir_falls_back_to_embedded() {
        let dir = std::env::temp_dir().join("studio-content-empty-dir");
        let _ = fs::create_dir_all(&dir);
        let pack = ContentPack::load_dir(&dir).unwrap();
        assert_eq!(pack.scripts.len(), ContentPack::builtin().unwrap().scripts.len());
    }
}
