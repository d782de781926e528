//! Tier ladder and narrative arc lifecycle.

use super::*;
use studio_core::{ArcState, OutcomeCategory, PartnerId, PartnerKind, Stance};

/// Weeks between an awards-worthy release and the end of awards season.
pub const AWARDS_SEASON_WEEKS: u32 = 4;
/// Critical score that puts a picture on the awards circuit.
pub const AWARDS_CIRCUIT_CRITICAL: f32 = 75.0;
/// Script quality that turns an acquisition into a passion project.
pub const PASSION_PROJECT_QUALITY: f32 = 8.5;

/// Events the arc manager reacts to beyond explicit arc starts.
#[derive(Clone, Debug)]
pub(super) enum ArcTrigger {
    Released {
        project: ProjectId,
        outcome: OutcomeCategory,
        critical: f32,
        partner: Option<PartnerId>,
    },
    StanceChanged {
        partner: PartnerId,
    },
    WeekEnded,
}

impl StudioManager {
    /// Climb the tier ladder one gate at a time. Returns the new tier when
    /// it changed.
    pub(super) fn evaluate_tier(&mut self) -> Option<Tier> {
        let start = self.state.tier;
        while let Some(next) = self.state.tier.next() {
            let Some(gate) = next.entry_gate() else {
                break;
            };
            if !gate.is_met(self.state.releases, self.state.heat) {
                break;
            }
            self.state.tier = next;
            info!(tier = %next, releases = self.state.releases, heat = self.state.heat, "tier advanced");
            let description = format!("{} rises to {next}", self.state.studio_name);
            self.record(ChronicleCategory::TierAdvance, description);
        }
        (self.state.tier != start).then_some(self.state.tier)
    }

    /// Start an arc unless one of the same kind is already active for the
    /// subject. Returns whether it started.
    pub(super) fn start_arc(&mut self, kind: ArcKind, subject: ArcSubject) -> bool {
        if self.state.active_arc(kind, &subject).is_some() {
            return false;
        }
        info!(arc = %kind, ?subject, "arc started");
        self.state.arcs.push(NarrativeArc {
            kind,
            state: ArcState::Active,
            subject,
            started_week: self.state.week,
            resolved_week: None,
        });
        true
    }

    fn resolve_arc(&mut self, kind: ArcKind, subject: &ArcSubject, heat: f32, summary: &str) {
        let week = self.state.week;
        let Some(arc) = self
            .state
            .arcs
            .iter_mut()
            .find(|a| a.is_active() && a.kind == kind && &a.subject == subject)
        else {
            return;
        };
        arc.state = ArcState::Resolved;
        arc.resolved_week = Some(week);
        self.adjust_heat(heat);
        info!(arc = %kind, ?subject, heat, "arc resolved");
        self.record(
            ChronicleCategory::ArcResolution,
            format!("{kind} resolved: {summary}"),
        );
    }

    fn set_stance(&mut self, partner: &PartnerId, stance: Stance) {
        if let Some(p) = self.state.partner_mut(partner) {
            p.stance = stance;
        }
    }

    /// Resolve the arcs `trigger` completes, then start the ones it ignites.
    /// Returns the kinds resolved.
    pub(super) fn process_arcs(&mut self, trigger: ArcTrigger) -> Vec<ArcKind> {
        let mut resolved = Vec::new();
        match trigger {
            ArcTrigger::Released {
                project,
                outcome,
                critical,
                partner,
            } => {
                let subject = ArcSubject::Project(project);
                for kind in [
                    ArcKind::FranchisePivot,
                    ArcKind::LeakPiracy,
                    ArcKind::TalentMeltdown,
                    ArcKind::PassionProject,
                ] {
                    if self.state.active_arc(kind, &subject).is_none() {
                        continue;
                    }
                    let (heat, summary) = match kind {
                        ArcKind::FranchisePivot if outcome >= OutcomeCategory::Hit => {
                            (6.0, "the franchise found its audience")
                        }
                        ArcKind::FranchisePivot => (-2.0, "the franchise stumbled"),
                        ArcKind::LeakPiracy => (2.0, "the leak turned into free publicity"),
                        ArcKind::TalentMeltdown => (1.0, "the set drama is behind us"),
                        ArcKind::PassionProject if critical >= 70.0 => {
                            (6.0, "critics embraced the passion project")
                        }
                        _ => (1.0, "a labor of love, modestly received"),
                    };
                    self.resolve_arc(kind, &subject, heat, summary);
                    resolved.push(kind);
                }

                if let Some(partner) = partner {
                    let partner_subject = ArcSubject::Partner(partner.clone());
                    if outcome >= OutcomeCategory::Hit
                        && self
                            .state
                            .active_arc(ArcKind::ExhibitorPowerPlay, &partner_subject)
                            .is_some()
                    {
                        self.set_stance(&partner, Stance::Respectful);
                        self.resolve_arc(
                            ArcKind::ExhibitorPowerPlay,
                            &partner_subject,
                            3.0,
                            "the exhibitor is courting us now",
                        );
                        resolved.push(ArcKind::ExhibitorPowerPlay);
                    }
                    if outcome == OutcomeCategory::Blockbuster
                        && self
                            .state
                            .active_arc(ArcKind::ExhibitorWar, &partner_subject)
                            .is_some()
                    {
                        self.set_stance(&partner, Stance::Neutral);
                        self.resolve_arc(
                            ArcKind::ExhibitorWar,
                            &partner_subject,
                            5.0,
                            "a blockbuster ended the standoff",
                        );
                        resolved.push(ArcKind::ExhibitorWar);
                    }
                }

                if critical >= AWARDS_CIRCUIT_CRITICAL {
                    self.start_arc(ArcKind::AwardsCircuit, subject);
                }
            }
            ArcTrigger::StanceChanged { partner } => {
                let kind = match self.state.partner(&partner) {
                    Some(p) if p.kind == PartnerKind::Exhibitor => match p.stance {
                        Stance::Competitive => Some(ArcKind::ExhibitorPowerPlay),
                        Stance::Hostile => Some(ArcKind::ExhibitorWar),
                        Stance::Neutral | Stance::Respectful => None,
                    },
                    _ => None,
                };
                if let Some(kind) = kind {
                    self.start_arc(kind, ArcSubject::Partner(partner));
                }
            }
            ArcTrigger::WeekEnded => {
                let week = self.state.week;
                let due: Vec<ArcSubject> = self
                    .state
                    .arcs
                    .iter()
                    .filter(|a| {
                        a.is_active()
                            && a.kind == ArcKind::AwardsCircuit
                            && week >= a.started_week + AWARDS_SEASON_WEEKS
                    })
                    .map(|a| a.subject.clone())
                    .collect();
                for subject in due {
                    let wins = match &subject {
                        ArcSubject::Project(id) => self
                            .state
                            .project(id)
                            .and_then(|p| p.release.as_ref())
                            .map(|r| r.awards_wins)
                            .unwrap_or(0),
                        _ => 0,
                    };
                    let heat = (2 * wins).max(1) as f32;
                    let summary = format!("awards season closed with {wins} win(s)");
                    self.resolve_arc(ArcKind::AwardsCircuit, &subject, heat, &summary);
                    resolved.push(ArcKind::AwardsCircuit);
                }

                let control = self
                    .state
                    .arcs
                    .iter()
                    .find(|a| a.is_active() && a.kind == ArcKind::FinancierControl)
                    .map(|a| a.subject.clone());
                let solvent = self.state.cash() >= Decimal::ZERO;
                match control {
                    Some(subject) if solvent => {
                        let financiers: Vec<PartnerId> = self
                            .state
                            .partners
                            .iter()
                            .filter(|p| p.kind == PartnerKind::Financier)
                            .map(|p| p.id.clone())
                            .collect();
                        for id in &financiers {
                            self.set_stance(id, Stance::Neutral);
                        }
                        self.resolve_arc(
                            ArcKind::FinancierControl,
                            &subject,
                            -3.0,
                            "the books are back in the black",
                        );
                        resolved.push(ArcKind::FinancierControl);
                    }
                    None if !solvent => {
                        let subject = self
                            .state
                            .partners
                            .iter()
                            .find(|p| p.kind == PartnerKind::Financier)
                            .map(|p| ArcSubject::Partner(p.id.clone()))
                            .unwrap_or(ArcSubject::Studio);
                        self.start_arc(ArcKind::FinancierControl, subject);
                    }
                    _ => {}
                }
            }
        }
        resolved
    }
}
