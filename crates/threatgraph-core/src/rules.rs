use regex::Regex;

use crate::entity::EntityLabel;
use crate::relation::RelationKind;
use crate::Result;

/// One labeled entity pattern. Patterns are fixed configuration compiled
/// once at startup; a malformed pattern is fatal there, never per-record.
#[derive(Debug, Clone)]
pub struct EntityRule {
    pub label: EntityLabel,
    pub pattern: Regex,
}

impl EntityRule {
    pub fn new(label: EntityLabel, pattern: &str) -> Result<Self> {
        Ok(Self {
            label,
            pattern: Regex::new(&format!("(?i){pattern}"))?,
        })
    }
}

/// One relation trigger: a cue-phrase pattern plus the entity labels
/// eligible to become the tail of the emitted triple.
#[derive(Debug, Clone)]
pub struct RelationRule {
    pub kind: RelationKind,
    pub trigger: Regex,
    pub eligible: &'static [EntityLabel],
}

impl RelationRule {
    pub fn new(kind: RelationKind, trigger: &str, eligible: &'static [EntityLabel]) -> Result<Self> {
        Ok(Self {
            kind,
            trigger: Regex::new(&format!("(?i){trigger}"))?,
            eligible,
        })
    }
}

/// The full, ordered rule configuration: label-ordered entity patterns and
/// the relation trigger table. Rule order is match priority within a
/// sentence, but every rule is still applied to every sentence.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub entity_rules: Vec<EntityRule>,
    pub relation_rules: Vec<RelationRule>,
}

impl RuleSet {
    /// Builtin rules for MITRE ATT&CK group descriptions.
    pub fn builtin() -> Result<Self> {
        let mut entity_rules = Vec::new();

        let table: &[(EntityLabel, &[&str])] = &[
            (
                EntityLabel::ActorGroup,
                &[
                    r"\b(APT\d+|APT-\d+)\b",
                    r"\b(Wizard\s+Spider|BRONZE\s+BUTLER|Kimsuky|Naikon|Bluenoroff|Stardust\s+Chollima)\b",
                ],
            ),
            (
                EntityLabel::ToolMalware,
                &[
                    r"\b(Mimikatz|TrickBot|Ryuk|Conti|NESTEGG|NACHOCHEESE|Daserf|xxmm)\b",
                    r"\b(X-Agent|X-Tunnel|WinIDS|Responder|HAMMERTOSS|CHOPSTICK|POSHSPY)\b",
                    r"\b(HIGHNOON|POISONPLUG|HOMEUNIX|PowerShell\s+Empire|WinRAR)\b",
                    r"\b(backdoor|ransomware|malware|implant|web\s+shell)s?\b",
                ],
            ),
            (
                EntityLabel::Technique,
                &[
                    r"\b(spearphishing|phishing)\b",
                    r"\b(credential\s+dumping|credential\s+theft|credential\s+harvesting)\b",
                    r"\b(lateral\s+movement|privilege\s+escalation)\b",
                    r"\b(persistence|exfiltration|timestomping)\b",
                    r"\b(keylogging|password\s+spraying)\b",
                    r"\b(supply\s+chain\s+compromise|web\s+compromise)\b",
                    r"\b(command\s+and\s+control|C2)\b",
                ],
            ),
            (
                EntityLabel::Event,
                &[
                    r"\b(SolarWinds\s+Compromise)\b",
                    r"\b(Bangladesh\s+Bank\s+heist)\b",
                    r"\b(Hillary\s+Clinton\s+campaign)\b",
                    r"\b(Democratic\s+National\s+Committee)\b",
                    r"\b(Democratic\s+Congressional\s+Campaign\s+Committee)\b",
                ],
            ),
            (
                EntityLabel::Victim,
                &[
                    r"\b(Hillary\s+Clinton\s+campaign)\b",
                    r"\b(Democratic\s+National\s+Committee)\b",
                    r"\b(Democratic\s+Congressional\s+Campaign\s+Committee)\b",
                    r"\b(Bangladesh\s+Bank)\b",
                    r"\b(government|military|security\s+organizations)\b",
                ],
            ),
            (
                EntityLabel::Industry,
                &[
                    r"\b(telecommunications?|telecom)\b",
                    r"\b(healthcare|hospital)s?\b",
                    r"\b(technology|tech)\b",
                    r"\b(video\s+game|gaming)\b",
                    r"\b(biotechnology|biotech)\b",
                    r"\b(electronics\s+manufacturing)\b",
                    r"\b(industrial\s+chemistry)\b",
                    r"\b(oil\s+and\s+gas|energy)\b",
                    r"\b(financial|banking|finance)\b",
                    r"\b(cryptocurrency|crypto)\b",
                ],
            ),
            (
                EntityLabel::Region,
                &[
                    r"\b(Vietnam|Vietnamese)\b",
                    r"\b(Russia|Russian)\b",
                    r"\b(China|Chinese)\b",
                    r"\b(Iran|Iranian)\b",
                    r"\b(North\s+Korea|North\s+Korean)\b",
                    r"\b(South\s+Korea|South\s+Korean)\b",
                    r"\b(Southeast\s+Asia)\b",
                    r"\b(Europe|European)\b",
                    r"\b(NATO)\b",
                    r"\b(Philippines|Laos|Cambodia|Japan)\b",
                    r"\b(U\.S\.|United\s+States|UK)\b",
                ],
            ),
            (
                EntityLabel::Software,
                &[
                    r"\b(PowerShell)\b",
                    r"\b(Microsoft\s+Office)\b",
                    r"\b(WMI)\b",
                    r"\b(Registry)\b",
                    r"\b(RDP)\b",
                    r"\b(cloud\s+storage)\b",
                ],
            ),
            (
                EntityLabel::Vulnerability,
                &[r"\b(CVE-\d{4}-\d{4,})\b"],
            ),
            // EntityLabel::Indicator reserved, no patterns yet.
        ];

        for (label, patterns) in table {
            for pattern in *patterns {
                entity_rules.push(EntityRule::new(*label, pattern)?);
            }
        }

        let relation_rules = vec![
            RelationRule::new(
                RelationKind::Uses,
                r"(has\s+used|used|deployed)",
                &[EntityLabel::ToolMalware],
            )?,
            RelationRule::new(
                RelationKind::Targets,
                r"(target|targeting|targeted)",
                &[EntityLabel::Industry, EntityLabel::Victim],
            )?,
            RelationRule::new(
                RelationKind::OperatesIn,
                r"(based|operates|active|origins?)",
                &[EntityLabel::Region],
            )?,
            RelationRule::new(
                RelationKind::Attacks,
                r"(compromised|attacked|breached|interfere)",
                &[EntityLabel::Victim, EntityLabel::Region],
            )?,
            RelationRule::new(
                RelationKind::ExploitsSoftware,
                r"(via|through|using|with)",
                &[EntityLabel::Software],
            )?,
            RelationRule::new(
                RelationKind::ExploitsVulnerability,
                r"(exploit|exploited|exploiting|leverag)",
                &[EntityLabel::Vulnerability],
            )?,
        ];

        Ok(Self {
            entity_rules,
            relation_rules,
        })
    }

    /// Entity rules for one label, in declaration order.
    pub fn entity_rules_for(&self, label: EntityLabel) -> impl Iterator<Item = &EntityRule> {
        self.entity_rules.iter().filter(move |r| r.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_compile() {
        let rules = RuleSet::builtin().unwrap();
        assert!(!rules.entity_rules.is_empty());
        assert_eq!(rules.relation_rules.len(), 6);
    }

    #[test]
    fn rules_match_case_insensitively() {
        let rules = RuleSet::builtin().unwrap();
        let tool_rule = rules
            .entity_rules_for(EntityLabel::ToolMalware)
            .next()
            .unwrap();
        assert!(tool_rule.pattern.is_match("they dropped MIMIKATZ here"));
        assert!(tool_rule.pattern.is_match("they dropped mimikatz here"));
    }

    #[test]
    fn indicator_label_has_no_rules() {
        let rules = RuleSet::builtin().unwrap();
        assert_eq!(rules.entity_rules_for(EntityLabel::Indicator).count(), 0);
    }

    #[test]
    fn malformed_pattern_is_a_startup_error() {
        assert!(EntityRule::new(EntityLabel::ToolMalware, r"(unclosed").is_err());
    }
}
