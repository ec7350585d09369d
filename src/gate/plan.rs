use crate::gate::usage::{Account, Counter};

/// Normalized subscription tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    /// Map a raw plan string from the account store onto a tier.
    ///
    /// Matching is case-insensitive and whitespace-trimmed; unknown values are `Free`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pro" | "pro plan" | "premium" | "paid" => Self::Pro,
            _ => Self::Free,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }
}

/// Numeric cap on a metered counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Limit {
    Count(u64),
    Unlimited,
}

impl Limit {
    pub fn admits(self, used: u64) -> bool {
        match self {
            Self::Count(cap) => used < cap,
            Self::Unlimited => true,
        }
    }

    pub fn remaining(self, used: u64) -> Option<u64> {
        match self {
            Self::Count(cap) => Some(cap.saturating_sub(used)),
            Self::Unlimited => None,
        }
    }
}

impl From<Option<u64>> for Limit {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unlimited, Self::Count)
    }
}

impl From<Limit> for Option<u64> {
    fn from(value: Limit) -> Self {
        match value {
            Limit::Count(cap) => Some(cap),
            Limit::Unlimited => None,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(cap) => write!(f, "{cap}"),
            Self::Unlimited => f.write_str("∞"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Per-plan entitlements.
pub struct PlanLimits {
    /// Scenario generations.
    pub scenarios: Limit,
    /// Image generations.
    pub images: Limit,
    /// Narration generations.
    pub audios: Limit,
    /// Deck export entitlement.
    pub deck: bool,
}

impl PlanLimits {
    pub fn limit_for(&self, counter: Counter) -> Limit {
        match counter {
            Counter::Scenarios => self.scenarios,
            Counter::Images => self.images,
            Counter::Audios => self.audios,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Limit table keyed by plan.
pub struct PlanTable {
    pub free: PlanLimits,
    pub pro: PlanLimits,
}

impl Default for PlanTable {
    fn default() -> Self {
        Self {
            free: PlanLimits {
                scenarios: Limit::Count(3),
                images: Limit::Count(5),
                audios: Limit::Count(5),
                deck: false,
            },
            pro: PlanLimits {
                scenarios: Limit::Unlimited,
                images: Limit::Count(100),
                audios: Limit::Count(100),
                deck: true,
            },
        }
    }
}

impl PlanTable {
    pub fn limits(&self, plan: Plan) -> &PlanLimits {
        match plan {
            Plan::Free => &self.free,
            Plan::Pro => &self.pro,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Developer bypass for every plan check.
pub struct DevOverride {
    /// Bypass for everyone.
    pub global: bool,
    /// Account emails that bypass checks, matched case-insensitively.
    pub emails: Vec<String>,
}

impl DevOverride {
    pub fn bypasses(&self, email: Option<&str>) -> bool {
        if self.global {
            return true;
        }
        let Some(email) = email else {
            return false;
        };
        let email = email.trim().to_lowercase();
        self.emails
            .iter()
            .any(|allowed| allowed.trim().to_lowercase() == email)
    }
}

/// A metered or entitlement-gated action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Scenario,
    Image,
    Audio,
    Deck,
}

impl Operation {
    /// Usage counter charged after the operation completes, if any.
    pub fn counter(self) -> Option<Counter> {
        match self {
            Self::Scenario => Some(Counter::Scenarios),
            Self::Image => Some(Counter::Images),
            Self::Audio => Some(Counter::Audios),
            Self::Deck => None,
        }
    }
}

/// Outcome of a gate check. Denials are ordinary values, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// No signed-in account.
    SignInRequired,
    /// The plan does not include the feature at all.
    FeatureLocked { plan: Plan },
    /// The numeric quota for this period is used up.
    QuotaExhausted { plan: Plan, used: u64, limit: u64 },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// User-facing explanation for a denial; empty for [`GateDecision::Allowed`].
    pub fn message(&self) -> String {
        match self {
            Self::Allowed => String::new(),
            Self::SignInRequired => "ログインが必要です。".to_string(),
            Self::FeatureLocked { .. } => {
                "🔒 この機能はProプラン限定です。\nアップグレードして利用してください。".to_string()
            }
            Self::QuotaExhausted { plan, used, limit } => {
                let hint = match plan {
                    Plan::Pro => {
                        "制限解除には上限の引き上げが必要です。必要であればサポートにご連絡ください。"
                    }
                    Plan::Free => "制限解除にはProプランへのアップグレードが必要です。",
                };
                format!(
                    "⚠️ {}プランの上限に達しました。\n(今月: {used}/{limit}回)\n\n{hint}",
                    plan.as_str().to_uppercase()
                )
            }
        }
    }
}

/// Quota and entitlement checks against a [`PlanTable`].
#[derive(Clone, Copy, Debug)]
pub struct PlanGate<'a> {
    table: &'a PlanTable,
    dev: &'a DevOverride,
}

impl<'a> PlanGate<'a> {
    pub fn new(table: &'a PlanTable, dev: &'a DevOverride) -> Self {
        Self { table, dev }
    }

    pub fn from_config(cfg: &'a crate::AppConfig) -> Self {
        Self::new(&cfg.plans, &cfg.dev)
    }

    pub fn is_unlimited(&self, account: &Account) -> bool {
        self.dev.bypasses(account.email.as_deref())
    }

    pub fn check(&self, account: Option<&Account>, op: Operation) -> GateDecision {
        let Some(account) = account else {
            return GateDecision::SignInRequired;
        };
        if self.is_unlimited(account) {
            return GateDecision::Allowed;
        }

        let plan = Plan::normalize(&account.plan);
        let limits = self.table.limits(plan);
        let Some(counter) = op.counter() else {
            return if limits.deck {
                GateDecision::Allowed
            } else {
                GateDecision::FeatureLocked { plan }
            };
        };

        let used = account.usage.get(counter);
        match limits.limit_for(counter) {
            Limit::Unlimited => GateDecision::Allowed,
            Limit::Count(cap) if used < cap => GateDecision::Allowed,
            Limit::Count(cap) => GateDecision::QuotaExhausted {
                plan,
                used,
                limit: cap,
            },
        }
    }

    /// Whether a completed operation should be charged to the account.
    pub fn meters(&self, account: &Account) -> bool {
        !self.is_unlimited(account)
    }

    /// Remaining uses for `counter`; `None` means unlimited.
    pub fn remaining(&self, account: &Account, counter: Counter) -> Option<u64> {
        if self.is_unlimited(account) {
            return None;
        }
        let plan = Plan::normalize(&account.plan);
        self.table
            .limits(plan)
            .limit_for(counter)
            .remaining(account.usage.get(counter))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/plan.rs"]
mod tests;
