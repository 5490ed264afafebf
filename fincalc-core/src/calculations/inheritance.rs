//! Simplified estate apportionment between the immediate family.
//!
//! Shares are granted one after another and each is deducted from the
//! estate before the next heir is considered:
//!
//! 1. Spouse: husband ½ (¼ with children), wife ¼ (⅛ with children).
//! 2. Father ⅙ of the estate, if living.
//! 3. Mother ⅙ of the estate, if living.
//! 4. Whatever remains goes to the children, a son taking twice a
//!    daughter's share.
//!
//! Grandparents and siblings are accepted but receive nothing; the report
//! lists them as not apportioned. Without children the residue stays
//! undistributed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{laws, money};
use crate::models::{CalculationStep, Report};

const LAWS: &[&str] = &["Inheritance Law No. 77 of 1943"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spouse {
    #[default]
    None,
    Husband,
    Wife,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritanceParams {
    pub estate_value: Decimal,
    pub spouse: Spouse,
    pub father: bool,
    pub mother: bool,
    pub sons: u32,
    pub daughters: u32,
    pub grandfather: bool,
    pub grandmother: bool,
    pub brothers: u32,
    pub sisters: u32,
}

impl InheritanceParams {
    pub fn has_children(&self) -> bool {
        self.sons > 0 || self.daughters > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heir {
    Husband,
    Wife,
    Father,
    Mother,
    Son,
    Daughter,
}

impl Heir {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Son => "Sons",
            Self::Daughter => "Daughters",
        }
    }
}

/// One heir class's share. `total` is `amount_each × count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeirShare {
    pub heir: Heir,
    pub count: u32,
    pub fraction: String,
    pub amount_each: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceDistribution {
    /// Shares in the order they were granted.
    pub shares: Vec<HeirShare>,
    /// Estate left over when there are no children to take the residue.
    pub undistributed: Decimal,
}

impl InheritanceDistribution {
    pub fn distributed(&self) -> Decimal {
        self.shares.iter().map(|s| s.total).sum()
    }
}

fn fixed_share(
    heir: Heir,
    estate: Decimal,
    numerator: u32,
    denominator: u32,
) -> HeirShare {
    let amount = estate * Decimal::from(numerator) / Decimal::from(denominator);
    HeirShare {
        heir,
        count: 1,
        fraction: format!("{numerator}/{denominator}"),
        amount_each: amount,
        total: amount,
    }
}

/// Apportions the estate between the heirs that take a share.
pub fn distribute(params: &InheritanceParams) -> InheritanceDistribution {
    let estate = params.estate_value;
    let children = params.has_children();
    let mut shares = Vec::new();

    match (params.spouse, children) {
        (Spouse::Husband, false) => shares.push(fixed_share(Heir::Husband, estate, 1, 2)),
        (Spouse::Husband, true) => shares.push(fixed_share(Heir::Husband, estate, 1, 4)),
        (Spouse::Wife, false) => shares.push(fixed_share(Heir::Wife, estate, 1, 4)),
        (Spouse::Wife, true) => shares.push(fixed_share(Heir::Wife, estate, 1, 8)),
        (Spouse::None, _) => {}
    }
    if params.father {
        shares.push(fixed_share(Heir::Father, estate, 1, 6));
    }
    if params.mother {
        shares.push(fixed_share(Heir::Mother, estate, 1, 6));
    }

    let granted: Decimal = shares.iter().map(|s| s.total).sum();
    let remaining = estate - granted;

    if !children || remaining <= Decimal::ZERO {
        return InheritanceDistribution {
            shares,
            undistributed: remaining.max(Decimal::ZERO),
        };
    }

    // Sons take two parts each. Deriving the sons' total from what the
    // daughters took keeps the split exact under decimal division.
    let parts = Decimal::from(2 * params.sons + params.daughters);
    let daughter_each = remaining / parts;
    let daughters_total = daughter_each * Decimal::from(params.daughters);
    let sons_total = remaining - daughters_total;

    if params.sons > 0 {
        shares.push(HeirShare {
            heir: Heir::Son,
            count: params.sons,
            fraction: "residue (2 parts each)".to_string(),
            amount_each: sons_total / Decimal::from(params.sons),
            total: sons_total,
        });
    }
    if params.daughters > 0 {
        shares.push(HeirShare {
            heir: Heir::Daughter,
            count: params.daughters,
            fraction: "residue (1 part each)".to_string(),
            amount_each: daughter_each,
            total: daughters_total,
        });
    }

    InheritanceDistribution {
        shares,
        undistributed: Decimal::ZERO,
    }
}

fn unapportioned(params: &InheritanceParams) -> Vec<String> {
    let mut heirs = Vec::new();
    if params.grandfather {
        heirs.push("grandfather".to_string());
    }
    if params.grandmother {
        heirs.push("grandmother".to_string());
    }
    if params.brothers > 0 {
        heirs.push(format!("{} brother(s)", params.brothers));
    }
    if params.sisters > 0 {
        heirs.push(format!("{} sister(s)", params.sisters));
    }
    heirs
}

/// Report mapping: gross = net = estate value. Only nonzero shares become
/// steps.
pub fn inheritance(params: &InheritanceParams) -> Report {
    let distribution = distribute(params);
    let mut calculations = vec![CalculationStep::new("Estate value", params.estate_value)];

    for share in distribution.shares.iter().filter(|s| !s.total.is_zero()) {
        let description = if share.count > 1 {
            format!(
                "{} ({}) × {}: {} each",
                share.heir.label(),
                share.fraction,
                share.count,
                money(share.amount_each)
            )
        } else {
            format!("{} ({})", share.heir.label(), share.fraction)
        };
        calculations.push(CalculationStep::new(description, share.total));
    }
    if distribution.undistributed > Decimal::ZERO {
        calculations.push(CalculationStep::new("Undistributed residue", distribution.undistributed));
    }

    let skipped = unapportioned(params);
    if !skipped.is_empty() {
        calculations.push(CalculationStep::new(
            "Not apportioned",
            skipped.join(", "),
        ));
    }

    Report {
        summary: format!(
            "Distributed {} of an estate of {} between {} heir class(es).",
            money(distribution.distributed()),
            money(params.estate_value),
            distribution.shares.len()
        ),
        calculations,
        gross_income: params.estate_value,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: params.estate_value,
        applicable_laws: laws(LAWS),
    }
}
