//! Rule tables: the immutable, process-wide lookup structure the simulation
//! engine reads from.
//!
//! Built once at startup (built-in catalog plus optional config overrides),
//! validated, then shared read-only behind an `Arc`. Every lookup by id is a
//! hash-map hit.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use super::catalog;
use super::marketplace::{Marketplace, PlatformFeeRule};
use super::shipping::{NO_PACKAGING_ID, PackagingMaterial, ShippingMethod, SizeTier};

/// Problems found while assembling rule tables.
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("fee rate for {marketplace} must be in [0, 1), got {rate}")]
    FeeRateOutOfRange { marketplace: Marketplace, rate: Decimal },
    #[error("no fee rule configured for {0}")]
    MissingFeeRule(Marketplace),
    #[error("duplicate fee rule for {0}")]
    DuplicateFeeRule(Marketplace),
    #[error("{kind} id must not be empty")]
    EmptyId { kind: &'static str },
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} {id} has a negative price")]
    NegativePrice { kind: &'static str, id: String },
    #[error("shipping method {id} has a non-positive {limit} limit")]
    InvalidLimit { id: String, limit: &'static str },
    #[error("shipping method {0} restricts availability to no marketplace")]
    NoPlatforms(String),
    #[error("shipping method {0} is marked untiered but declares a tier")]
    UntieredWithTier(String),
    #[error("packaging material \"none\" must exist and cost 0")]
    MissingNoPackaging,
}

/// Adjustments applied on top of the built-in catalog.
///
/// Entries replace the built-in entry with the same key, or are appended.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleOverrides {
    #[serde(default)]
    pub fee_rules: Vec<PlatformFeeRule>,
    #[serde(default)]
    pub shipping_methods: Vec<ShippingMethod>,
    #[serde(default)]
    pub packaging_materials: Vec<PackagingMaterial>,
    /// Built-in shipping method ids to remove.
    #[serde(default)]
    pub disabled_shipping_methods: Vec<String>,
}

impl RuleOverrides {
    pub fn is_empty(&self) -> bool {
        self.fee_rules.is_empty()
            && self.shipping_methods.is_empty()
            && self.packaging_materials.is_empty()
            && self.disabled_shipping_methods.is_empty()
    }
}

/// Immutable marketplace, shipping and packaging tables.
#[derive(Debug, Clone)]
pub struct RuleTables {
    fee_rules: HashMap<Marketplace, PlatformFeeRule>,
    marketplace_order: Vec<Marketplace>,
    shipping_methods: Vec<ShippingMethod>,
    shipping_index: HashMap<String, usize>,
    packaging_materials: Vec<PackagingMaterial>,
    packaging_index: HashMap<String, usize>,
    no_packaging: PackagingMaterial,
}

impl RuleTables {
    /// Validate and index the given tables.
    ///
    /// Methods declared without a tier get one inferred from their id,
    /// unless they are marked `untiered`.
    pub fn new(
        fee_rules: Vec<PlatformFeeRule>,
        mut shipping_methods: Vec<ShippingMethod>,
        packaging_materials: Vec<PackagingMaterial>,
    ) -> Result<Self, RulesError> {
        validate_fee_rules(&fee_rules)?;
        for method in &mut shipping_methods {
            if method.tier.is_none() && !method.untiered {
                method.tier = SizeTier::infer(&method.id);
            }
        }
        validate_shipping_methods(&shipping_methods)?;
        validate_packaging(&packaging_materials)?;
        Ok(Self::assemble(fee_rules, shipping_methods, packaging_materials))
    }

    /// Built-in catalog. Validity is covered by the unit tests below.
    pub fn builtin() -> Self {
        Self::assemble(
            catalog::fee_rules(),
            catalog::shipping_methods(),
            catalog::packaging_materials(),
        )
    }

    /// Built-in catalog with config overrides applied, then validated.
    pub fn with_overrides(overrides: &RuleOverrides) -> Result<Self, RulesError> {
        let mut fee_rules = catalog::fee_rules();
        for rule in &overrides.fee_rules {
            upsert(&mut fee_rules, rule.clone(), |r| r.marketplace == rule.marketplace);
        }

        let mut methods = catalog::shipping_methods();
        methods.retain(|m| !overrides.disabled_shipping_methods.contains(&m.id));
        for method in &overrides.shipping_methods {
            upsert(&mut methods, method.clone(), |m| m.id == method.id);
        }

        let mut packaging = catalog::packaging_materials();
        for material in &overrides.packaging_materials {
            upsert(&mut packaging, material.clone(), |m| m.id == material.id);
        }

        Self::new(fee_rules, methods, packaging)
    }

    fn assemble(
        fee_rules: Vec<PlatformFeeRule>,
        shipping_methods: Vec<ShippingMethod>,
        packaging_materials: Vec<PackagingMaterial>,
    ) -> Self {
        let fee_rules: HashMap<_, _> = fee_rules.into_iter().map(|r| (r.marketplace, r)).collect();
        let marketplace_order = Marketplace::ALL
            .into_iter()
            .filter(|m| fee_rules.contains_key(m))
            .collect();
        let shipping_index = shipping_methods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let packaging_index = packaging_materials
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect::<HashMap<_, _>>();
        let no_packaging = packaging_index
            .get(NO_PACKAGING_ID)
            .map_or_else(
                || PackagingMaterial::new(NO_PACKAGING_ID, NO_PACKAGING_ID, 0),
                |&i| packaging_materials[i].clone(),
            );

        Self {
            fee_rules,
            marketplace_order,
            shipping_methods,
            shipping_index,
            packaging_materials,
            packaging_index,
            no_packaging,
        }
    }

    /// Marketplaces with a fee rule, in canonical order.
    pub fn marketplaces(&self) -> &[Marketplace] {
        &self.marketplace_order
    }

    pub fn fee_rule(&self, marketplace: Marketplace) -> Option<&PlatformFeeRule> {
        self.fee_rules.get(&marketplace)
    }

    /// Display label, falling back to the identifier.
    pub fn marketplace_label(&self, marketplace: Marketplace) -> &str {
        self.fee_rule(marketplace)
            .map_or_else(|| marketplace.as_str(), |r| r.label.as_str())
    }

    pub fn shipping_methods(&self) -> &[ShippingMethod] {
        &self.shipping_methods
    }

    pub fn shipping_method(&self, id: &str) -> Option<&ShippingMethod> {
        self.shipping_index.get(id).map(|&i| &self.shipping_methods[i])
    }

    pub fn packaging_materials(&self) -> &[PackagingMaterial] {
        &self.packaging_materials
    }

    pub fn packaging_material(&self, id: &str) -> Option<&PackagingMaterial> {
        self.packaging_index.get(id).map(|&i| &self.packaging_materials[i])
    }

    /// Packaging lookup that never fails: unknown ids resolve to "none".
    pub fn resolve_packaging(&self, id: &str) -> &PackagingMaterial {
        self.packaging_material(id).unwrap_or(&self.no_packaging)
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same_key: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|existing| same_key(existing)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn validate_fee_rules(rules: &[PlatformFeeRule]) -> Result<(), RulesError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.marketplace) {
            return Err(RulesError::DuplicateFeeRule(rule.marketplace));
        }
        if rule.fee_rate < Decimal::ZERO || rule.fee_rate >= Decimal::ONE {
            return Err(RulesError::FeeRateOutOfRange {
                marketplace: rule.marketplace,
                rate: rule.fee_rate,
            });
        }
    }
    match Marketplace::ALL.into_iter().find(|m| !seen.contains(m)) {
        Some(missing) => Err(RulesError::MissingFeeRule(missing)),
        None => Ok(()),
    }
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn validate_shipping_methods(methods: &[ShippingMethod]) -> Result<(), RulesError> {
    const KIND: &str = "shipping method";
    let mut seen = HashSet::new();
    for method in methods {
        if method.id.is_empty() {
            return Err(RulesError::EmptyId { kind: KIND });
        }
        if !seen.insert(method.id.as_str()) {
            return Err(RulesError::DuplicateId { kind: KIND, id: method.id.clone() });
        }
        if method.shipping_fee < 0 {
            return Err(RulesError::NegativePrice { kind: KIND, id: method.id.clone() });
        }
        let limits = [
            ("length", method.max_length_cm),
            ("width", method.max_width_cm),
            ("height", method.max_height_cm),
            ("sum", method.max_sum_cm),
            ("weight", method.max_weight_g),
        ];
        if let Some((limit, _)) = limits
            .into_iter()
            .find(|(_, value)| value.is_some_and(|v| !(v > 0.0)))
        {
            return Err(RulesError::InvalidLimit { id: method.id.clone(), limit });
        }
        if method.available_platforms.as_ref().is_some_and(Vec::is_empty) {
            return Err(RulesError::NoPlatforms(method.id.clone()));
        }
        if method.untiered && method.tier.is_some() {
            return Err(RulesError::UntieredWithTier(method.id.clone()));
        }
    }
    Ok(())
}

fn validate_packaging(materials: &[PackagingMaterial]) -> Result<(), RulesError> {
    const KIND: &str = "packaging material";
    let mut seen = HashSet::new();
    for material in materials {
        if material.id.is_empty() {
            return Err(RulesError::EmptyId { kind: KIND });
        }
        if !seen.insert(material.id.as_str()) {
            return Err(RulesError::DuplicateId { kind: KIND, id: material.id.clone() });
        }
        if material.cost < 0 {
            return Err(RulesError::NegativePrice { kind: KIND, id: material.id.clone() });
        }
    }
    let free_none = materials
        .iter()
        .any(|m| m.id == NO_PACKAGING_ID && m.cost == 0);
    if free_none { Ok(()) } else { Err(RulesError::MissingNoPackaging) }
}
