//! Profit simulation engine.
//!
//! For each targeted marketplace:
//! 1. Keep shipping methods available there that fit the package
//! 2. Collapse box-size tier families to their cheapest fitting tier
//! 3. Cost every surviving (marketplace, method) pair
//!
//! Candidates from all marketplaces are then ranked by profit. The engine
//! is pure: no I/O, no shared mutable state, no error paths.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::marketplace::{Marketplace, Yen};
use super::rules::RuleTables;
use super::shipping::{ShippingMethod, ShippingSpec};
use super::tiers::dedupe_tiers;

/// One simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub selling_price: Yen,
    /// Compare every known marketplace instead of `marketplace_selection`.
    pub compare_all_platforms: bool,
    #[serde(default)]
    pub marketplace_selection: Option<Marketplace>,
    pub shipping_spec: ShippingSpec,
}

/// Costed outcome of one (marketplace, shipping method) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationCandidate {
    pub marketplace: Marketplace,
    pub marketplace_label: String,
    pub shipping_method_id: String,
    pub shipping_method_label: String,
    pub packaging_material_id: String,
    pub packaging_material_label: String,
    pub platform_fee: Yen,
    pub shipping_fee: Yen,
    pub packaging_cost: Yen,
    pub total_cost: Yen,
    /// `selling_price - total_cost`; negative when the sale loses money.
    pub profit: Yen,
    #[serde(default)]
    pub note: Option<String>,
}

/// Ranked candidates plus the top pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub candidates: Vec<SimulationCandidate>,
    /// First ranked candidate; `None` when nothing fits.
    pub recommended: Option<SimulationCandidate>,
}

impl SimulationResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Ranking order: higher profit first; equal profit prefers the lower total
/// cost. Changing the tie-break changes which candidate is recommended.
pub fn rank_order(a: &SimulationCandidate, b: &SimulationCandidate) -> Ordering {
    b.profit
        .cmp(&a.profit)
        .then_with(|| a.total_cost.cmp(&b.total_cost))
}

/// Cheap-to-clone handle over shared rule tables.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    tables: Arc<RuleTables>,
}

impl SimulationEngine {
    pub fn new(tables: Arc<RuleTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn calculate(&self, input: &SimulationInput) -> SimulationResult {
        calculate_simulation(&self.tables, input)
    }
}

/// Marketplaces a request targets. An unset single selection targets none.
pub fn target_marketplaces(tables: &RuleTables, input: &SimulationInput) -> Vec<Marketplace> {
    if input.compare_all_platforms {
        tables.marketplaces().to_vec()
    } else {
        input.marketplace_selection.into_iter().collect()
    }
}

/// Methods usable on `marketplace` for this package, tiers collapsed.
pub fn eligible_methods<'a>(
    tables: &'a RuleTables,
    marketplace: Marketplace,
    spec: &ShippingSpec,
) -> Vec<&'a ShippingMethod> {
    dedupe_tiers(
        tables
            .shipping_methods()
            .iter()
            .filter(|m| m.is_available_on(marketplace) && m.fits(spec)),
    )
}

/// Run the full simulation for one input.
pub fn calculate_simulation(tables: &RuleTables, input: &SimulationInput) -> SimulationResult {
    let spec = &input.shipping_spec;
    let packaging = tables.resolve_packaging(&spec.packaging_material_id);
    let packaging_cost = spec.packaging_material_cost.unwrap_or(packaging.cost);

    let mut candidates = Vec::new();
    for marketplace in target_marketplaces(tables, input) {
        let Some(fee_rule) = tables.fee_rule(marketplace) else {
            continue;
        };
        let platform_fee = fee_rule.fee_for(input.selling_price);

        for method in eligible_methods(tables, marketplace, spec) {
            let total_cost = platform_fee
                .saturating_add(method.shipping_fee)
                .saturating_add(packaging_cost);
            candidates.push(SimulationCandidate {
                marketplace,
                marketplace_label: tables.marketplace_label(marketplace).to_string(),
                shipping_method_id: method.id.clone(),
                shipping_method_label: method.label.clone(),
                packaging_material_id: packaging.id.clone(),
                packaging_material_label: packaging.label.clone(),
                platform_fee,
                shipping_fee: method.shipping_fee,
                packaging_cost,
                total_cost,
                profit: input.selling_price.saturating_sub(total_cost),
                note: method.note.clone(),
            });
        }
    }

    // Stable sort: equal (profit, cost) keeps marketplace/table order.
    candidates.sort_by(rank_order);
    debug!(
        candidates = candidates.len(),
        compare_all = input.compare_all_platforms,
        "Simulation complete"
    );

    SimulationResult {
        recommended: candidates.first().cloned(),
        candidates,
    }
}
