//! Tier deduplication for box-size families.
//!
//! When several tiers of the same service all fit a package, only the
//! smallest tier is kept (ties broken by the lower fee). Methods without a
//! tier pass through untouched; there is no dominance pruning between
//! unrelated methods.

use std::collections::HashMap;

use super::shipping::ShippingMethod;

/// Collapse each tier family to its cheapest fitting member.
///
/// Output order: untiered methods first (input order), then one survivor
/// per family (in order of the family's first appearance).
pub fn dedupe_tiers<'a, I>(methods: I) -> Vec<&'a ShippingMethod>
where
    I: IntoIterator<Item = &'a ShippingMethod>,
{
    let mut untiered = Vec::new();
    let mut survivors: Vec<&'a ShippingMethod> = Vec::new();
    let mut slot_by_family: HashMap<&'a str, usize> = HashMap::new();

    for method in methods {
        let Some(tier) = method.tier.as_ref() else {
            untiered.push(method);
            continue;
        };

        match slot_by_family.get(tier.family.as_str()) {
            Some(&slot) => {
                if is_cheaper_tier(method, survivors[slot]) {
                    survivors[slot] = method;
                }
            }
            None => {
                slot_by_family.insert(tier.family.as_str(), survivors.len());
                survivors.push(method);
            }
        }
    }

    untiered.extend(survivors);
    untiered
}

/// Smaller tier wins; equal tiers fall back to the lower flat fee.
fn is_cheaper_tier(candidate: &ShippingMethod, current: &ShippingMethod) -> bool {
    let key = |m: &ShippingMethod| (m.tier.as_ref().map_or(u32::MAX, |t| t.size), m.shipping_fee);
    key(candidate) < key(current)
}
