//! Scenario Tests — Simulation on the Built-in Catalog
//!
//! Concrete seller situations run end to end through the engine with the
//! shipped fee, shipping and packaging tables.

use listing_profit_sim::domain::marketplace::{Marketplace, Yen};
use listing_profit_sim::domain::rules::RuleTables;
use listing_profit_sim::domain::shipping::{NO_PACKAGING_ID, ShippingSpec};
use listing_profit_sim::domain::simulation::{SimulationInput, SimulationResult, calculate_simulation};

fn package(l: f64, w: f64, h: f64, g: f64, packaging: &str) -> ShippingSpec {
    ShippingSpec {
        length_cm: l,
        width_cm: w,
        height_cm: h,
        weight_g: g,
        packaging_material_id: packaging.to_string(),
        packaging_material_cost: None,
    }
}

fn on(marketplace: Marketplace, price: Yen, spec: ShippingSpec) -> SimulationResult {
    calculate_simulation(
        &RuleTables::builtin(),
        &SimulationInput {
            selling_price: price,
            compare_all_platforms: false,
            marketplace_selection: Some(marketplace),
            shipping_spec: spec,
        },
    )
}

fn everywhere(price: Yen, spec: ShippingSpec) -> SimulationResult {
    calculate_simulation(
        &RuleTables::builtin(),
        &SimulationInput {
            selling_price: price,
            compare_all_platforms: true,
            marketplace_selection: None,
            shipping_spec: spec,
        },
    )
}

fn ids(result: &SimulationResult) -> Vec<&str> {
    result
        .candidates
        .iter()
        .map(|c| c.shipping_method_id.as_str())
        .collect()
}

#[test]
fn test_overweight_package_has_no_candidates() {
    let result = everywhere(20_000, package(30.0, 20.0, 10.0, 30_000.0, NO_PACKAGING_ID));
    assert!(result.candidates.is_empty());
    assert!(result.recommended.is_none());
}

#[test]
fn test_platform_restricted_methods_stay_on_their_platform() {
    let tables = RuleTables::builtin();
    let spec = package(20.0, 15.0, 2.0, 300.0, NO_PACKAGING_ID);
    let nekopos = tables.shipping_method("mercari_nekopos").unwrap();
    assert!(nekopos.fits(&spec));

    let result = on(Marketplace::Rakuma, 3_000, spec);
    assert!(!result.is_empty());
    assert!(result.candidates.iter().all(|c| c.marketplace == Marketplace::Rakuma));
    assert!(ids(&result).iter().all(|id| !id.starts_with("mercari_")));
    assert!(ids(&result).contains(&"rakuma_nekopos"));
}

#[test]
fn test_profit_arithmetic_with_catalog_packaging() {
    let result = on(Marketplace::Mercari, 12_800, package(30.0, 20.0, 2.0, 500.0, "box_nekopos"));
    let nekopos = result
        .candidates
        .iter()
        .find(|c| c.shipping_method_id == "mercari_nekopos")
        .unwrap();

    assert_eq!(nekopos.platform_fee, 1_280);
    assert_eq!(nekopos.shipping_fee, 210);
    assert_eq!(nekopos.packaging_cost, 70);
    assert_eq!(nekopos.total_cost, 1_560);
    assert_eq!(nekopos.profit, 11_240);
    assert_eq!(nekopos.packaging_material_id, "box_nekopos");
}

#[test]
fn test_fee_floors_fractional_yen() {
    let result = on(Marketplace::Mercari, 12_999, package(20.0, 15.0, 2.0, 300.0, NO_PACKAGING_ID));
    assert!(!result.is_empty());
    assert!(result.candidates.iter().all(|c| c.platform_fee == 1_299));
}

#[test]
fn test_only_smallest_fitting_box_size_is_offered() {
    // Sum of sides 90 cm: the 60 and 80 sizes are too small.
    let result = on(Marketplace::Mercari, 5_000, package(40.0, 30.0, 20.0, 3_000.0, NO_PACKAGING_ID));

    assert_eq!(
        ids(&result),
        vec!["mercari_takkyubin_100", "mercari_yupack_100", "yupack_100"]
    );
    let recommended = result.recommended.unwrap();
    assert_eq!(recommended.shipping_method_id, "mercari_takkyubin_100");
    assert_eq!(recommended.profit, 5_000 - 500 - 1_050);
}

#[test]
fn test_unknown_packaging_falls_back_to_none() {
    let result = on(Marketplace::Rakuma, 2_000, package(20.0, 15.0, 2.0, 300.0, "gift_wrap"));
    assert!(!result.is_empty());
    for c in &result.candidates {
        assert_eq!(c.packaging_material_id, NO_PACKAGING_ID);
        assert_eq!(c.packaging_cost, 0);
    }
}

#[test]
fn test_saved_packaging_cost_beats_catalog_price() {
    let mut spec = package(20.0, 15.0, 2.0, 300.0, "box_nekopos");
    spec.packaging_material_cost = Some(100);
    let result = on(Marketplace::Mercari, 2_000, spec);
    assert!(result.candidates.iter().all(|c| c.packaging_cost == 100));
}

#[test]
fn test_compare_all_recommends_most_profitable_platform() {
    let result = everywhere(3_000, package(20.0, 15.0, 2.0, 300.0, NO_PACKAGING_ID));

    for marketplace in Marketplace::ALL {
        assert!(
            result.candidates.iter().any(|c| c.marketplace == marketplace),
            "{marketplace} missing"
        );
    }

    // 5 % fee (150) plus click post (185).
    let recommended = result.recommended.unwrap();
    assert_eq!(recommended.marketplace, Marketplace::Yahoo);
    assert_eq!(recommended.shipping_method_id, "clickpost");
    assert_eq!(recommended.profit, 2_665);
}

#[test]
fn test_loss_making_sale_is_still_reported() {
    let result = on(Marketplace::Mercari, 500, package(50.0, 40.0, 30.0, 4_000.0, "box_120_generic"));
    let recommended = result.recommended.unwrap();
    assert!(recommended.profit < 0);
    assert_eq!(recommended.profit, 500 - recommended.total_cost);
}
