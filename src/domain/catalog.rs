//! Built-in rule data: marketplace fee schedules, packaging materials and
//! the shipping-method table.
//!
//! Fees are approximate published rates in yen. Deployments can override
//! or extend every table through the `[rules]` config section.

use rust_decimal_macros::dec;

use super::marketplace::{Marketplace, PlatformFeeRule, Rounding, Yen};
use super::shipping::{NO_PACKAGING_ID, PackagingMaterial, ShippingMethod};

const YAHOO_PLATFORMS: &[Marketplace] = &[Marketplace::Yahoo, Marketplace::YahooAuction];

/// Weight limit per box size for Yamato-style size tiers.
const TAKKYUBIN_WEIGHT_G: [(u32, f64); 6] = [
    (60, 2_000.0),
    (80, 5_000.0),
    (100, 10_000.0),
    (120, 15_000.0),
    (140, 20_000.0),
    (160, 25_000.0),
];

const YUPACK_WEIGHT_G: f64 = 25_000.0;

fn fee_rule(marketplace: Marketplace, label: &str, rate: rust_decimal::Decimal, note: &str) -> PlatformFeeRule {
    PlatformFeeRule {
        marketplace,
        label: label.to_string(),
        fee_rate: rate,
        rounding: Rounding::Floor,
        note: Some(note.to_string()),
    }
}

/// Fee schedules for every marketplace, in canonical order.
pub fn fee_rules() -> Vec<PlatformFeeRule> {
    vec![
        fee_rule(Marketplace::Mercari, "メルカリ", dec!(0.10), "概算（販売手数料10%）"),
        fee_rule(Marketplace::Rakuma, "楽天ラクマ", dec!(0.06), "概算（出店条件により変動あり）"),
        fee_rule(Marketplace::Yahoo, "Yahoo!フリマ", dec!(0.05), "概算（条件により変動あり）"),
        fee_rule(
            Marketplace::YahooAuction,
            "Yahoo!オークション",
            dec!(0.10),
            "概算（出品形態・会員条件により変動あり）",
        ),
    ]
}

pub fn packaging_materials() -> Vec<PackagingMaterial> {
    [
        (NO_PACKAGING_ID, "手持ち資材（0円）", 0),
        ("envelope_small", "封筒（小）", 30),
        ("envelope_padded", "クッション封筒", 80),
        ("box_nekopos", "ネコポス用箱", 70),
        ("box_yupacket", "ゆうパケット用箱", 70),
        ("box_takkyubin_compact", "宅急便コンパクト専用BOX", 70),
        ("box_yupacket_plus", "ゆうパケットプラス専用箱", 65),
        ("box_60_generic", "60サイズ段ボール", 120),
        ("box_80_generic", "80サイズ段ボール", 160),
        ("box_100_generic", "100サイズ段ボール", 220),
        ("box_120_generic", "120サイズ段ボール", 250),
        ("box_140_generic", "140サイズ段ボール", 350),
        ("box_160_generic", "160サイズ段ボール", 500),
    ]
    .into_iter()
    .map(|(id, label, cost)| PackagingMaterial::new(id, label, cost))
    .collect()
}

/// Yamato box-size tiers (sum-of-sides limit = size).
fn takkyubin_tiers(
    family: &str,
    label: &str,
    fees: [Yen; 6],
    platforms: &[Marketplace],
) -> impl Iterator<Item = ShippingMethod> {
    let family = family.to_string();
    let label = label.to_string();
    let platforms = platforms.to_vec();
    TAKKYUBIN_WEIGHT_G
        .into_iter()
        .zip(fees)
        .map(move |((size, weight_g), fee)| {
            ShippingMethod::new(format!("{family}_{size}"), format!("{label} {size}サイズ"), fee)
                .max_sum(f64::from(size))
                .max_weight(weight_g)
                .only_on(&platforms)
                .tiered(&family, size)
        })
}

/// Japan Post Yu-Pack tiers; 25 kg for every size.
fn yupack_tiers(
    family: &str,
    label: &str,
    tiers: &[(u32, Yen)],
    platforms: Option<&[Marketplace]>,
) -> Vec<ShippingMethod> {
    tiers
        .iter()
        .map(|&(size, fee)| {
            let method = ShippingMethod::new(format!("{family}_{size}"), format!("{label} {size}サイズ"), fee)
                .max_sum(f64::from(size))
                .max_weight(YUPACK_WEIGHT_G)
                .tiered(family, size);
            match platforms {
                Some(platforms) => method.only_on(platforms),
                None => method,
            }
        })
        .collect()
}

/// Every built-in shipping method.
///
/// Untiered ids must not end in `_<digits>`; that suffix marks a size tier
/// when a method is declared without an explicit one.
pub fn shipping_methods() -> Vec<ShippingMethod> {
    let mercari = &[Marketplace::Mercari];
    let rakuma = &[Marketplace::Rakuma];

    let mut methods = vec![
        // らくらくメルカリ便 / ゆうゆうメルカリ便
        ShippingMethod::new("mercari_nekopos", "らくらくメルカリ便 ネコポス", 210)
            .sides(31.2, 22.8, 3.0)
            .max_weight(1_000.0)
            .only_on(mercari),
        ShippingMethod::new("mercari_takkyubin_compact", "らくらくメルカリ便 宅急便コンパクト", 450)
            .sides(25.0, 20.0, 5.0)
            .only_on(mercari)
            .with_note("専用BOXが別途必要"),
        ShippingMethod::new("mercari_yupacket", "ゆうゆうメルカリ便 ゆうパケット", 230)
            .max_length(34.0)
            .max_height(3.0)
            .max_sum(60.0)
            .max_weight(1_000.0)
            .only_on(mercari),
        ShippingMethod::new("mercari_yupacket_post", "ゆうゆうメルカリ便 ゆうパケットポスト", 215)
            .sides(32.7, 22.8, 3.0)
            .max_weight(2_000.0)
            .only_on(mercari)
            .with_note("専用箱または発送用シールが必要"),
        ShippingMethod::new("mercari_yupacket_plus", "ゆうゆうメルカリ便 ゆうパケットプラス", 455)
            .sides(24.0, 17.0, 7.0)
            .max_weight(2_000.0)
            .only_on(mercari)
            .with_note("専用箱が別途必要"),
        // かんたんラクマパック
        ShippingMethod::new("rakuma_nekopos", "かんたんラクマパック ネコポス", 200)
            .sides(31.2, 22.8, 3.0)
            .max_weight(1_000.0)
            .only_on(rakuma),
        ShippingMethod::new("rakuma_takkyubin_compact", "かんたんラクマパック 宅急便コンパクト", 530)
            .sides(25.0, 20.0, 5.0)
            .only_on(rakuma)
            .with_note("専用BOXが別途必要"),
        ShippingMethod::new("rakuma_yupacket", "かんたんラクマパック ゆうパケット", 180)
            .max_length(34.0)
            .max_height(3.0)
            .max_sum(60.0)
            .max_weight(1_000.0)
            .only_on(rakuma),
        ShippingMethod::new("rakuma_yupacket_plus", "かんたんラクマパック ゆうパケットプラス", 380)
            .sides(24.0, 17.0, 7.0)
            .max_weight(2_000.0)
            .only_on(rakuma)
            .with_note("専用箱が別途必要"),
        // おてがる配送
        ShippingMethod::new("otegaru_nekopos", "おてがる配送 ネコポス", 200)
            .sides(31.2, 22.8, 3.0)
            .max_weight(1_000.0)
            .only_on(YAHOO_PLATFORMS),
        ShippingMethod::new("otegaru_yupacket", "おてがる配送 ゆうパケット", 205)
            .max_length(34.0)
            .max_height(3.0)
            .max_sum(60.0)
            .max_weight(1_000.0)
            .only_on(YAHOO_PLATFORMS),
        ShippingMethod::new("otegaru_takkyubin_compact", "おてがる配送 宅急便コンパクト", 450)
            .sides(25.0, 20.0, 5.0)
            .only_on(YAHOO_PLATFORMS)
            .with_note("専用BOXが別途必要"),
        // Seller-arranged, usable from any marketplace
        ShippingMethod::new("clickpost", "クリックポスト", 185)
            .sides(34.0, 25.0, 3.0)
            .max_weight(1_000.0)
            .with_note("匿名配送不可"),
        ShippingMethod::new("letterpack_light", "レターパックライト", 430)
            .sides(34.0, 24.8, 3.0)
            .max_weight(4_000.0)
            .with_note("匿名配送不可"),
        ShippingMethod::new("letterpack_plus", "レターパックプラス", 600)
            .max_length(34.0)
            .max_width(24.8)
            .max_weight(4_000.0)
            .with_note("匿名配送不可・厚さ制限なし（封が閉じること）"),
    ];

    methods.extend(takkyubin_tiers(
        "mercari_takkyubin",
        "らくらくメルカリ便 宅急便",
        [750, 850, 1_050, 1_200, 1_450, 1_700],
        mercari,
    ));
    methods.extend(yupack_tiers(
        "mercari_yupack",
        "ゆうゆうメルカリ便 ゆうパック",
        &[(60, 750), (80, 870), (100, 1_070)],
        Some(mercari),
    ));
    methods.extend(takkyubin_tiers(
        "rakuma_takkyubin",
        "かんたんラクマパック 宅急便",
        [750, 850, 1_050, 1_200, 1_450, 1_700],
        rakuma,
    ));
    methods.extend(takkyubin_tiers(
        "otegaru_takkyubin",
        "おてがる配送 宅急便",
        [850, 960, 1_200, 1_450, 1_700, 1_950],
        YAHOO_PLATFORMS,
    ));
    methods.extend(yupack_tiers(
        "yupack",
        "ゆうパック（窓口持込）",
        &[(60, 810), (80, 1_100), (100, 1_390), (120, 1_700), (140, 2_000), (160, 2_330)],
        None,
    ));

    methods
}
