//! Shipping methods, packaging materials and the package fit evaluator.
//!
//! A shipping method constrains some subset of: longest side, middle side,
//! shortest side, sum of the three sides, and weight. Every constraint is an
//! inclusive upper bound; an absent constraint is never checked.

use serde::{Deserialize, Serialize};

use super::marketplace::{Marketplace, Yen};

/// Packaging material id that always exists and costs nothing.
pub const NO_PACKAGING_ID: &str = "none";

/// Membership of a shipping method in a family of box-size tiers.
///
/// Tiers of one family are the same service at increasing box sizes
/// (60, 80, 100, ...). Only the smallest tier that fits is worth offering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeTier {
    /// Family key shared by every tier of the same service.
    pub family: String,
    /// Tier marker; smaller is cheaper.
    pub size: u32,
}

impl SizeTier {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Infer a tier from the `<family>_<digits>` id convention.
    ///
    /// Only used for methods declared without an explicit tier.
    pub fn infer(id: &str) -> Option<Self> {
        let (family, digits) = id.rsplit_once('_')?;
        if family.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(|size| Self::new(family, size))
    }
}

/// A courier/service option with a flat fee and physical limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: String,
    pub label: String,
    /// Flat fee charged to the seller.
    pub shipping_fee: Yen,
    #[serde(default)]
    pub max_length_cm: Option<f64>,
    #[serde(default)]
    pub max_width_cm: Option<f64>,
    #[serde(default)]
    pub max_height_cm: Option<f64>,
    #[serde(default)]
    pub max_sum_cm: Option<f64>,
    #[serde(default)]
    pub max_weight_g: Option<f64>,
    /// Marketplaces this method can be used from. `None` = all of them.
    #[serde(default)]
    pub available_platforms: Option<Vec<Marketplace>>,
    #[serde(default)]
    pub tier: Option<SizeTier>,
    /// Opt out of reading a size tier from a `<family>_<digits>` id.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub untiered: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl ShippingMethod {
    /// Unconstrained, universally available method. Limits are added with
    /// the builder-style setters below.
    pub fn new(id: impl Into<String>, label: impl Into<String>, shipping_fee: Yen) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shipping_fee,
            max_length_cm: None,
            max_width_cm: None,
            max_height_cm: None,
            max_sum_cm: None,
            max_weight_g: None,
            available_platforms: None,
            tier: None,
            untiered: false,
            note: None,
        }
    }

    /// Limits on the longest, middle and shortest side.
    #[must_use]
    pub fn sides(mut self, length: f64, width: f64, height: f64) -> Self {
        self.max_length_cm = Some(length);
        self.max_width_cm = Some(width);
        self.max_height_cm = Some(height);
        self
    }

    #[must_use]
    pub fn max_length(mut self, cm: f64) -> Self {
        self.max_length_cm = Some(cm);
        self
    }

    #[must_use]
    pub fn max_width(mut self, cm: f64) -> Self {
        self.max_width_cm = Some(cm);
        self
    }

    #[must_use]
    pub fn max_height(mut self, cm: f64) -> Self {
        self.max_height_cm = Some(cm);
        self
    }

    #[must_use]
    pub fn max_sum(mut self, cm: f64) -> Self {
        self.max_sum_cm = Some(cm);
        self
    }

    #[must_use]
    pub fn max_weight(mut self, grams: f64) -> Self {
        self.max_weight_g = Some(grams);
        self
    }

    #[must_use]
    pub fn only_on(mut self, platforms: &[Marketplace]) -> Self {
        self.available_platforms = Some(platforms.to_vec());
        self
    }

    #[must_use]
    pub fn tiered(mut self, family: &str, size: u32) -> Self {
        self.tier = Some(SizeTier::new(family, size));
        self
    }

    /// Keep the method out of tier dedup even if its id looks tiered.
    #[must_use]
    pub fn untiered(mut self) -> Self {
        self.tier = None;
        self.untiered = true;
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Whether the method can be used when selling on `marketplace`.
    pub fn is_available_on(&self, marketplace: Marketplace) -> bool {
        self.available_platforms
            .as_ref()
            .is_none_or(|platforms| platforms.contains(&marketplace))
    }

    /// Whether a package described by `spec` satisfies every constraint.
    pub fn fits(&self, spec: &ShippingSpec) -> bool {
        fits(self, spec)
    }
}

/// Box, envelope or other wrapping with a flat cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingMaterial {
    pub id: String,
    pub label: String,
    pub cost: Yen,
    #[serde(default)]
    pub note: Option<String>,
}

impl PackagingMaterial {
    pub fn new(id: impl Into<String>, label: impl Into<String>, cost: Yen) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            cost,
            note: None,
        }
    }
}

/// Seller-entered package description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingSpec {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_g: f64,
    pub packaging_material_id: String,
    /// Cost copied from the catalog when the package was described. Takes
    /// precedence over the catalog price when present.
    #[serde(default)]
    pub packaging_material_cost: Option<Yen>,
}

impl ShippingSpec {
    /// Side lengths sorted longest first.
    pub fn sorted_sides(&self) -> [f64; 3] {
        let mut sides = [self.length_cm, self.width_cm, self.height_cm];
        sides.sort_by(|a, b| b.total_cmp(a));
        sides
    }
}

/// Fit evaluator: does the package satisfy every limit the method declares?
///
/// Sides are compared after sorting, so the result does not depend on which
/// input was called length, width or height. A NaN measurement never
/// exceeds a limit.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn fits(method: &ShippingMethod, spec: &ShippingSpec) -> bool {
    let [longest, middle, shortest] = spec.sorted_sides();
    let within = |value: f64, limit: Option<f64>| limit.is_none_or(|max| !(value > max));

    within(spec.weight_g, method.max_weight_g)
        // Summed in sorted order: bit-identical for every permutation.
        && within(longest + middle + shortest, method.max_sum_cm)
        && within(longest, method.max_length_cm)
        && within(middle, method.max_width_cm)
        && within(shortest, method.max_height_cm)
}
