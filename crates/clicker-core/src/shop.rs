//! Shop items that can be bought with currency.

use std::fmt;

/// Starting cost of the per-click upgrade.
pub const DEFAULT_UPGRADE_COST: u64 = 10;
/// Yield added per upgrade level.
pub const DEFAULT_UPGRADE_INCREMENT: u64 = 1;
/// Number of upgrade levels available.
pub const DEFAULT_UPGRADE_MAX_LEVEL: u32 = 10;
/// Cost of the autoclicker.
pub const DEFAULT_AUTOCLICKER_COST: u64 = 5000;

/// What a successful purchase did to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseEffect {
    /// Nothing was bought; the balance is unchanged.
    None,
    /// Per-click yield grows by the given amount.
    YieldIncrease(u64),
    /// The autoclicker switched on.
    AutoProducerActivated,
}

impl PurchaseEffect {
    /// Yield delta carried by this effect, 0 for anything else.
    pub fn yield_delta(self) -> u64 {
        match self {
            PurchaseEffect::YieldIncrease(d) => d,
            _ => 0,
        }
    }
}

/// Anything that can be bought with currency.
///
/// Purchases never fail loudly: when `can_buy` is false, `purchase` returns
/// the balance untouched together with [`PurchaseEffect::None`].
pub trait Purchasable {
    /// Current price.
    fn cost(&self) -> u64;
    /// Whether `balance` is enough and the item is still for sale.
    fn can_buy(&self, balance: u64) -> bool;
    /// Attempt a purchase, returning the new balance and its effect.
    fn purchase(&mut self, balance: u64) -> (u64, PurchaseEffect);
    /// Button text for the item in its current state.
    fn display_label(&self) -> String;
}

/// Identifies a shop slot so views can dispatch purchases uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShopItem {
    /// The per-click [`Upgrade`].
    Upgrade,
    /// The [`AutoProducer`].
    AutoProducer,
}

impl ShopItem {
    /// Every item, in display order.
    pub const ALL: [ShopItem; 2] = [ShopItem::Upgrade, ShopItem::AutoProducer];
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopItem::Upgrade => f.write_str("upgrade"),
            ShopItem::AutoProducer => f.write_str("autoclicker"),
        }
    }
}

/// A leveled item that permanently raises the per-click yield.
///
/// The cost stays the same at every level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upgrade {
    cost: u64,
    increment_per_level: u64,
    level: u32,
    max_level: u32,
}

impl Upgrade {
    /// A fresh upgrade at level 0.
    pub fn new(cost: u64, increment_per_level: u64, max_level: u32) -> Self {
        Self::restore(cost, increment_per_level, 0, max_level)
    }

    /// Rebuild an upgrade from stored fields. Callers validate the result.
    pub fn restore(cost: u64, increment_per_level: u64, level: u32, max_level: u32) -> Self {
        Self {
            cost,
            increment_per_level,
            level,
            max_level,
        }
    }

    /// Yield added by each level.
    pub fn increment_per_level(&self) -> u64 {
        self.increment_per_level
    }

    /// Levels bought so far.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Levels available in total.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// True once no further levels can be bought.
    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

impl Default for Upgrade {
    fn default() -> Self {
        Self::new(
            DEFAULT_UPGRADE_COST,
            DEFAULT_UPGRADE_INCREMENT,
            DEFAULT_UPGRADE_MAX_LEVEL,
        )
    }
}

impl Purchasable for Upgrade {
    fn cost(&self) -> u64 {
        self.cost
    }

    fn can_buy(&self, balance: u64) -> bool {
        balance >= self.cost && !self.is_maxed()
    }

    fn purchase(&mut self, balance: u64) -> (u64, PurchaseEffect) {
        if !self.can_buy(balance) {
            return (balance, PurchaseEffect::None);
        }
        self.level += 1;
        (
            balance - self.cost,
            PurchaseEffect::YieldIncrease(self.increment_per_level),
        )
    }

    fn display_label(&self) -> String {
        if self.is_maxed() {
            "Max".to_string()
        } else {
            format!("Upgrade (Cost: ${})", self.cost)
        }
    }
}

/// One-shot autoclicker. Once active it stays active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoProducer {
    cost: u64,
    active: bool,
}

impl AutoProducer {
    /// An autoclicker that has not been bought yet.
    pub fn new(cost: u64) -> Self {
        Self::restore(cost, false)
    }

    /// Rebuild an autoclicker from stored fields.
    pub fn restore(cost: u64, active: bool) -> Self {
        Self { cost, active }
    }

    /// True once bought.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for AutoProducer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOCLICKER_COST)
    }
}

impl Purchasable for AutoProducer {
    fn cost(&self) -> u64 {
        self.cost
    }

    fn can_buy(&self, balance: u64) -> bool {
        balance >= self.cost && !self.active
    }

    fn purchase(&mut self, balance: u64) -> (u64, PurchaseEffect) {
        if !self.can_buy(balance) {
            return (balance, PurchaseEffect::None);
        }
        self.active = true;
        (balance - self.cost, PurchaseEffect::AutoProducerActivated)
    }

    fn display_label(&self) -> String {
        if self.active {
            "Autoclicker Active".to_string()
        } else {
            format!("Buy Autoclicker (Cost: ${})", self.cost)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn upgrade_labels() {
        let mut u = Upgrade::new(10, 1, 1);
        assert_eq!(u.display_label(), "Upgrade (Cost: $10)");
        let (balance, effect) = u.purchase(15);
        assert_eq!(balance, 5);
        assert_eq!(effect, PurchaseEffect::YieldIncrease(1));
        assert_eq!(u.display_label(), "Max");
    }

    #[test]
    fn upgrade_stops_at_max_level() {
        let mut u = Upgrade::default();
        let mut balance = 1_000;
        for _ in 0..DEFAULT_UPGRADE_MAX_LEVEL {
            let (b, effect) = u.purchase(balance);
            assert_eq!(b, balance - DEFAULT_UPGRADE_COST);
            assert_eq!(effect.yield_delta(), 1);
            balance = b;
        }
        assert!(u.is_maxed());
        assert!(!u.can_buy(u64::MAX));
        assert_eq!(u.purchase(balance), (balance, PurchaseEffect::None));
        assert_eq!(u.level(), DEFAULT_UPGRADE_MAX_LEVEL);
    }

    #[test]
    fn autoproducer_activates_once() {
        let mut a = AutoProducer::default();
        assert_eq!(a.display_label(), "Buy Autoclicker (Cost: $5000)");
        let (b, effect) = a.purchase(6000);
        assert_eq!(b, 1000);
        assert_eq!(effect, PurchaseEffect::AutoProducerActivated);
        assert!(a.is_active());
        assert_eq!(a.display_label(), "Autoclicker Active");
        assert_eq!(a.purchase(1_000_000), (1_000_000, PurchaseEffect::None));
        assert!(a.is_active());
    }

    #[test]
    fn shop_items_are_object_safe() {
        let mut items: Vec<Box<dyn Purchasable>> =
            vec![Box::new(Upgrade::default()), Box::new(AutoProducer::default())];
        let costs: Vec<u64> = items.iter().map(|i| i.cost()).collect();
        assert_eq!(costs, vec![10, 5000]);
        let (b, effect) = items[0].purchase(10);
        assert_eq!((b, effect.yield_delta()), (0, 1));
    }

    proptest! {
        #[test]
        fn upgrade_unaffordable_is_noop(cost in 1u64..1_000_000, short in 1u64..1_000_000) {
            let balance = cost.saturating_sub(short);
            prop_assume!(balance < cost);
            let mut u = Upgrade::new(cost, 1, 10);
            prop_assert!(!u.can_buy(balance));
            prop_assert_eq!(u.purchase(balance), (balance, PurchaseEffect::None));
            prop_assert_eq!(u.level(), 0);
        }

        #[test]
        fn upgrade_purchase_deducts_exact_cost(cost in 0u64..10_000, extra in 0u64..10_000, inc in 1u64..100) {
            let mut u = Upgrade::new(cost, inc, 3);
            let (b, effect) = u.purchase(cost + extra);
            prop_assert_eq!(b, extra);
            prop_assert_eq!(effect, PurchaseEffect::YieldIncrease(inc));
            prop_assert_eq!(u.level(), 1);
        }

        #[test]
        fn active_autoproducer_ignores_balance(balance in any::<u64>()) {
            let mut a = AutoProducer::restore(5000, true);
            prop_assert!(!a.can_buy(balance));
            prop_assert_eq!(a.purchase(balance), (balance, PurchaseEffect::None));
        }

        #[test]
        fn autoproducer_charges_only_on_activation(balances in proptest::collection::vec(0u64..20_000, 1..20)) {
            let mut a = AutoProducer::default();
            let mut activations = 0;
            for balance in balances {
                let was_active = a.is_active();
                let (b, effect) = a.purchase(balance);
                if effect == PurchaseEffect::AutoProducerActivated {
                    activations += 1;
                    prop_assert!(!was_active);
                    prop_assert_eq!(b, balance - 5000);
                } else {
                    prop_assert_eq!(b, balance);
                }
            }
            prop_assert!(activations <= 1);
        }
    }
}
