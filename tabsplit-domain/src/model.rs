use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Sub},
    str::FromStr,
};

use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};

/// A currency amount with 2-decimal rounding semantics.
///
/// Arithmetic is exact decimal arithmetic; rounding happens only where a
/// value becomes a charge someone sees, via [`Money::rounded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// `Money::new(1250, 2)` is 12.50.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Rounds to 2 decimal places, midpoint away from zero.
    pub fn rounded(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{cents:.2}")
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Canonical display form of a person name: first letter upper-cased, the
/// rest lowered. Matching is therefore capitalization-insensitive.
pub fn canonical_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Mapping from person name to itemized subtotal, in insertion order.
///
/// Keys are canonicalized, so "alice", "ALICE" and "Alice" accumulate into
/// one entry displayed as "Alice".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonLedger {
    entries: IndexMap<String, Money>,
}

impl PersonLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `name`'s running subtotal.
    pub fn credit(&mut self, name: &str, amount: Money) {
        *self
            .entries
            .entry(canonical_name(name))
            .or_insert(Money::ZERO) += amount;
    }

    /// Divides `amount` evenly across `names` and credits each share.
    ///
    /// Shared-item semantics: an item listed under multiple names is split
    /// equally among them, each share rounded to 2 decimals.
    pub fn credit_group(&mut self, names: &[&str], amount: Money) {
        if names.is_empty() {
            return;
        }
        let share = (amount / Decimal::from(names.len())).rounded();
        for name in names {
            self.credit(name, share);
        }
    }

    pub fn get(&self, name: &str) -> Option<Money> {
        self.entries.get(&canonical_name(name)).copied()
    }

    pub fn subtotal(&self) -> Money {
        self.entries.values().copied().sum()
    }

    pub fn person_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> + '_ {
        self.entries.iter().map(|(name, amount)| (name.as_str(), *amount))
    }
}

impl<'a> FromIterator<(&'a str, Money)> for PersonLedger {
    fn from_iter<I: IntoIterator<Item = (&'a str, Money)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (name, amount) in iter {
            ledger.credit(name, amount);
        }
        ledger
    }
}

/// The receipt-level figures an allocation reconciles against.
///
/// All amounts are non-negative and in the receipt's currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Charges {
    /// Grand total as stated on the receipt, charged to the payer's card.
    pub declared_total: Money,
    pub tax: Money,
    pub tip: Money,
    /// Everything else: delivery fee, service fee, and similar flat charges.
    pub misc_fees: Money,
}

/// Result of a successful allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocationResult {
    /// Amount each person owes, rounded to 2 decimals, in ledger order.
    pub per_person_owed: IndexMap<String, Money>,
    /// tax / tax base, unrounded.
    pub tax_rate: Decimal,
    /// tip / tax base, unrounded.
    pub tip_rate: Decimal,
    /// Flat fee share per person, rounded to 2 decimals.
    pub per_person_fee: Money,
}
