use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Identifier of a menu item. Also used as the key of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative amount of money in the single supported currency.
///
/// Amounts are held as whole cents so that sums of line totals are exact.
/// File formats carry prices as decimal numbers (`9.5`, `18.99`) and are
/// rounded to the nearest cent on the way in.
///
/// # Examples
///
/// ```
/// use tsorder::domain::{Money, Quantity};
///
/// let price = Money::try_from(4.0).unwrap();
/// let quantity = Quantity::new(3).unwrap();
/// assert_eq!(price.times(quantity).to_string(), "$12.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(self) -> u64 {
        self.cents
    }

    pub fn times(self, quantity: Quantity) -> Money {
        Money::from_cents(self.cents.saturating_mul(u64::from(quantity.get())))
    }
}

impl TryFrom<f64> for Money {
    type Error = DomainError;

    fn try_from(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidPrice(value.to_string()));
        }
        let cents = (value * 100.0).round();
        if cents >= u64::MAX as f64 {
            return Err(DomainError::InvalidPrice(value.to_string()));
        }
        Ok(Money::from_cents(cents as u64))
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.cents as f64 / 100.0
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| Money::from_cents(acc.cents.saturating_add(m.cents)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

/// Number of units of one item in an order. Never less than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Option<Self> {
        if value >= 1 { Some(Self(value)) } else { None }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Reads a quantity field the way a browser `parseInt(value) || 1` does,
    /// then floors the result at one.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsorder::domain::Quantity;
    ///
    /// assert_eq!(Quantity::from_input("3").get(), 3);
    /// assert_eq!(Quantity::from_input("7 plates").get(), 7);
    /// assert_eq!(Quantity::from_input("abc").get(), 1);
    /// assert_eq!(Quantity::from_input("").get(), 1);
    /// assert_eq!(Quantity::from_input("-4").get(), 1);
    /// ```
    pub fn from_input(raw: &str) -> Self {
        match parse_leading_int(raw) {
            Some(n) if n >= 1 => Quantity(u32::try_from(n).unwrap_or(u32::MAX)),
            _ => Quantity::ONE,
        }
    }

    pub fn increment(self) -> Self {
        Quantity(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        if self.0 > 1 { Quantity(self.0 - 1) } else { self }
    }
}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> DomainResult<Self> {
        Quantity::new(value).ok_or(DomainError::InvalidQuantity(value))
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leading-integer parse: skips leading whitespace (byte order marks
/// included), accepts one sign and stops at the first non-digit. `None`
/// when no digit was read.
pub(crate) fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub category: String,
}

/// The list of items the user can pick from, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Builds a menu, rejecting duplicate ids and blank names.
    pub fn new(items: Vec<MenuItem>) -> DomainResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if item.name.trim().is_empty() {
                return Err(DomainError::EmptyItemName(item.id));
            }
            if !seen.insert(item.id) {
                return Err(DomainError::DuplicateItem(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Skips validation; the builtin catalog is covered by a test instead.
    pub(crate) fn from_trusted(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Menu {
    fn default() -> Self {
        super::catalog::builtin_menu()
    }
}

/// A selected menu entry with its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: Quantity,
}

impl OrderItem {
    pub fn from_menu(item: &MenuItem, quantity: Quantity) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    pub fn to_line(&self) -> OrderLine {
        OrderLine {
            id: self.id,
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            line_total: self.line_total(),
        }
    }
}

/// A flattened, display-ready order item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: Quantity,
    pub line_total: Money,
}

impl OrderLine {
    /// Price breakdown shown under the item name, e.g. `$4.00 × 3`.
    pub fn detail(&self) -> String {
        format!("{} × {}", self.unit_price, self.quantity)
    }
}

/// The currently selected items, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderState {
    items: BTreeMap<ItemId, OrderItem>,
}

impl OrderState {
    pub fn insert(&mut self, item: OrderItem) {
        self.items.insert(item.id, item);
    }

    pub fn remove(&mut self, id: ItemId) -> Option<OrderItem> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&OrderItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Updates the quantity of a selected item. Returns false if the item
    /// is not part of the order.
    pub fn set_quantity(&mut self, id: ItemId, quantity: Quantity) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.values()
    }

    pub fn total(&self) -> Money {
        self.iter().map(OrderItem::line_total).sum()
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.iter().map(OrderItem::to_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, name: &str, cents: u64) -> MenuItem {
        MenuItem {
            id: ItemId(id),
            name: name.to_string(),
            description: String::new(),
            price: Money::from_cents(cents),
            category: String::new(),
        }
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::ZERO.to_string(), "$0.00");
        assert_eq!(Money::from_cents(950).to_string(), "$9.50");
        assert_eq!(Money::from_cents(123405).to_string(), "$1234.05");
    }

    #[test]
    fn test_money_from_decimal_rounds_to_cents() {
        assert_eq!(Money::try_from(18.99).unwrap().cents(), 1899);
        assert_eq!(Money::try_from(9.5).unwrap().cents(), 950);
        assert_eq!(Money::try_from(0.0).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_money_rejects_negative_and_nan() {
        assert!(matches!(Money::try_from(-1.0), Err(DomainError::InvalidPrice(_))));
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_money_rejects_out_of_range() {
        assert!(matches!(Money::try_from(1e30), Err(DomainError::InvalidPrice(_))));
        assert!(Money::try_from(2e17).is_err());
        assert_eq!(Money::try_from(1e12).unwrap().cents(), 100_000_000_000_000);
    }

    #[test]
    fn test_money_sum_saturates() {
        let total: Money = [Money::from_cents(u64::MAX), Money::from_cents(5)].into_iter().sum();
        assert_eq!(total.cents(), u64::MAX);
    }

    #[test]
    fn test_quantity_from_input_follows_parse_int() {
        assert_eq!(Quantity::from_input("  12").get(), 12);
        assert_eq!(Quantity::from_input("+5").get(), 5);
        assert_eq!(Quantity::from_input("0").get(), 1);
        assert_eq!(Quantity::from_input("-").get(), 1);
        assert_eq!(Quantity::from_input("4.9").get(), 4);
        assert_eq!(Quantity::from_input("99999999999999").get(), u32::MAX);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("x3"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("0"), Some(0));
        assert_eq!(parse_leading_int("\u{feff}5"), Some(5));
        assert_eq!(parse_leading_int(" \u{feff} -2"), Some(-2));
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::ONE.decrement(), Quantity::ONE);
        assert_eq!(Quantity::new(3).unwrap().decrement().get(), 2);
        assert_eq!(Quantity::new(u32::MAX).unwrap().increment().get(), u32::MAX);
    }

    #[test]
    fn test_quantity_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
    }

    #[test]
    fn test_menu_rejects_duplicates_and_blank_names() {
        let dup = Menu::new(vec![item(1, "Chai", 299), item(1, "Lassi", 499)]);
        assert_eq!(dup, Err(DomainError::DuplicateItem(ItemId(1))));

        let blank = Menu::new(vec![item(2, "  ", 100)]);
        assert_eq!(blank, Err(DomainError::EmptyItemName(ItemId(2))));
    }

    #[test]
    fn test_menu_lookup() {
        let menu = Menu::new(vec![item(1, "Chai", 299), item(7, "Haleem", 1699)]).unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu.get(ItemId(7)).map(|i| i.name.as_str()), Some("Haleem"));
        assert!(menu.get(ItemId(3)).is_none());
    }

    #[test]
    fn test_order_state_totals() {
        let mut order = OrderState::default();
        assert_eq!(order.total(), Money::ZERO);

        order.insert(OrderItem::from_menu(&item(1, "Naan", 400), Quantity::new(3).unwrap()));
        order.insert(OrderItem::from_menu(&item(2, "Chai", 299), Quantity::ONE));
        assert_eq!(order.len(), 2);
        assert_eq!(order.get(ItemId(1)).unwrap().line_total().to_string(), "$12.00");
        assert_eq!(order.total().to_string(), "$14.99");

        assert!(order.set_quantity(ItemId(2), Quantity::new(2).unwrap()));
        assert!(!order.set_quantity(ItemId(9), Quantity::ONE));
        assert_eq!(order.total().to_string(), "$17.98");

        order.remove(ItemId(1));
        assert_eq!(order.total().to_string(), "$5.98");
    }

    #[test]
    fn test_order_line_detail() {
        let line = OrderItem::from_menu(&item(1, "Naan", 400), Quantity::new(3).unwrap()).to_line();
        assert_eq!(line.detail(), "$4.00 × 3");
        assert_eq!(line.line_total, Money::from_cents(1200));
    }
}
