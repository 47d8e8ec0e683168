//! Order form reducer.
//!
//! The reducer owns no state. Each call takes the current [`FormState`] by
//! value together with one [`FormEvent`], and returns the next state plus a
//! [`RenderInstruction`] describing what the UI has to update. Nothing here
//! touches a terminal, which keeps every rule testable on plain values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::models::{ItemId, Menu, Money, OrderItem, OrderLine, OrderState, Quantity, parse_leading_int};

/// Message shown in the summary panel when nothing is selected.
pub const EMPTY_ORDER_MESSAGE: &str = "No items selected";

/// Warning raised when the user submits an empty order.
pub const EMPTY_SUBMIT_WARNING: &str = "Please select at least one item to order.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityAction {
    Increase,
    Decrease,
}

/// Something the user did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The checkbox of an item changed.
    CheckboxToggled { item: ItemId, checked: bool },
    /// The quantity field of an item now holds `raw`.
    QuantityInput { item: ItemId, raw: String },
    /// One of the +/- buttons next to a quantity field was pressed.
    QuantityButton { item: ItemId, action: QuantityAction },
    /// The order form was submitted.
    Submit,
}

/// Checkbox and quantity field of a single menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemControl {
    pub checked: bool,
    pub quantity_field: String,
}

impl Default for ItemControl {
    fn default() -> Self {
        Self {
            checked: false,
            quantity_field: "1".to_string(),
        }
    }
}

/// Everything the order form knows: the selected items, the raw value of
/// every control and whether the order has been handed off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub order: OrderState,
    controls: BTreeMap<ItemId, ItemControl>,
    pub submitting: bool,
}

impl FormState {
    /// Fresh form with one unchecked control per menu item.
    pub fn for_menu(menu: &Menu) -> Self {
        Self {
            order: OrderState::default(),
            controls: menu.items().iter().map(|item| (item.id, ItemControl::default())).collect(),
            submitting: false,
        }
    }

    pub fn control(&self, item: ItemId) -> Option<&ItemControl> {
        self.controls.get(&item)
    }

    pub fn is_checked(&self, item: ItemId) -> bool {
        self.controls.get(&item).is_some_and(|control| control.checked)
    }

    pub fn summary(&self) -> OrderSummary {
        let empty = self.order.is_empty();
        OrderSummary {
            lines: self.order.lines(),
            total: self.order.total(),
            submit: SubmitButton {
                enabled: !empty && !self.submitting,
                loading: self.submitting,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitButton {
    pub enabled: bool,
    pub loading: bool,
}

impl SubmitButton {
    pub fn label(&self) -> &'static str {
        if self.loading { "Placing Order..." } else { "Place Order" }
    }
}

/// Derived view of the order: one line per item, the total and the state
/// of the submit button.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub total: Money,
    pub submit: SubmitButton,
}

impl OrderSummary {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The order as it leaves the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub lines: Vec<OrderLine>,
    pub total: Money,
}

impl Submission {
    pub fn from_order(order: &OrderState) -> Self {
        Self {
            lines: order.lines(),
            total: order.total(),
        }
    }

    /// Native form encoding: an `items` entry per selected item, followed by
    /// one `quantity_<id>` entry each.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsorder::domain::{FormEvent, FormState, ItemId, Menu, OrderReducer, Submission};
    ///
    /// let menu = Menu::default();
    /// let reducer = OrderReducer::new(&menu);
    /// let (state, _) = reducer.reduce(
    ///     FormState::for_menu(&menu),
    ///     FormEvent::CheckboxToggled { item: ItemId(31), checked: true },
    /// );
    /// let fields = Submission::from_order(&state.order).form_fields();
    /// assert_eq!(fields, vec![
    ///     ("items".to_string(), "31".to_string()),
    ///     ("quantity_31".to_string(), "1".to_string()),
    /// ]);
    /// ```
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let ids = self.lines.iter().map(|line| ("items".to_string(), line.id.to_string()));
        let quantities = self
            .lines
            .iter()
            .map(|line| (format!("quantity_{}", line.id), line.quantity.to_string()));
        ids.chain(quantities).collect()
    }
}

/// One UI update produced by a reducer step.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ShowQuantityControl(ItemId),
    HideQuantityControl(ItemId),
    /// Overwrite the text of a quantity field.
    SetQuantityField { item: ItemId, value: String },
    RenderSummary(OrderSummary),
    Notify(Notification),
    /// Hand the order off; the form is now in its loading state.
    BeginSubmit(Submission),
}

/// Ordered list of UI updates. Empty when an event changed nothing visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderInstruction {
    commands: Vec<RenderCommand>,
}

impl RenderInstruction {
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The last summary in this instruction, if the summary was re-rendered.
    pub fn summary(&self) -> Option<&OrderSummary> {
        self.commands.iter().rev().find_map(|command| match command {
            RenderCommand::RenderSummary(summary) => Some(summary),
            _ => None,
        })
    }
}

impl IntoIterator for RenderInstruction {
    type Item = RenderCommand;
    type IntoIter = std::vec::IntoIter<RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// Applies form events against a menu.
///
/// # Examples
///
/// ```
/// use tsorder::domain::{FormEvent, ItemId, Menu, OrderReducer, QuantityAction};
///
/// let menu = Menu::default();
/// let reducer = OrderReducer::new(&menu);
/// let (state, _) = reducer.initial();
///
/// let chai = ItemId(31);
/// let (state, _) = reducer.reduce(state, FormEvent::CheckboxToggled { item: chai, checked: true });
/// let (state, render) = reducer.reduce(
///     state,
///     FormEvent::QuantityButton { item: chai, action: QuantityAction::Increase },
/// );
///
/// assert_eq!(state.order.total().to_string(), "$5.98");
/// assert_eq!(render.summary().unwrap().lines[0].detail(), "$2.99 × 2");
/// ```
pub struct OrderReducer<'a> {
    menu: &'a Menu,
}

impl<'a> OrderReducer<'a> {
    pub fn new(menu: &'a Menu) -> Self {
        Self { menu }
    }

    /// The state of a freshly loaded form and the render that draws it.
    pub fn initial(&self) -> (FormState, RenderInstruction) {
        let state = FormState::for_menu(self.menu);
        let mut render = RenderInstruction::default();
        render.push(RenderCommand::RenderSummary(state.summary()));
        (state, render)
    }

    pub fn reduce(&self, mut state: FormState, event: FormEvent) -> (FormState, RenderInstruction) {
        debug!(?event, "reducing form event");
        let mut render = RenderInstruction::default();
        match event {
            FormEvent::CheckboxToggled { item, checked } => {
                self.toggle_item(&mut state, item, checked, &mut render);
            }
            FormEvent::QuantityInput { item, raw } => {
                self.change_quantity(&mut state, item, raw, &mut render);
            }
            FormEvent::QuantityButton { item, action } => {
                self.press_quantity_button(&mut state, item, action, &mut render);
            }
            FormEvent::Submit => self.submit(&mut state, &mut render),
        }
        (state, render)
    }

    fn toggle_item(&self, state: &mut FormState, item: ItemId, checked: bool, render: &mut RenderInstruction) {
        let Some(menu_item) = self.menu.get(item) else {
            warn!(%item, "checkbox toggled for unknown menu item");
            return;
        };

        let control = state.controls.entry(item).or_default();
        control.checked = checked;

        if checked {
            let quantity = Quantity::from_input(&control.quantity_field);
            let normalized = quantity.to_string();
            if control.quantity_field != normalized {
                control.quantity_field = normalized.clone();
                render.push(RenderCommand::SetQuantityField { item, value: normalized });
            }
            state.order.insert(OrderItem::from_menu(menu_item, quantity));
            render.push(RenderCommand::ShowQuantityControl(item));
        } else {
            state.order.remove(item);
            render.push(RenderCommand::HideQuantityControl(item));
        }

        render.push(RenderCommand::RenderSummary(state.summary()));
    }

    fn change_quantity(&self, state: &mut FormState, item: ItemId, raw: String, render: &mut RenderInstruction) {
        if self.menu.get(item).is_none() {
            warn!(%item, "quantity changed for unknown menu item");
            return;
        }

        let control = state.controls.entry(item).or_default();
        let quantity = Quantity::from_input(&raw);
        if matches!(parse_leading_int(&raw), Some(n) if n < 0) {
            let value = quantity.to_string();
            control.quantity_field = value.clone();
            render.push(RenderCommand::SetQuantityField { item, value });
        } else {
            control.quantity_field = raw;
        }

        if !control.checked {
            return;
        }
        if state.order.set_quantity(item, quantity) {
            render.push(RenderCommand::RenderSummary(state.summary()));
        }
    }

    fn press_quantity_button(
        &self,
        state: &mut FormState,
        item: ItemId,
        action: QuantityAction,
        render: &mut RenderInstruction,
    ) {
        if self.menu.get(item).is_none() {
            warn!(%item, "quantity button pressed for unknown menu item");
            return;
        }

        let control = state.controls.entry(item).or_default();
        let current = Quantity::from_input(&control.quantity_field);
        let next = match action {
            QuantityAction::Increase => current.increment(),
            QuantityAction::Decrease => current.decrement(),
        };
        let value = next.to_string();
        render.push(RenderCommand::SetQuantityField { item, value: value.clone() });

        self.change_quantity(state, item, value, render);
    }

    fn submit(&self, state: &mut FormState, render: &mut RenderInstruction) {
        if state.submitting {
            debug!("submit ignored, order already submitted");
            return;
        }
        if state.order.is_empty() {
            render.push(RenderCommand::Notify(Notification::warning(EMPTY_SUBMIT_WARNING)));
            return;
        }

        state.submitting = true;
        let submission = Submission::from_order(&state.order);
        info!(items = submission.lines.len(), total = %submission.total, "order submitted");
        render.push(RenderCommand::RenderSummary(state.summary()));
        render.push(RenderCommand::Notify(Notification::info(format!(
            "Placing order: {} item(s), total {}",
            submission.lines.len(),
            submission.total
        ))));
        render.push(RenderCommand::BeginSubmit(submission));
    }
}
