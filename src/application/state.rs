//! Application state management for the terminal order form.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface. Order rules live in the domain reducer;
//! `App` feeds it events and keeps the view in sync with what it returns.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::{
    FormEvent, FormState, ItemId, Menu, MenuItem, Notification, OrderReducer, OrderSummary, QuantityAction,
    RenderCommand, RenderInstruction, Submission,
};

/// How long the total stays highlighted after it changes.
pub const TOTAL_HIGHLIGHT: Duration = Duration::from_millis(200);

/// Default lifetime of a notification banner.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Represents the current mode of the application.
///
/// The mode determines how user input is interpreted and what UI elements
/// are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the menu - arrow keys move selection, shortcuts available
    Normal,
    /// Typing into the quantity field of the selected item
    EditingQuantity,
    /// Help screen is displayed
    Help,
    /// The order was handed off and the form is in its loading state
    Submitted,
}

/// Which part of the form receives Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Enter edits the selected item's quantity
    Menu,
    /// Enter places the order
    PlaceOrder,
}

/// A notification banner and the moment it appeared.
#[derive(Debug, Clone)]
pub struct ActiveNotification {
    pub notification: Notification,
    /// Start of the auto-dismiss countdown
    pub shown_at: Instant,
}

/// Main application state containing the order form and UI state.
///
/// # Examples
///
/// ```
/// use tsorder::application::App;
///
/// let mut app = App::default();
/// app.toggle_selected();
/// assert_eq!(app.summary.total.to_string(), "$18.99");
/// ```
#[derive(Debug)]
pub struct App {
    /// Items on offer, in display order
    pub menu: Menu,
    /// Order and control values, owned by the reducer between events
    pub form: FormState,
    /// Summary as last rendered
    pub summary: OrderSummary,
    /// Items whose quantity control is shown
    pub visible_controls: BTreeSet<ItemId>,
    /// Currently selected menu row (zero-based)
    pub selected_row: usize,
    /// Top-most menu row visible in the viewport
    pub scroll_row: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Whether Enter acts on the menu or on Place Order
    pub focus: Focus,
    /// Quantity field buffer while editing
    pub input: String,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Banner currently on screen
    pub notification: Option<ActiveNotification>,
    /// How long a banner stays before it is dismissed on its own
    pub notification_timeout: Duration,
    /// End of the total highlight after the last summary change
    pub total_highlight_until: Option<Instant>,
    /// The accepted order, once submitted
    pub submission: Option<Submission>,
    /// Viewport height in rows (for scrolling calculations)
    pub viewport_rows: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Menu::default())
    }
}

impl App {
    /// Creates the form for `menu` with nothing selected.
    pub fn new(menu: Menu) -> Self {
        let (form, render) = OrderReducer::new(&menu).initial();
        let mut app = Self {
            menu,
            form,
            summary: OrderSummary::default(),
            visible_controls: BTreeSet::new(),
            selected_row: 0,
            scroll_row: 0,
            mode: AppMode::Normal,
            focus: Focus::Menu,
            input: String::new(),
            help_scroll: 0,
            status_message: None,
            notification: None,
            notification_timeout: NOTIFICATION_TIMEOUT,
            total_highlight_until: None,
            submission: None,
            viewport_rows: 20,
        };
        app.apply(render, Instant::now());
        app.total_highlight_until = None;
        app
    }

    /// Overrides the banner lifetime.
    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    /// Runs one event through the reducer and applies the resulting render.
    pub fn dispatch(&mut self, event: FormEvent) {
        let now = Instant::now();
        let form = std::mem::take(&mut self.form);
        let (form, render) = OrderReducer::new(&self.menu).reduce(form, event);
        self.form = form;
        self.apply(render, now);
    }

    fn apply(&mut self, render: RenderInstruction, now: Instant) {
        for command in render {
            match command {
                RenderCommand::ShowQuantityControl(item) => {
                    self.visible_controls.insert(item);
                }
                RenderCommand::HideQuantityControl(item) => {
                    self.visible_controls.remove(&item);
                    if self.mode == AppMode::EditingQuantity && self.selected_item_id() == Some(item) {
                        self.finish_editing();
                    }
                }
                RenderCommand::SetQuantityField { item, value } => {
                    if self.mode == AppMode::EditingQuantity && self.selected_item_id() == Some(item) {
                        self.input = value;
                    }
                }
                RenderCommand::RenderSummary(summary) => {
                    self.summary = summary;
                    self.total_highlight_until = Some(now + TOTAL_HIGHLIGHT);
                    if self.focus == Focus::PlaceOrder && !self.summary.submit.enabled && !self.summary.submit.loading {
                        self.focus = Focus::Menu;
                    }
                }
                RenderCommand::Notify(notification) => {
                    debug!(message = %notification.message, "showing notification");
                    self.notification = Some(ActiveNotification {
                        notification,
                        shown_at: now,
                    });
                }
                RenderCommand::BeginSubmit(submission) => {
                    info!(total = %submission.total, "handing off order");
                    self.submission = Some(submission);
                    self.mode = AppMode::Submitted;
                }
            }
        }
    }

    /// Expires the notification banner and the total highlight.
    pub fn tick(&mut self, now: Instant) {
        if let Some(active) = &self.notification {
            if now.saturating_duration_since(active.shown_at) >= self.notification_timeout {
                debug!("notification auto-dismissed");
                self.notification = None;
            }
        }
        if self.total_highlight_until.is_some_and(|until| now >= until) {
            self.total_highlight_until = None;
        }
    }

    /// Whether the total is still highlighted at `now`.
    pub fn is_total_highlighted(&self, now: Instant) -> bool {
        self.total_highlight_until.is_some_and(|until| now < until)
    }

    /// Hides the banner right away.
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// The menu item under the cursor.
    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.menu.items().get(self.selected_row)
    }

    fn selected_item_id(&self) -> Option<ItemId> {
        self.selected_item().map(|item| item.id)
    }

    /// Moves the cursor up one row.
    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
            self.ensure_cursor_visible();
        }
    }

    /// Moves the cursor down one row.
    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.menu.len() {
            self.selected_row += 1;
            self.ensure_cursor_visible();
        }
    }

    /// Jumps to the first menu item.
    pub fn move_to_top(&mut self) {
        self.selected_row = 0;
        self.ensure_cursor_visible();
    }

    /// Jumps to the last menu item.
    pub fn move_to_bottom(&mut self) {
        self.selected_row = self.menu.len().saturating_sub(1);
        self.ensure_cursor_visible();
    }

    /// Adjusts scroll so the selected row stays inside the viewport.
    pub fn ensure_cursor_visible(&mut self) {
        let rows = self.viewport_rows.max(1);
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + rows {
            self.scroll_row = self.selected_row + 1 - rows;
        }
    }

    /// Flips the checkbox of the selected item.
    pub fn toggle_selected(&mut self) {
        if let Some(item) = self.selected_item_id() {
            let checked = !self.form.is_checked(item);
            self.dispatch(FormEvent::CheckboxToggled { item, checked });
        }
    }

    /// Presses `+` on the selected item's quantity control.
    pub fn increase_selected(&mut self) {
        self.press_quantity_button(QuantityAction::Increase);
    }

    /// Presses `-` on the selected item's quantity control.
    pub fn decrease_selected(&mut self) {
        self.press_quantity_button(QuantityAction::Decrease);
    }

    fn press_quantity_button(&mut self, action: QuantityAction) {
        if let Some(item) = self.selected_item_with_control() {
            self.dispatch(FormEvent::QuantityButton { item, action });
        }
    }

    /// The selected item, if its quantity control is on screen. Sets a
    /// status hint otherwise.
    fn selected_item_with_control(&mut self) -> Option<ItemId> {
        let item = self.selected_item_id()?;
        if self.visible_controls.contains(&item) {
            Some(item)
        } else {
            self.status_message = Some("Select the item first to change its quantity".to_string());
            None
        }
    }

    /// Switches to quantity editing for the selected item.
    pub fn start_editing_quantity(&mut self) {
        if let Some(item) = self.selected_item_with_control() {
            self.input = self
                .form
                .control(item)
                .map(|control| control.quantity_field.clone())
                .unwrap_or_default();
            self.mode = AppMode::EditingQuantity;
        }
    }

    /// Appends a character to the quantity field, firing an input event.
    pub fn push_quantity_char(&mut self, c: char) {
        self.input.push(c);
        self.send_quantity_input();
    }

    /// Deletes the last character of the quantity field, firing an input event.
    pub fn pop_quantity_char(&mut self) {
        if self.input.pop().is_some() {
            self.send_quantity_input();
        }
    }

    fn send_quantity_input(&mut self) {
        if let Some(item) = self.selected_item_id() {
            let raw = self.input.clone();
            self.dispatch(FormEvent::QuantityInput { item, raw });
        }
    }

    /// Leaves quantity editing. The field keeps whatever was typed.
    pub fn finish_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
    }

    /// Switches focus between the menu and Place Order. Place Order only
    /// takes focus while it is enabled.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Menu if self.summary.submit.enabled => Focus::PlaceOrder,
            _ => Focus::Menu,
        };
    }

    /// Moves focus to the Place Order button when it can be pressed.
    pub fn focus_place_order(&mut self) {
        if self.summary.submit.enabled {
            self.focus = Focus::PlaceOrder;
        }
    }

    /// Presses Place Order.
    pub fn submit(&mut self) {
        self.dispatch(FormEvent::Submit);
    }

    /// Shows the help popup from the top.
    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    /// Closes the help popup.
    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}
