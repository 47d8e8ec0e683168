use std::time::Instant;

use crate::application::{App, AppMode, Focus};
use crate::domain::{EMPTY_ORDER_MESSAGE, NotificationLevel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

/// Rows of the screen not available to menu entries: header, status bar,
/// table borders and table header.
const MENU_CHROME_ROWS: u16 = 7;
const BANNER_ROWS: u16 = 3;

/// Number of menu rows that fit on a screen of the given height.
pub fn menu_viewport_rows(height: u16, app: &App) -> usize {
    let banner = if app.notification.is_some() { BANNER_ROWS } else { 0 };
    usize::from(height.saturating_sub(MENU_CHROME_ROWS + banner)).max(1)
}

pub fn render_ui(f: &mut Frame, app: &App) {
    let banner_height = if app.notification.is_some() { BANNER_ROWS } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    if app.notification.is_some() {
        render_notification(f, app, chunks[1]);
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[2]);
    render_menu(f, app, body[0]);
    render_summary(f, app, body[1]);
    render_status_bar(f, app, chunks[3]);

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "tsorder - Terminal Order Form | Selected: {} | Total: {}",
        app.form.order.len(),
        app.summary.total
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_notification(f: &mut Frame, app: &App, area: Rect) {
    let Some(active) = &app.notification else {
        return;
    };
    let (title, color) = match active.notification.level {
        NotificationLevel::Warning => ("Warning", Color::Yellow),
        NotificationLevel::Info => ("Info", Color::Cyan),
    };
    let banner = Paragraph::new(active.notification.message.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{title} (Esc to dismiss)"))
                .style(Style::default().fg(color)),
        )
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(banner, area);
}

fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = usize::from(area.height.saturating_sub(3));
    let header = Row::new(vec!["", "Item", "Category", "Price", "Qty"])
        .style(Style::default().fg(Color::Yellow));

    let rows = app
        .menu
        .items()
        .iter()
        .enumerate()
        .skip(app.scroll_row)
        .take(visible_rows)
        .map(|(index, item)| {
            let checked = app.form.is_checked(item.id);
            let checkbox = if checked { "[x]" } else { "[ ]" };
            let quantity = if app.visible_controls.contains(&item.id) {
                let field = app
                    .form
                    .control(item.id)
                    .map(|control| control.quantity_field.as_str())
                    .unwrap_or("");
                if app.mode == AppMode::EditingQuantity && index == app.selected_row {
                    format!("- {}_ +", app.input)
                } else {
                    format!("- {field} +")
                }
            } else {
                String::new()
            };

            let mut style = if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            if index == app.selected_row {
                style = if app.focus == Focus::Menu {
                    style.bg(Color::Blue).fg(Color::White)
                } else {
                    style.add_modifier(Modifier::UNDERLINED)
                };
            }

            Row::new(vec![
                Cell::from(checkbox),
                Cell::from(item.name.as_str()),
                Cell::from(item.category.as_str()),
                Cell::from(item.price.to_string()),
                Cell::from(quantity),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(10),
    ];
    let title = match app.selected_item() {
        Some(item) if !item.description.is_empty() => format!("Menu - {}", item.description),
        _ => "Menu".to_string(),
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(3)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("Your Order");
    if app.summary.is_empty() {
        let empty = Paragraph::new(EMPTY_ORDER_MESSAGE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = app
            .summary
            .lines
            .iter()
            .map(|line| {
                ListItem::new(Text::from(vec![
                    Line::from(vec![
                        Span::styled(line.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw("  "),
                        Span::styled(line.line_total.to_string(), Style::default().fg(Color::Green)),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", line.detail()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]))
            })
            .collect();
        f.render_widget(List::new(items).block(block), chunks[0]);
    }

    let total_style = if app.is_total_highlighted(Instant::now()) {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let total = Paragraph::new(format!("Total: {}", app.summary.total))
        .style(total_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(total, chunks[1]);

    let submit = &app.summary.submit;
    let button_style = if submit.loading {
        Style::default().fg(Color::Yellow)
    } else if !submit.enabled {
        Style::default().fg(Color::DarkGray)
    } else if app.focus == Focus::PlaceOrder {
        Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let button = Paragraph::new(submit.label())
        .alignment(Alignment::Center)
        .style(button_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, chunks[2]);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Space: select | +/-: quantity | e: edit qty | Tab/o: Place Order | p: submit | ?: help | q: quit"
                    .to_string()
            }
        }
        AppMode::EditingQuantity => format!("Quantity: {} (Enter/Esc to finish)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::Submitted => "Placing order...".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::EditingQuantity => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::Submitted => Style::default().fg(Color::Yellow),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = usize::from(popup_area.height.saturating_sub(2));

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("tsorder Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

pub fn help_line_count() -> usize {
    HELP_TEXT.lines().count()
}

const HELP_TEXT: &str = r#"TSORDER - TERMINAL ORDER FORM

=== SELECTING ITEMS ===
Space / x       Select or deselect the highlighted item
                Selected items show a quantity control: - N +
+ / =           Increase quantity of the highlighted item
-               Decrease quantity (never below 1)
e / Enter       Type a quantity; every keystroke updates the total
                Anything that is not a number counts as 1
Enter / Esc     Finish typing a quantity

=== ORDER ===
The summary panel lists every selected item with its line total
and the order total. Place Order stays disabled while the order
is empty.

Tab             Switch focus between menu and Place Order
o               Jump to Place Order (when it is enabled)
p               Place the order
Enter           Place the order (when Place Order has focus)

Placing an empty order is blocked with a warning that closes by
itself after a few seconds.

=== NAVIGATION ===
↑↓ or j/k       Move through the menu
Home / End      First / last menu item
Esc             Dismiss notification
F1 or ?         Show this help
q               Quit without ordering

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
