use crate::model::TagCategory;
use crate::ui::app::{describe, App, FocusPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Table,
    },
    Frame,
};

// Palette
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C);
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0);
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // counts, valid
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // focus, invalid
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // footer

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const COUNT_COLOR: Color = BRAND_GREEN;
const INVALID_COLOR: Color = BRAND_ORANGE;

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
    draw_footer(
        frame,
        chunks[2],
        " ←→ Panel | ↑↓ Select | Enter Chart | e Entities | q Quit ",
    );
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let s = &app.report.summary;
    let title = format!(
        " Haystack Typer | {} | {} entities | {} valid | {} no type | {} multiple ",
        app.report.name, s.total, s.valid, s.no_fc_entity, s.mult_fc_entities
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(25), // Entity types
        Constraint::Percentage(25), // Categories
        Constraint::Percentage(50), // Tags
    ])
    .split(area);

    draw_entity_types(frame, chunks[0], app);
    draw_categories(frame, chunks[1], app);
    draw_tags(frame, chunks[2], app);
}

fn item_style(is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        SELECTED_STYLE
    } else if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn focus_marker(is_selected: bool, is_focused: bool) -> &'static str {
    if is_selected && is_focused {
        " ◄"
    } else {
        ""
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_entity_types(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::EntityTypes;
    let types = app.get_entity_types();

    let items: Vec<ListItem> = types
        .iter()
        .enumerate()
        .map(|(i, entity_type)| {
            let is_selected = i == app.selected_entity_type;
            let count = app.report.records_of_type(entity_type);

            ListItem::new(Line::from(vec![
                Span::styled(*entity_type, item_style(is_selected, is_focused)),
                Span::raw(" "),
                Span::styled(format!("({count})"), Style::default().fg(COUNT_COLOR)),
                Span::styled(
                    focus_marker(is_selected, is_focused),
                    Style::default().fg(BRAND_ORANGE),
                ),
            ]))
        })
        .collect();

    let title = format!(" Entity types ({}) ", types.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(list, area);
}

fn draw_categories(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Categories;

    let items: Vec<ListItem> = app
        .get_category_sizes()
        .into_iter()
        .enumerate()
        .map(|(i, (category, distinct))| {
            let is_selected = i == app.selected_category;
            let style = match (is_selected, category) {
                (false, TagCategory::InvalidMarkers | TagCategory::InvalidValues) => {
                    Style::default().fg(INVALID_COLOR)
                }
                _ => item_style(is_selected, is_focused),
            };

            ListItem::new(Line::from(vec![
                Span::styled(category.label(), style),
                Span::raw(" "),
                Span::styled(format!("({distinct})"), Style::default().fg(COUNT_COLOR)),
                Span::styled(
                    focus_marker(is_selected, is_focused),
                    Style::default().fg(BRAND_ORANGE),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Categories ")
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(list, area);
}

fn draw_tags(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Tags;
    let tags = app.get_tag_counts();

    // Borders and header row
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_tag >= visible_rows {
        app.selected_tag - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(vec!["Tag", "Records"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = tags
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, (tag, count))| {
            let style = item_style(i == app.selected_tag, is_focused);
            Row::new(vec![(*tag).to_string(), count.to_string()]).style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(70), Constraint::Percentage(30)];

    let title = format!(
        " {} / {} ({} tags) ",
        app.get_selected_entity_type().unwrap_or("-"),
        app.get_selected_category().label(),
        tags.len()
    );
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(table, area);
    draw_scrollbar(frame, area, tags.len(), visible_rows, app.selected_tag);
}

fn draw_scrollbar(
    frame: &mut Frame,
    area: Rect,
    len: usize,
    visible_rows: usize,
    position: usize,
) {
    if len <= visible_rows || area.height < 4 {
        return;
    }
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(len).position(position);

    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y + 2,
        width: 1,
        height: area.height - 3,
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

/// Horizontal bar chart of the selected type's tag usage in one category.
pub fn draw_tag_chart(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(6),    // Chart
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let entity_type = app.get_selected_entity_type().unwrap_or("-");
    let category = app.get_selected_category();
    let header = Paragraph::new(format!(
        " {} | {} | {} ",
        app.report.name,
        entity_type,
        category.label()
    ))
    .style(HEADER_STYLE)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let bar_color = match category {
        TagCategory::ValidMarkers | TagCategory::ValidValues => COUNT_COLOR,
        TagCategory::InvalidMarkers | TagCategory::InvalidValues => INVALID_COLOR,
    };

    // One row per bar; the rest would be clipped anyway
    let capacity = (chunks[1].height as usize).saturating_sub(2);
    let tags = app.get_tag_counts();
    let bars: Vec<Bar> = tags
        .iter()
        .take(capacity)
        .map(|(tag, count)| {
            Bar::default()
                .value(u64::try_from(*count).unwrap_or(u64::MAX))
                .label(Line::from(*tag))
                .text_value(count.to_string())
                .style(Style::default().fg(bar_color))
        })
        .collect();

    let title = if tags.len() > bars.len() {
        format!(" Top {} of {} tags ", bars.len(), tags.len())
    } else {
        format!(" {} tags ", tags.len())
    };
    let chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(HEADER_STYLE)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, chunks[1]);

    draw_footer(
        frame,
        chunks[2],
        " ←→ Category | Esc Back | q Quit ",
    );
}

/// Per-record typing results for the selected entity type.
pub fn draw_entity_browser(frame: &mut Frame, app: &App) {
    let entity_type = app.get_selected_entity_type().unwrap_or("-");
    let entities = app.get_entities();

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(6),    // Records
        Constraint::Length(5), // Tags of the selected record
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let header = Paragraph::new(format!(
        " {} | {} | record {}/{} ",
        app.report.name,
        entity_type,
        app.selected_entity + 1,
        entities.len()
    ))
    .style(HEADER_STYLE)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let visible_rows = (chunks[1].height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_entity >= visible_rows {
        app.selected_entity - visible_rows + 1
    } else {
        0
    };

    let table_header = Row::new(vec!["#", "Id", "Valid", "Details"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = entities
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, c)| {
            let style = item_style(i == app.selected_entity, true);
            let valid = if c.valid { "yes" } else { "no" };
            Row::new(vec![
                format!("{}", i + 1),
                c.id.clone().unwrap_or_else(|| "-".to_string()),
                valid.to_string(),
                describe(c),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(30),
        Constraint::Length(6),
        Constraint::Percentage(60),
    ];
    let table = Table::new(rows, widths)
        .header(table_header)
        .block(Block::default().title(" Records ").borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
    draw_scrollbar(
        frame,
        chunks[1],
        entities.len(),
        visible_rows,
        app.selected_entity,
    );

    let detail: Vec<Line> = app
        .get_selected_entity()
        .map(|c| {
            TagCategory::ALL
                .iter()
                .map(|category| {
                    let tags = category.tags_of(c);
                    Line::from(vec![
                        Span::styled(format!("{:<16}", category.label()), HEADER_STYLE),
                        Span::raw(if tags.is_empty() {
                            "-".to_string()
                        } else {
                            tags.join(" ")
                        }),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();
    let tags =
        Paragraph::new(detail).block(Block::default().borders(Borders::LEFT | Borders::RIGHT));
    frame.render_widget(tags, chunks[2]);

    draw_footer(frame, chunks[3], " ↑↓ Navigate | Esc Back | q Quit ");
}
