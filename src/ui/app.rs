use crate::model::{BuildingReport, Classification, Subtypes, TagCategory};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    TagChart,
    EntityBrowser,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    EntityTypes,
    Categories,
    Tags,
}

pub struct App {
    pub report: BuildingReport,
    pub view: View,
    pub focus_panel: FocusPanel,
    pub selected_entity_type: usize,
    pub selected_category: usize,
    pub selected_tag: usize,
    pub selected_entity: usize,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(report: BuildingReport) -> Self {
        Self {
            report,
            view: View::Dashboard,
            focus_panel: FocusPanel::EntityTypes,
            selected_entity_type: 0,
            selected_category: 0,
            selected_tag: 0,
            selected_entity: 0,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => super::dashboard::draw_dashboard(frame, self),
            View::TagChart => super::dashboard::draw_tag_chart(frame, self),
            View::EntityBrowser => super::dashboard::draw_entity_browser(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key.code);
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.view {
            View::Dashboard => self.handle_dashboard_keys(code),
            View::TagChart => self.handle_chart_keys(code),
            View::EntityBrowser => self.handle_entity_keys(code),
        }
    }

    fn handle_dashboard_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.navigate_left(),
            KeyCode::Right | KeyCode::Char('l') => self.navigate_right(),
            KeyCode::Enter => self.enter_tag_chart(),
            KeyCode::Char('e') => self.enter_entity_browser(),
            _ => {}
        }
    }

    fn handle_chart_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => self.view = View::Dashboard,
            KeyCode::Left | KeyCode::Char('h') => self.previous_category(),
            KeyCode::Right | KeyCode::Char('l') => self.next_category(),
            _ => {}
        }
    }

    fn handle_entity_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.view = View::Dashboard,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_entity = self.selected_entity.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.get_entities().len();
                if self.selected_entity < count.saturating_sub(1) {
                    self.selected_entity += 1;
                }
            }
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::EntityTypes => {
                if self.selected_entity_type > 0 {
                    self.selected_entity_type -= 1;
                    self.selected_tag = 0;
                }
            }
            FocusPanel::Categories => self.previous_category(),
            FocusPanel::Tags => self.selected_tag = self.selected_tag.saturating_sub(1),
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::EntityTypes => {
                if self.selected_entity_type < self.get_entity_types().len().saturating_sub(1) {
                    self.selected_entity_type += 1;
                    self.selected_tag = 0;
                }
            }
            FocusPanel::Categories => self.next_category(),
            FocusPanel::Tags => {
                if self.selected_tag < self.get_tag_counts().len().saturating_sub(1) {
                    self.selected_tag += 1;
                }
            }
        }
    }

    fn navigate_left(&mut self) {
        match self.focus_panel {
            FocusPanel::Tags => self.focus_panel = FocusPanel::Categories,
            FocusPanel::Categories => self.focus_panel = FocusPanel::EntityTypes,
            FocusPanel::EntityTypes => {}
        }
    }

    fn navigate_right(&mut self) {
        match self.focus_panel {
            FocusPanel::EntityTypes => self.focus_panel = FocusPanel::Categories,
            FocusPanel::Categories => self.focus_panel = FocusPanel::Tags,
            FocusPanel::Tags => {}
        }
    }

    fn previous_category(&mut self) {
        if self.selected_category > 0 {
            self.selected_category -= 1;
            self.selected_tag = 0;
        }
    }

    fn next_category(&mut self) {
        if self.selected_category < TagCategory::ALL.len() - 1 {
            self.selected_category += 1;
            self.selected_tag = 0;
        }
    }

    fn enter_tag_chart(&mut self) {
        // The chart needs a category; from the type list Enter does nothing
        if self.focus_panel != FocusPanel::EntityTypes && !self.get_tag_counts().is_empty() {
            self.view = View::TagChart;
        }
    }

    fn enter_entity_browser(&mut self) {
        if !self.get_entities().is_empty() {
            self.view = View::EntityBrowser;
            self.selected_entity = 0;
        }
    }

    #[must_use]
    pub fn get_entity_types(&self) -> Vec<&str> {
        self.report.entity_types()
    }

    #[must_use]
    pub fn get_selected_entity_type(&self) -> Option<&str> {
        self.get_entity_types()
            .get(self.selected_entity_type)
            .copied()
    }

    #[must_use]
    pub fn get_selected_category(&self) -> TagCategory {
        TagCategory::ALL[self.selected_category.min(TagCategory::ALL.len() - 1)]
    }

    /// Tags of the selected type and category, most used first.
    #[must_use]
    pub fn get_tag_counts(&self) -> Vec<(&str, usize)> {
        let Some(entity_type) = self.get_selected_entity_type() else {
            return Vec::new();
        };
        let Some(counts) = self.report.counts(entity_type, self.get_selected_category()) else {
            return Vec::new();
        };

        let mut tags: Vec<(&str, usize)> =
            counts.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tags
    }

    /// Distinct tags per category for the selected type.
    #[must_use]
    pub fn get_category_sizes(&self) -> Vec<(TagCategory, usize)> {
        let entity_type = self.get_selected_entity_type().unwrap_or_default();
        TagCategory::ALL
            .iter()
            .map(|c| (*c, self.report.counts(entity_type, *c).map_or(0, |m| m.len())))
            .collect()
    }

    /// Records classified under the selected type.
    #[must_use]
    pub fn get_entities(&self) -> Vec<&Classification> {
        let Some(entity_type) = self.get_selected_entity_type() else {
            return Vec::new();
        };
        self.report
            .entities
            .iter()
            .filter(|c| c.bucket() == entity_type)
            .collect()
    }

    #[must_use]
    pub fn get_selected_entity(&self) -> Option<&Classification> {
        self.get_entities().get(self.selected_entity).copied()
    }
}

/// One-line description of a record's typing outcome.
#[must_use]
pub fn describe(classification: &Classification) -> String {
    if let Some(description) = &classification.description {
        return description.clone();
    }
    match &classification.subtypes {
        Some(Subtypes::Equip {
            subclasses_in_entity,
            ..
        }) if !subclasses_in_entity.is_empty() => subclasses_in_entity.join(", "),
        Some(Subtypes::Point {
            point_functions,
            phenomena,
            quantities,
        }) => {
            let facets: Vec<&str> = point_functions
                .iter()
                .chain(phenomena)
                .chain(quantities)
                .map(String::as_str)
                .collect();
            if facets.is_empty() {
                "-".to_string()
            } else {
                facets.join(" ")
            }
        }
        _ => "-".to_string(),
    }
}
