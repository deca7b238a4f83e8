use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tasklists_core::{ListId, ListView, Priority, Task, TaskId};

/// Columns shown at once; the window scrolls to keep the active one visible.
const MAX_VISIBLE_COLUMNS: usize = 4;

/// One column per list, tasks in display order.
pub struct ListBoard {
    columns: Vec<BoardColumn>,
    active_column: usize,
}

struct BoardColumn {
    view: ListView,
    list_state: ListState,
}

impl ListBoard {
    pub fn new(views: Vec<ListView>) -> Self {
        let columns = views
            .into_iter()
            .map(|view| {
                let mut list_state = ListState::default();
                if !view.tasks.is_empty() {
                    list_state.select(Some(0));
                }
                BoardColumn { view, list_state }
            })
            .collect();
        Self {
            columns,
            active_column: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn active_index(&self) -> usize {
        self.active_column
    }

    /// Clamped to the last column.
    pub fn set_active_index(&mut self, idx: usize) {
        self.active_column = idx.min(self.columns.len().saturating_sub(1));
    }

    pub fn active_list(&self) -> Option<&ListView> {
        self.columns.get(self.active_column).map(|c| &c.view)
    }

    /// Returns the currently highlighted task, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        let col = self.columns.get(self.active_column)?;
        let idx = col.list_state.selected()?;
        col.view.tasks.get(idx)
    }

    /// Make the list with `list_id` active, keeping its task cursor.
    pub fn select_list_by_id(&mut self, list_id: ListId) -> bool {
        match self.columns.iter().position(|c| c.view.id == list_id) {
            Some(idx) => {
                self.active_column = idx;
                true
            }
            None => false,
        }
    }

    /// Select a task inside a given list.
    /// Returns `false` and leaves the cursor alone if either id is unknown.
    pub fn select_task_by_id(&mut self, list_id: ListId, task_id: TaskId) -> bool {
        let Some(col_idx) = self.columns.iter().position(|c| c.view.id == list_id) else {
            return false;
        };
        let col = &mut self.columns[col_idx];
        let Some(task_idx) = col.view.tasks.iter().position(|t| t.id() == task_id) else {
            return false;
        };
        self.active_column = col_idx;
        col.list_state.select(Some(task_idx));
        true
    }

    /// Select by position in the active column, clamped.
    pub fn select_row(&mut self, row: usize) {
        if let Some(col) = self.columns.get_mut(self.active_column) {
            if col.view.tasks.is_empty() {
                col.list_state.select(None);
            } else {
                col.list_state.select(Some(row.min(col.view.tasks.len() - 1)));
            }
        }
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.columns.get(self.active_column)?.list_state.selected()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                if self.active_column > 0 {
                    self.active_column -= 1;
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.active_column + 1 < self.columns.len() {
                    self.active_column += 1;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    let current = col.list_state.selected().unwrap_or(0);
                    if current + 1 < col.view.tasks.len() {
                        col.list_state.select(Some(current + 1));
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    let current = col.list_state.selected().unwrap_or(0);
                    if current > 0 {
                        col.list_state.select(Some(current - 1));
                    }
                }
            }
            // Jump to first/last
            KeyCode::Char('g') => self.select_row(0),
            KeyCode::Char('G') => self.select_row(usize::MAX),
            _ => {}
        }
    }

    fn visible_range(&self) -> std::ops::Range<usize> {
        let count = self.columns.len().min(MAX_VISIBLE_COLUMNS);
        let start = (self.active_column + 1).saturating_sub(count);
        start..start + count
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.columns.is_empty() {
            let hint = Paragraph::new("No lists yet. Press N to create the first one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(hint, area);
            return;
        }

        let range = self.visible_range();
        let col_count = range.len() as u32;
        let constraints: Vec<Constraint> = (0..col_count)
            .map(|_| Constraint::Ratio(1, col_count))
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, chunk) in range.zip(chunks.iter()) {
            let is_active = i == self.active_column;
            self.render_column(frame, &self.columns[i], *chunk, is_active);
        }
    }

    fn render_column(&self, frame: &mut Frame, col: &BoardColumn, area: Rect, is_active: bool) {
        let title = format!(" {} ({}) ", col.view.name, col.view.progress);

        let border_style = if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        if col.view.tasks.is_empty() {
            let empty = Paragraph::new("No tasks here.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = col.view.tasks.iter().map(task_line).collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).bold())
            .highlight_symbol("> ");

        let mut state = col.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn task_line(task: &Task) -> ListItem<'_> {
    let (check, title_style) = if task.done() {
        (
            "[x] ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ] ", Style::default())
    };
    ListItem::new(Line::from(vec![
        Span::raw(check),
        Span::styled(task.title(), title_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority().display_name()),
            priority_color(task.priority()),
        ),
    ]))
}

pub fn priority_color(priority: Priority) -> Style {
    match priority {
        Priority::Urgent => Style::default().fg(Color::Red).bold(),
        Priority::High => Style::default().fg(Color::LightRed),
        Priority::Normal => Style::default().fg(Color::Green),
        Priority::Low => Style::default().fg(Color::DarkGray),
    }
}
