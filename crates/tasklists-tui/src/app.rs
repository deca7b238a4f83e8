use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tasklists_core::{ListId, Priority, ProjectionCache, Task, TaskId};
use tasklists_service::BoardService;

use crate::components::list_board::{priority_color, ListBoard};

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Normal board navigation
    Normal,
    /// Typing a new list name
    NewList { input: String },
    /// Editing the active list's name
    RenameList { list_id: ListId, input: String },
    /// Typing a new task title; Tab cycles the priority
    NewTask {
        list_id: ListId,
        input: String,
        priority: Priority,
    },
    /// Priority picker
    PriorityPick {
        list_id: ListId,
        task_id: TaskId,
        current: Priority,
    },
    /// Confirm delete task
    ConfirmDeleteTask { list_id: ListId, task: Task },
    /// Confirm delete list (and everything in it)
    ConfirmDeleteList { list_id: ListId, name: String },
}

pub struct App {
    service: Box<dyn BoardService>,
    board: ListBoard,
    projections: ProjectionCache,
    mode: Mode,
    status_message: Option<String>,
}

impl App {
    pub fn new(service: Box<dyn BoardService>) -> Self {
        let mut projections = ProjectionCache::new();
        let board = ListBoard::new(projections.views(service.board()).to_vec());
        Self {
            service,
            board,
            projections,
            mode: Mode::Normal,
            status_message: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn board(&self) -> &ListBoard {
        &self.board
    }

    pub fn service(&self) -> &dyn BoardService {
        self.service.as_ref()
    }

    pub fn service_mut(&mut self) -> &mut dyn BoardService {
        self.service.as_mut()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(
            self.mode,
            Mode::NewList { .. } | Mode::RenameList { .. } | Mode::NewTask { .. }
        )
    }

    /// Rebuild the board if the store moved on, keeping the cursor on the
    /// same list and task (or the same positions if those are gone).
    pub fn refresh(&mut self) {
        let list_id = self.board.active_list().map(|l| l.id);
        let task_id = self.board.selected_task().map(|t| t.id());
        self.refresh_selecting(list_id, task_id);
    }

    fn refresh_selecting(&mut self, list_id: Option<ListId>, task_id: Option<TaskId>) {
        let board = self.service.board();
        if !self.projections.is_stale(board) {
            return;
        }
        let col = self.board.active_index();
        let row = self.board.selected_row();

        self.board = ListBoard::new(self.projections.views(board).to_vec());

        let list_found = list_id.is_some_and(|id| self.board.select_list_by_id(id));
        if !list_found {
            self.board.set_active_index(col);
        }
        let task_found = match (list_id, task_id) {
            (Some(l), Some(t)) => self.board.select_task_by_id(l, t),
            _ => false,
        };
        if !task_found && list_found {
            if let Some(row) = row {
                self.board.select_row(row);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::NewList { input } => self.handle_new_list(key, input),
            Mode::RenameList { list_id, input } => self.handle_rename_list(key, list_id, input),
            Mode::NewTask {
                list_id,
                input,
                priority,
            } => self.handle_new_task(key, list_id, input, priority),
            Mode::PriorityPick {
                list_id, task_id, ..
            } => self.handle_priority_pick(key, list_id, task_id),
            Mode::ConfirmDeleteTask { list_id, task } => {
                self.handle_confirm_delete_task(key, list_id, task)
            }
            Mode::ConfirmDeleteList { list_id, name } => {
                self.handle_confirm_delete_list(key, list_id, name)
            }
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        let active = self.board.active_list().map(|l| l.id);
        let selected = self.board.selected_task().cloned();

        match key.code {
            KeyCode::Char('N') => {
                self.mode = Mode::NewList {
                    input: String::new(),
                };
            }
            KeyCode::Char('n') => match active {
                Some(list_id) => {
                    self.mode = Mode::NewTask {
                        list_id,
                        input: String::new(),
                        priority: Priority::default(),
                    };
                }
                None => self.status_message = Some("Create a list first (N)".into()),
            },
            KeyCode::Char('r') => {
                if let Some(list) = self.board.active_list() {
                    self.mode = Mode::RenameList {
                        list_id: list.id,
                        input: list.name.clone(),
                    };
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let (Some(list_id), Some(task)) = (active, selected) {
                    self.service.toggle_task(list_id, task.id());
                    self.refresh();
                }
            }
            KeyCode::Char('p') => {
                if let (Some(list_id), Some(task)) = (active, selected) {
                    self.mode = Mode::PriorityPick {
                        list_id,
                        task_id: task.id(),
                        current: task.priority(),
                    };
                }
            }
            KeyCode::Char('d') => {
                if let (Some(list_id), Some(task)) = (active, selected) {
                    self.mode = Mode::ConfirmDeleteTask { list_id, task };
                }
            }
            KeyCode::Char('D') => {
                if let Some(list) = self.board.active_list() {
                    self.mode = Mode::ConfirmDeleteList {
                        list_id: list.id,
                        name: list.name.clone(),
                    };
                }
            }
            KeyCode::Char('c') => {
                if let Some(list) = self.board.active_list() {
                    let done = list.progress.done;
                    let list_id = list.id;
                    if done == 0 {
                        self.status_message = Some("Nothing to clear".into());
                    } else if self.service.clear_done(list_id) {
                        self.refresh();
                        self.status_message = Some(format!("Cleared {done} done"));
                    }
                }
            }
            _ => self.board.handle_key(key),
        }
    }

    fn handle_new_list(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                match self.service.add_list(&input) {
                    Some(list_id) => {
                        self.refresh_selecting(Some(list_id), None);
                        self.status_message = Some("List created".into());
                    }
                    None => self.status_message = Some("List name cannot be blank".into()),
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::NewList { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::NewList { input };
            }
            _ => {}
        }
    }

    fn handle_rename_list(&mut self, key: KeyEvent, list_id: ListId, mut input: String) {
        match key.code {
            // Blank input keeps the old name; the store decides.
            KeyCode::Enter => {
                if self.service.rename_list(list_id, &input) {
                    self.refresh();
                    self.status_message = Some("List renamed".into());
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::RenameList { list_id, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::RenameList { list_id, input };
            }
            _ => {}
        }
    }

    fn handle_new_task(
        &mut self,
        key: KeyEvent,
        list_id: ListId,
        mut input: String,
        priority: Priority,
    ) {
        match key.code {
            KeyCode::Enter => {
                match self.service.add_task(list_id, &input, priority) {
                    Some(task_id) => {
                        self.refresh_selecting(Some(list_id), Some(task_id));
                        self.status_message = Some("Task added".into());
                    }
                    None => self.status_message = Some("Task title cannot be blank".into()),
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Tab => {
                self.mode = Mode::NewTask {
                    list_id,
                    input,
                    priority: priority.cycle(),
                };
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::NewTask {
                    list_id,
                    input,
                    priority,
                };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::NewTask {
                    list_id,
                    input,
                    priority,
                };
            }
            _ => {}
        }
    }

    fn handle_priority_pick(&mut self, key: KeyEvent, list_id: ListId, task_id: TaskId) {
        let priority = match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                Priority::ALL.get(idx).copied()
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return;
            }
            _ => None,
        };

        if let Some(p) = priority {
            if self.service.set_priority(list_id, task_id, p) {
                self.refresh();
            }
            self.status_message = Some(format!("Priority: {p}"));
        }
        self.mode = Mode::Normal;
    }

    fn handle_confirm_delete_task(&mut self, key: KeyEvent, list_id: ListId, task: Task) {
        if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code {
            if self.service.remove_task(list_id, task.id()) {
                self.refresh();
                self.status_message = Some(format!("Deleted: {}", task.title()));
            }
        }
        self.mode = Mode::Normal;
    }

    fn handle_confirm_delete_list(&mut self, key: KeyEvent, list_id: ListId, name: String) {
        if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code {
            if self.service.remove_list(list_id) {
                self.refresh();
                self.status_message = Some(format!("Deleted list: {name}"));
            }
        }
        self.mode = Mode::Normal;
    }

    //  Rendering

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.board.render(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::NewList { input } => self.render_input_bar(frame, " New list ", input, area),
            Mode::RenameList { input, .. } => {
                self.render_input_bar(frame, " Rename list ", input, area)
            }
            Mode::NewTask {
                input, priority, ..
            } => {
                let label = format!(" New task [{}] (Tab: priority) ", priority.display_name());
                self.render_input_bar(frame, &label, input, area)
            }
            Mode::PriorityPick { current, .. } => {
                self.render_priority_pick(frame, *current, area)
            }
            Mode::ConfirmDeleteTask { task, .. } => {
                self.render_confirm(frame, &format!("Delete \"{}\"?", task.title()), area)
            }
            Mode::ConfirmDeleteList { name, .. } => self.render_confirm(
                frame,
                &format!("Delete list \"{name}\" and all its tasks?"),
                area,
            ),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let lists = self.service.board().lists().len();
        let mut spans = vec![
            Span::styled(" tasklists ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(
                format!("{lists} list{}", if lists == 1 { "" } else { "s" }),
                Style::default().fg(Color::Yellow),
            ),
        ];
        if self.service.is_dirty() {
            spans.push(Span::styled(
                " | unsaved changes",
                Style::default().fg(Color::Red).bold(),
            ));
        }
        let title = Line::from(spans);
        frame.render_widget(title, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("h/l", "lists"),
                ("j/k", "tasks"),
                ("N", "new list"),
                ("n", "new task"),
                ("space", "toggle"),
                ("p", "priority"),
                ("d", "del"),
                ("r", "rename"),
                ("D", "del list"),
                ("c", "clear done"),
            ],
            Mode::NewList { .. } => vec![("Enter", "create"), ("Esc", "cancel")],
            Mode::RenameList { .. } => vec![("Enter", "save"), ("Esc", "cancel")],
            Mode::NewTask { .. } => {
                vec![("Enter", "add"), ("Tab", "priority"), ("Esc", "cancel")]
            }
            Mode::PriorityPick { .. } => vec![
                ("1", "urgent"),
                ("2", "high"),
                ("3", "normal"),
                ("4", "low"),
                ("Esc", "cancel"),
            ],
            Mode::ConfirmDeleteTask { .. } | Mode::ConfirmDeleteList { .. } => {
                vec![("y", "confirm"), ("any", "cancel")]
            }
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: area.height.min(3),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label.to_string());
        let paragraph = Paragraph::new(input.to_string()).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_confirm(&self, frame: &mut Frame, question: &str, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("{question}\n\n(y)es / (any key) cancel");
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_priority_pick(&self, frame: &mut Frame, current: Priority, area: Rect) {
        let popup = centered_rect(30, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Set Priority ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let lines: Vec<Line> = Priority::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = if *p == current { "> " } else { "  " };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        format!("[{}] ", i + 1),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::styled(p.display_name(), priority_color(*p)),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, popup);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
