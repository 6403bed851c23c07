use crate::browser::{SortKey, StatusFilter, VillageBrowser};
use crate::commands::AppCommand;
use crate::village::{Dimension, VillageId, VillageRecord};
use crossterm::event::KeyCode;
use log::warn;
use std::str::FromStr;
use tokio::sync::mpsc;

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(PartialEq, Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub enum AppEvent {
    Log(String),
    Message(String),
    Error(String),
    Loading,
    Villages(Vec<VillageRecord>),
    LoadFailed(String),
}

/// Column order of the table; digit keys 1-9 and 0 sort by these.
pub const SORT_COLUMNS: [SortKey; 10] = [
    SortKey::Name,
    SortKey::District,
    SortKey::Status,
    SortKey::TotalScore,
    SortKey::Dimension(Dimension::BasicServices),
    SortKey::Dimension(Dimension::Social),
    SortKey::Dimension(Dimension::Economic),
    SortKey::Dimension(Dimension::Environmental),
    SortKey::Dimension(Dimension::Accessibility),
    SortKey::Dimension(Dimension::Governance),
];

const COMMANDS: [&str; 11] = [
    "search", "filter", "sort", "page", "expand", "reload", "seed", "import", "clear", "help",
    "quit",
];

pub struct App {
    pub input_mode: InputMode,
    pub load_state: LoadState,
    pub browser: VillageBrowser,
    /// Highlighted row within the current page.
    pub cursor: usize,
    pub detail_scroll: u16,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        startup_info: Vec<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["app started".to_string()];
        log_messages.extend(startup_info);

        App {
            input_mode: InputMode::Normal,
            load_state: LoadState::Loading,
            browser: VillageBrowser::new(Vec::new()),
            cursor: 0,
            detail_scroll: 0,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Log(msg) | AppEvent::Message(msg) | AppEvent::Error(msg) => {
                self.add_log(msg)
            }
            AppEvent::Loading => {
                if self.load_state != LoadState::Ready {
                    self.load_state = LoadState::Loading;
                }
            }
            AppEvent::Villages(records) => {
                self.add_log(format!("✓ {} records loaded", records.len()));
                self.browser.load(records);
                self.load_state = LoadState::Ready;
                self.cursor = 0;
            }
            AppEvent::LoadFailed(msg) => {
                self.add_log(format!("✗ load failed: {}", msg));
                self.load_state = LoadState::Failed(msg);
            }
        }
    }

    /// Number of rows on the page currently shown.
    pub fn page_len(&self) -> usize {
        self.browser.compute_view().page_records.len()
    }

    pub fn selected_id(&self) -> Option<VillageId> {
        self.browser
            .compute_view()
            .page_records
            .get(self.cursor)
            .map(|r| r.id)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.page_len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn get_completion_hint(&self) -> Option<String> {
        let input = self.command_input.trim_start();
        if input.is_empty() {
            return None;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let ends_with_space = input.ends_with(' ');
        if parts.len() == 1 && !ends_with_space {
            return COMMANDS
                .iter()
                .find(|c| c.starts_with(parts[0]) && **c != parts[0])
                .map(|c| c[parts[0].len()..].to_string());
        }

        let cur = if ends_with_space {
            ""
        } else {
            parts.last().copied().unwrap_or("")
        };
        if cur.is_empty() || parts.len() > 2 || (parts.len() == 2 && ends_with_space) {
            return None;
        }
        let subs: &[&str] = match parts[0] {
            "filter" => &["all", "mandiri", "maju", "berkembang", "tertinggal"],
            "sort" => &[
                "name", "district", "status", "score", "DLD", "DS", "DE", "DL", "DA", "DTKPD",
            ],
            _ => return None,
        };
        subs.iter()
            .find(|s| s.starts_with(cur) && **s != cur)
            .map(|s| s[cur.len()..].to_string())
    }

    pub fn send_to_loader(&mut self, cmd: AppCommand) {
        if let Err(e) = self.cmd_tx.send(cmd) {
            warn!("loader unavailable, dropped {:?}", e.0);
            self.add_log(format!("✗ loader stopped, {:?} not run", e.0));
        }
    }

    /// Applies a browser-side command and logs what changed.
    pub fn apply_local(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::Search { text } => {
                self.browser.set_search_text(text.clone());
                self.cursor = 0;
                if text.is_empty() {
                    self.add_log("search cleared".to_string());
                }
            }
            AppCommand::Filter { status } => {
                self.browser.set_status_filter_str(&status);
                self.cursor = 0;
                let applied = self.browser.state().status_filter;
                if status.parse::<StatusFilter>().is_err() {
                    self.add_log(format!("⚠ unknown status {:?}, showing {}", status, applied));
                }
            }
            AppCommand::Sort { key } => {
                if !self.browser.sort_by_str(&key) {
                    self.add_log(format!("⚠ unknown sort column {:?} ignored", key));
                }
            }
            AppCommand::Page { n } => {
                self.browser.set_page(n);
                self.cursor = 0;
            }
            AppCommand::Expand { id } => {
                if self.browser.record(id).is_none() {
                    self.add_log(format!("⚠ no village with id {}", id));
                }
                self.browser.toggle_expand(id);
                self.detail_scroll = 0;
            }
            other => self.send_to_loader(other),
        }
        self.clamp_cursor();
    }

    /// Returns true for `quit`.
    fn submit_command(&mut self) -> bool {
        let cmd_owned = self.command_input.trim().to_string();
        self.command_input.clear();
        self.command_cursor = 0;
        self.input_mode = InputMode::Normal;
        if cmd_owned.is_empty() {
            return false;
        }

        let app_cmd = AppCommand::from_str(&cmd_owned)
            .unwrap_or_else(|_| AppCommand::Unknown(cmd_owned.clone()));
        let quit = app_cmd == AppCommand::Quit;
        if app_cmd.is_local() {
            self.apply_local(app_cmd);
        } else {
            self.send_to_loader(app_cmd);
        }

        self.command_history.push(cmd_owned);
        self.command_history_index = None;
        quit
    }

    fn prev_char_boundary(&self) -> usize {
        self.command_input[..self.command_cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_char_boundary(&self) -> usize {
        self.command_input[self.command_cursor..]
            .chars()
            .next()
            .map(|c| self.command_cursor + c.len_utf8())
            .unwrap_or(self.command_cursor)
    }

    fn handle_command_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Enter => return self.submit_command(),
            KeyCode::Esc => {
                self.command_input.clear();
                self.command_cursor = 0;
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab => {
                if let Some(hint) = self.get_completion_hint() {
                    let insert = format!("{} ", hint);
                    self.command_input.insert_str(self.command_cursor, &insert);
                    self.command_cursor += insert.len();
                }
            }
            KeyCode::Up => {
                if self.command_history.is_empty() {
                    return false;
                }
                let next = match self.command_history_index {
                    None => self.command_history.len() - 1,
                    Some(i) => i.saturating_sub(1),
                };
                self.command_history_index = Some(next);
                self.command_input = self.command_history[next].clone();
                self.command_cursor = self.command_input.len();
            }
            KeyCode::Down => {
                let Some(i) = self.command_history_index else {
                    return false;
                };
                let n = i + 1;
                if n >= self.command_history.len() {
                    self.command_history_index = None;
                    self.command_input.clear();
                    self.command_cursor = 0;
                    return false;
                }
                self.command_history_index = Some(n);
                self.command_input = self.command_history[n].clone();
                self.command_cursor = self.command_input.len();
            }
            KeyCode::Backspace => {
                if self.command_cursor > 0 {
                    let idx = self.prev_char_boundary();
                    self.command_input.remove(idx);
                    self.command_cursor = idx;
                }
            }
            KeyCode::Delete => {
                if self.command_cursor < self.command_input.len() {
                    self.command_input.remove(self.command_cursor);
                }
            }
            KeyCode::Left => self.command_cursor = self.prev_char_boundary(),
            KeyCode::Right => self.command_cursor = self.next_char_boundary(),
            KeyCode::Home => self.command_cursor = 0,
            KeyCode::End => self.command_cursor = self.command_input.len(),
            KeyCode::Char(c) => {
                self.command_input.insert(self.command_cursor, c);
                self.command_cursor += c.len_utf8();
            }
            _ => {}
        }
        false
    }

    /// Returns true when the app should exit.
    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        if self.input_mode == InputMode::Command {
            return self.handle_command_key(key);
        }

        match key {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
            }
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < self.page_len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.browser.prev_page();
                self.cursor = 0;
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.browser.next_page();
                self.cursor = 0;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.browser.toggle_expand(id);
                    self.detail_scroll = 0;
                }
            }
            KeyCode::Esc | KeyCode::Char('x') => {
                if let Some(id) = self.browser.expanded_id() {
                    self.browser.toggle_expand(id);
                }
            }
            KeyCode::Char('j') => self.detail_scroll = self.detail_scroll.saturating_add(1),
            KeyCode::Char('k') => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            KeyCode::Char('f') => {
                let next = self.browser.state().status_filter.next();
                self.browser.set_status_filter(next);
                self.cursor = 0;
            }
            KeyCode::Char('r') => self.send_to_loader(AppCommand::Reload),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let idx = match c.to_digit(10) {
                    Some(0) => 9,
                    Some(d) => d as usize - 1,
                    None => return false,
                };
                self.browser.sort_by(SORT_COLUMNS[idx]);
            }
            _ => {}
        }
        false
    }
}
