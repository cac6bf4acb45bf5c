use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::actions::{perform_action, ActionHost, PostAction};
use crate::common::constants::SPINNER_TEMPLATE;
use crate::common::{CommunityChoice, TimeWindow};
use crate::formatting::format_post_row;
use crate::panel::{Effect, FetchRequest, Notification, PanelEvent, PanelState};
use crate::trend_fetcher::{FetchResult, PostSource};

/// Everything the host loop reacts to, funnelled through one channel.
#[derive(Debug)]
pub enum HostMessage {
    Input(String),
    InputClosed,
    Fetched { seq: u64, result: FetchResult },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Community(CommunityChoice),
    Time(TimeWindow),
    Type(String),
    Submit(String),
    Action(PostAction, usize),
    Reload,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "community" | "c" => CommunityChoice::from_value(rest)
            .map(Command::Community)
            .ok_or_else(|| {
                let choices: Vec<&str> = CommunityChoice::all().iter().map(|c| c.value()).collect();
                format!("Unknown community '{}'. Choose one of: {}", rest, choices.join(", "))
            }),
        "time" | "t" => rest.parse::<TimeWindow>().map(Command::Time),
        "type" | "/" => Ok(Command::Type(rest.to_string())),
        "submit" => Ok(Command::Submit(rest.to_string())),
        "open" | "o" => parse_index(rest).map(|i| Command::Action(PostAction::OpenPost, i)),
        "content" => parse_index(rest).map(|i| Command::Action(PostAction::OpenContent, i)),
        "copy" | "y" => parse_index(rest).map(|i| Command::Action(PostAction::CopyLink, i)),
        "reload" | "r" => Ok(Command::Reload),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("Type 'help' for a list of commands.".to_string()),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .ok()
        .filter(|i| *i > 0)
        .ok_or_else(|| format!("Expected a post number, got '{}'", raw))
}

const HELP: &str = "\
Commands:
  community <LandscapePhotography|popular|custom>   select the subreddit source
  time <day|week|month|year|all>                   select the ranking period
  type <text>        edit the search box (custom name in custom mode, title filter otherwise)
  submit <text>      submit the search box
  open <n>           open post n in the browser
  content <n>        open the linked content of post n
  copy <n>           copy the link of post n
  reload             fetch the current query again
  quit";

/// Terminal host around a [`PanelState`]: executes its effects, runs each
/// fetch on a worker thread and renders the view.
pub struct App {
    panel: PanelState,
    source: Arc<dyn PostSource>,
    actions: Box<dyn ActionHost>,
    site_base: String,
    tx: Sender<HostMessage>,
    rx: Receiver<HostMessage>,
    notifications: Vec<Notification>,
}

impl App {
    pub fn new(
        panel: PanelState,
        source: Arc<dyn PostSource>,
        actions: Box<dyn ActionHost>,
        site_base: &str,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            panel,
            source,
            actions,
            site_base: site_base.to_string(),
            tx,
            rx,
            notifications: Vec::new(),
        }
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Notifications shown so far, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn start(&mut self) {
        let effects = self.panel.start();
        self.run_effects(effects);
    }

    pub fn handle(&mut self, event: PanelEvent) {
        let effects = self.panel.apply(event);
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartFetch(request) => self.spawn_fetch(request),
                Effect::Notify(notification) => {
                    debug!("{}: {}", notification.title, notification.message);
                    eprintln!("✖ {}: {}", notification.title, notification.message);
                    self.notifications.push(notification);
                }
            }
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source.fetch(&request.community, request.window);
            if tx
                .send(HostMessage::Fetched {
                    seq: request.seq,
                    result,
                })
                .is_err()
            {
                debug!("Host gone before fetch #{} finished", request.seq);
            }
        });
    }

    /// Feeds fetch completions into the panel until nothing is pending.
    pub fn wait_until_idle(&mut self) -> Result<()> {
        while self.panel.is_loading() {
            let message = self.rx.recv().context("host channel closed")?;
            if let HostMessage::Fetched { seq, result } = message {
                self.handle(PanelEvent::FetchCompleted { seq, result });
            }
        }
        Ok(())
    }

    /// Processes at most one queued message. Returns `false` when nothing
    /// arrived within `timeout`.
    pub fn process_next(&mut self, timeout: Duration) -> Result<bool> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => {
                self.handle_message(message)?;
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(anyhow::anyhow!("host channel closed")),
        }
    }

    /// Fetches once, applies the optional title filter and prints the list.
    /// Returns `false` when the fetch failed.
    pub fn run_once(&mut self, search: Option<String>) -> Result<bool> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template(SPINNER_TEMPLATE)?);
        spinner.set_message(format!("Loading r/{}...", self.panel.active_community()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        self.start();
        let waited = self.wait_until_idle();
        spinner.finish_and_clear();
        waited?;

        // In custom-entry mode the search box holds the community name.
        match search {
            Some(text) if self.panel.selection().is_custom() => {
                warn!(
                    "Ignoring --search '{}': title filtering needs a preset community",
                    text
                );
            }
            Some(text) => self.handle(PanelEvent::SearchTextChanged(text)),
            None => {}
        }
        self.render();
        Ok(self.panel.error().is_none())
    }

    pub fn run_interactive(&mut self) -> Result<()> {
        spawn_input_reader(self.tx.clone());
        println!("{}", HELP);
        self.start();
        self.render();

        loop {
            let message = self.rx.recv().context("host channel closed")?;
            if !self.handle_message(message)? {
                break;
            }
        }
        Ok(())
    }

    fn handle_message(&mut self, message: HostMessage) -> Result<bool> {
        match message {
            HostMessage::Fetched { seq, result } => {
                let fresh = self.panel.pending_seq() == Some(seq);
                self.handle(PanelEvent::FetchCompleted { seq, result });
                if fresh {
                    self.render();
                }
                Ok(true)
            }
            HostMessage::Input(line) => match parse_command(&line) {
                Ok(Command::Quit) => Ok(false),
                Ok(command) => {
                    self.execute(command);
                    Ok(true)
                }
                Err(message) => {
                    eprintln!("{}", message);
                    Ok(true)
                }
            },
            HostMessage::InputClosed => Ok(false),
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Community(choice) => self.handle(PanelEvent::SelectCommunity(choice)),
            Command::Time(window) => self.handle(PanelEvent::SelectTimeWindow(window)),
            Command::Type(text) => self.handle(PanelEvent::SearchTextChanged(text)),
            Command::Submit(text) => self.handle(PanelEvent::SearchSubmitted(text)),
            Command::Reload => self.handle(PanelEvent::Reload),
            Command::Action(action, index) => {
                self.run_action(action, index);
                return;
            }
            Command::Help => {
                println!("{}", HELP);
                return;
            }
            Command::Quit => return,
        }
        self.render();
    }

    fn run_action(&self, action: PostAction, index: usize) {
        let view = self.panel.view();
        let Some(post) = index.checked_sub(1).and_then(|i| view.posts.get(i)) else {
            eprintln!("No post number {} in the current list", index);
            return;
        };

        match perform_action(action, post, &self.site_base, self.actions.as_ref()) {
            Ok(status) => println!("{}", status),
            Err(e) => {
                warn!("{} failed: {:#}", action.title(), e);
                eprintln!("{} failed: {:#}", action.title(), e);
            }
        }
    }

    pub fn render(&self) {
        let view = self.panel.view();
        let mut out = io::stdout().lock();
        let mut lines = vec![
            format!("== {} ==", view.navigation_title),
            format!(
                "Subreddit: {}  |  Time Range: {}",
                view.community_subtitle, view.time_window_title
            ),
        ];
        if !view.search_text.is_empty() {
            lines.push(format!("Search: {}", view.search_text));
        }
        if view.is_loading {
            lines.push("Loading...".to_string());
        }
        if let Some(section) = &view.section_title {
            lines.push(format!("-- {} --", section));
            lines.extend(
                view.posts
                    .iter()
                    .enumerate()
                    .map(|(i, post)| format_post_row(i + 1, post)),
            );
        }
        if let Some(empty) = &view.empty_view {
            lines.push(empty.title.clone());
            lines.push(format!("  {}", empty.description));
        }

        for line in lines {
            if writeln!(out, "{}", line).is_err() {
                return;
            }
        }
        let _ = out.flush();
    }
}

fn spawn_input_reader(tx: Sender<HostMessage>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(HostMessage::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(HostMessage::InputClosed);
    });
}
