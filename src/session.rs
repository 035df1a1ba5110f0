//! Interactive terminal session driving the controller.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::controller::GeneratorController;
use crate::error::Result;
use crate::models::{ApiConfig, View};
use crate::templates::{self, TEMPLATES};
use crate::visual::Visual;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Templates,
    Template(usize),
    Favorites,
    Unfavorite(usize),
    Star(usize),
    List,
    Clear,
    Settings,
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parse one input line. Anything that is not a known command is a scenario.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let position = |usage: &str| -> std::result::Result<usize, String> {
            rest.parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("用法: {usage}"))
        };

        match head.to_lowercase().as_str() {
            "go" => Ok(Self::Submit(rest.to_string())),
            "templates" => Ok(Self::Templates),
            "t" if rest.is_empty() => Ok(Self::Templates),
            "t" => position("t <编号>").map(Self::Template),
            "favs" | "f" => Ok(Self::Favorites),
            "unfav" => position("unfav <编号>").map(Self::Unfavorite),
            "star" | "s" => position("star <编号>").map(Self::Star),
            "list" | "l" => Ok(Self::List),
            "clear" => Ok(Self::Clear),
            "settings" => Ok(Self::Settings),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Ok(Self::Submit(line.to_string())),
        }
    }
}

pub struct Session<R> {
    controller: GeneratorController,
    input: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Session<R> {
    pub fn new(controller: GeneratorController, reader: R) -> Self {
        Self {
            controller,
            input: reader.lines(),
        }
    }

    pub fn controller(&self) -> &GeneratorController {
        &self.controller
    }

    /// Run until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        Visual::display_banner();

        loop {
            if self.controller.view() == View::Settings {
                self.settings_view().await?;
                self.flush_notices();
                continue;
            }

            let Some(line) = self.input.next_line().await? else {
                tracing::info!("Input closed - ending session");
                return Ok(());
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(usage) => {
                    println!("{usage}");
                    continue;
                }
            };
            if command == Command::Quit {
                return Ok(());
            }
            self.dispatch(command).await;
            self.flush_notices();
        }
    }

    async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Submit(text) => {
                if !text.trim().is_empty() {
                    self.show_loading();
                }
                if self.controller.submit_scenario(&text).await.is_ok() {
                    self.show_topics();
                }
            }
            Command::Templates => {
                Visual::display_templates(&TEMPLATES);
            }
            Command::Template(position) => match templates::by_position(position) {
                Some(template) => {
                    self.show_loading();
                    if self.controller.select_template(template).await.is_ok() {
                        self.show_topics();
                    }
                }
                None => println!("没有编号为 {position} 的模板"),
            },
            Command::Favorites => Visual::display_favorites(self.controller.favorites()),
            Command::Unfavorite(position) => {
                match self.controller.favorites().get(position - 1).cloned() {
                    Some(topic) => {
                        self.controller.toggle_favorite(&topic);
                    }
                    None => println!("没有编号为 {position} 的收藏"),
                }
            }
            Command::Star(position) => match self.controller.topics().get(position - 1).cloned() {
                Some(topic) => {
                    self.controller.toggle_favorite(&topic);
                }
                None => println!("没有编号为 {position} 的话题"),
            },
            Command::List => self.show_topics(),
            Command::Clear => self.controller.clear_topics(),
            Command::Settings => self.controller.open_settings(),
            Command::Help => Visual::display_help(),
            Command::Quit | Command::Empty => {}
        }
    }

    /// Edit the three API fields in turn. End of input cancels.
    async fn settings_view(&mut self) -> Result<()> {
        let current = self.controller.api_config().clone();
        Visual::display_settings(&current);

        let Some(api_url) = self.prompt_field("API 地址", &current.api_url).await? else {
            self.controller.cancel_settings();
            return Ok(());
        };
        let Some(api_key) = self.prompt_key(&current).await? else {
            self.controller.cancel_settings();
            return Ok(());
        };
        let Some(model) = self.prompt_field("模型", &current.model).await? else {
            self.controller.cancel_settings();
            return Ok(());
        };

        let updated = ApiConfig {
            api_url: api_url.unwrap_or(current.api_url),
            api_key: api_key.unwrap_or(current.api_key),
            model: model.unwrap_or(current.model),
        };

        println!("保存设置? (y/N)");
        match self.input.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                self.controller.save_settings(updated)
            }
            _ => {
                println!("已取消");
                self.controller.cancel_settings();
            }
        }
        Ok(())
    }

    /// `Ok(None)` on end of input, `Ok(Some(None))` when the user keeps the current value
    async fn prompt_field(&mut self, label: &str, shown: &str) -> Result<Option<Option<String>>> {
        println!("{label} [{shown}]:");
        Ok(self.input.next_line().await?.map(|line| {
            let value = line.trim();
            (!value.is_empty()).then(|| value.to_string())
        }))
    }

    /// Like `prompt_field`, but answering `show` prints the current key in full
    /// and asks again
    async fn prompt_key(&mut self, current: &ApiConfig) -> Result<Option<Option<String>>> {
        loop {
            match self.prompt_field("API Key (show 显示)", &current.masked_key()).await? {
                Some(Some(answer)) if answer.eq_ignore_ascii_case("show") => {
                    if current.has_api_key() {
                        println!("  API Key: {}", current.api_key);
                    } else {
                        println!("  API Key: {}", current.masked_key());
                    }
                }
                other => return Ok(other),
            }
        }
    }

    // The session awaits each request before reading more input, so this is
    // printed up front rather than driven by `is_loading()`.
    fn show_loading(&self) {
        if self.controller.api_config().has_api_key() {
            Visual::display_loading();
        }
    }

    fn show_topics(&self) {
        let controller = &self.controller;
        Visual::display_topics(
            controller.topics(),
            controller.current_category(),
            |id| controller.is_favorite(id),
        );
    }

    fn flush_notices(&mut self) {
        for notice in self.controller.drain_notices() {
            Visual::display_notice(&notice);
        }
    }
}
