//! Line-oriented interactive session over a collection view.

use std::io::Write;
use std::str::FromStr;

use shelf_lib::CollectionController;
use shelf_lib::ViewConfig;
use shelf_lib::error::Error;
use shelf_lib::model::ItemId;
use shelf_lib::view::FetchOutcome;
use shelf_lib::view::Row;
use shelf_lib::view::Snapshot;
use shelf_lib::view::SyncJob;
use shelf_lib::view::SyncOutcome;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::error::CliError;
use crate::error::ParseError;

const HELP: &str = "\
commands:
  show                 redraw the visible rows
  scroll <px>          scroll to an absolute pixel offset
  down | up            scroll by one viewport
  more                 load the next page
  search [text]        filter by text (no text clears the filter)
  select <id>          select an item
  deselect <id>        deselect an item
  move <from> [to]     move the row at index <from> to index <to>
  sync                 wait for pending confirmations
  help                 show this text
  quit                 wait for pending confirmations and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Scroll(u32),
    Down,
    Up,
    More,
    Search(String),
    Select(ItemId),
    Deselect(ItemId),
    /// A missing destination is a cancelled drag.
    Move { from: usize, to: Option<usize> },
    Sync,
    Help,
    Quit,
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };

    let command = match name {
        "show" | "s" => Command::Show,
        "scroll" => Command::Scroll(required(words.next(), "scroll", "a pixel offset")?),
        "down" | "j" => Command::Down,
        "up" | "k" => Command::Up,
        "more" | "m" => Command::More,
        "search" | "/" => Command::Search(words.collect::<Vec<_>>().join(" ")),
        "select" | "x" => Command::Select(required(words.next(), "select", "an item id")?),
        "deselect" | "o" => Command::Deselect(required(words.next(), "deselect", "an item id")?),
        "move" | "mv" => Command::Move {
            from: required(words.next(), "move", "a source row")?,
            to: words.next().map(number).transpose()?,
        },
        "sync" => Command::Sync,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<T: FromStr>(
    word: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<T, ParseError> {
    number(word.ok_or(ParseError::MissingArgument { command, argument })?)
}

fn number<T: FromStr>(word: &str) -> Result<T, ParseError> {
    word.parse()
        .map_err(|_| ParseError::InvalidNumber(word.to_string()))
}

/// Renders the materialized rows followed by a status line.
pub fn render(rows: &[Row], snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for row in rows {
        let mark = if row.selected { 'x' } else { ' ' };
        out.push_str(&format!(
            "{:>5} [{}] {:<6} {}\n",
            row.index, mark, row.item.id, row.item.value
        ));
    }
    if rows.is_empty() {
        out.push_str("      (no items)\n");
    }

    let query = if snapshot.query.is_empty() {
        "-"
    } else {
        snapshot.query.as_str()
    };
    out.push_str(&format!(
        "-- {}/{} loaded{} | {} selected | scroll {}px | search: {}",
        snapshot.items.len(),
        snapshot.total,
        if snapshot.has_more { "" } else { " (all)" },
        snapshot.selected.len(),
        snapshot.scroll_offset,
        query,
    ));
    if snapshot.loading {
        out.push_str(" | loading");
    }
    if let Some(error) = &snapshot.last_error {
        out.push_str(&format!(" | last error: {}", error));
    }
    out
}

fn describe(outcome: &SyncOutcome) -> String {
    let what = match &outcome.job {
        SyncJob::Select(change) if change.selected => format!("select {}", change.id),
        SyncJob::Select(change) => format!("deselect {}", change.id),
        SyncJob::Sort(_) => "reorder".to_string(),
    };
    match &outcome.result {
        Ok(()) => format!("{} confirmed", what),
        Err(e) => format!("{} failed: {}", what, e),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Reads commands from stdin until `quit` or end of input.
pub struct Repl<'a> {
    controller: &'a CollectionController,
    config: ViewConfig,
}

impl<'a> Repl<'a> {
    pub fn new(controller: &'a CollectionController, config: ViewConfig) -> Self {
        Self { controller, config }
    }

    pub async fn run(&self) -> Result<(), CliError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.redraw();

        loop {
            for outcome in self.controller.drain_sync().await? {
                if !outcome.is_ok() {
                    println!("{}", describe(&outcome));
                }
            }

            print!("> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => println!("error: {}", e),
            }

            if self.controller.is_dirty() {
                self.redraw();
            }
        }

        for outcome in self.controller.settle().await? {
            if !outcome.is_ok() {
                println!("{}", describe(&outcome));
            }
        }
        Ok(())
    }

    async fn execute(&self, command: Command) -> Result<Flow, Error> {
        log::debug!("command: {:?}", command);
        let controller = self.controller;

        match command {
            Command::Show => self.redraw(),
            Command::Scroll(offset) => self.scroll(offset).await?,
            Command::Down => {
                let offset = controller.snapshot().scroll_offset;
                self.scroll(offset.saturating_add(self.config.viewport_height))
                    .await?;
            }
            Command::Up => {
                let offset = controller.snapshot().scroll_offset;
                self.scroll(offset.saturating_sub(self.config.viewport_height))
                    .await?;
            }
            Command::More => {
                if controller.load_more().await? == FetchOutcome::Skipped {
                    println!("nothing more to load");
                }
            }
            Command::Search(query) => {
                controller.set_query(query).await?;
            }
            Command::Select(id) => {
                controller.set_selected(id, true).await?;
            }
            Command::Deselect(id) => {
                controller.set_selected(id, false).await?;
            }
            Command::Move { from, to } => {
                if !controller.reorder(from, to).await? {
                    println!("order unchanged");
                }
            }
            Command::Sync => {
                let outcomes = controller.settle().await?;
                if outcomes.is_empty() {
                    println!("nothing pending");
                }
                for outcome in &outcomes {
                    println!("{}", describe(outcome));
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn scroll(&self, offset: u32) -> Result<(), Error> {
        if let FetchOutcome::Applied { loaded, .. } = self.controller.on_scroll(offset).await? {
            println!("loaded {} more items", loaded);
        }
        Ok(())
    }

    fn redraw(&self) {
        let rows = self.controller.visible_rows();
        let snapshot = self.controller.snapshot();
        println!("{}", render(&rows, &snapshot));
        self.controller.clear_dirty();
    }
}
