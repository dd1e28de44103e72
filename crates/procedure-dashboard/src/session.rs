//! Interactive dashboard session
//!
//! Reads commands from stdin while loads run in the background. Each load
//! carries the ticket it was started with; only the most recently started
//! load may install its records.

use anyhow::{Result, bail};
use procedure_core::{
    ColumnSchema, DashboardState, DashboardView, Field, LoadError, LoadOutcome, LoadTicket,
    LoadedWorkbook, MonthFilter, load_workbook,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::charts::TextChartRenderer;
use crate::render::render_dashboard;

const HELP: &str = "\
Comandos:
  load <arquivo>        carregar planilha (.xlsx, .xls, .ods)
  month <all|1-12>      filtrar por mês
  clear                 remover filtro de mês
  view <overview|procedures|financial>
  show                  redesenhar o dashboard
  help                  esta ajuda
  quit                  sair";

type Completion = (LoadTicket, Result<LoadedWorkbook, LoadError>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Load(PathBuf),
    Month(MonthFilter),
    Clear,
    View(DashboardView),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "load" | "carregar" => {
            if rest.is_empty() {
                bail!("usage: load <path>");
            }
            SessionCommand::Load(PathBuf::from(rest))
        }
        "month" | "mes" | "mês" => SessionCommand::Month(rest.parse()?),
        "clear" | "limpar" => SessionCommand::Clear,
        "view" | "aba" => SessionCommand::View(rest.parse()?),
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "sair" => SessionCommand::Quit,
        other => bail!("unknown command '{}' (type 'help')", other),
    };
    Ok(Some(command))
}

pub struct Session {
    state: DashboardState,
    schema: Arc<ColumnSchema>,
    renderer: TextChartRenderer,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Session {
    pub fn new(schema: ColumnSchema) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: DashboardState::new(),
            schema: Arc::new(schema),
            renderer: TextChartRenderer::default(),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Start a background load. Any load already in flight is superseded.
    pub fn start_load(&mut self, path: PathBuf) -> LoadTicket {
        let ticket = self.state.begin_load();
        let schema = Arc::clone(&self.schema);
        let tx = self.tx.clone();
        debug!(?ticket, path = %path.display(), "Starting load");

        tokio::spawn(async move {
            let result = load_workbook(&path, &schema).await;
            // Receiver only goes away when the session ends
            let _ = tx.send((ticket, result));
        });
        ticket
    }

    /// Apply a finished load to the state. Column warnings are only shown
    /// for the load that actually got installed.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedWorkbook, LoadError>,
    ) -> LoadOutcome {
        let missing = result
            .as_ref()
            .map(|workbook| workbook.missing_columns.clone())
            .unwrap_or_default();

        let outcome = self.state.complete_load(ticket, result);
        for warning in self.column_warnings(outcome, &missing) {
            println!("{}", warning);
        }
        outcome
    }

    fn column_warnings(&self, outcome: LoadOutcome, missing: &[Field]) -> Vec<String> {
        if outcome != LoadOutcome::Installed {
            return Vec::new();
        }
        missing
            .iter()
            .map(|field| format!("Aviso: coluna '{}' não encontrada", self.schema.header(*field)))
            .collect()
    }

    /// Wait for the next load completion and apply it
    pub async fn next_completion(&mut self) -> Option<LoadOutcome> {
        let (ticket, result) = self.rx.recv().await?;
        Some(self.finish_load(ticket, result))
    }

    pub fn apply(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Load(path) => {
                self.start_load(path);
                self.show();
            }
            SessionCommand::Month(filter) => {
                self.state.set_month_filter(filter);
                self.show();
            }
            SessionCommand::Clear => {
                self.state.clear_month_filter();
                self.show();
            }
            SessionCommand::View(view) => {
                self.state.set_active_view(view);
                self.show();
            }
            SessionCommand::Show => self.show(),
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn show(&mut self) {
        println!("{}", render_dashboard(&mut self.state, &self.renderer));
    }

    /// Run until `quit` or end of input
    pub async fn run(mut self, initial: Option<PathBuf>) -> Result<()> {
        if let Some(path) = initial {
            self.start_load(path);
        }
        self.show();
        println!("Digite 'help' para ver os comandos.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("End of input, leaving session");
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Some(command)) => {
                            if self.apply(command) == Flow::Quit {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => println!("Erro: {}", e),
                    }
                }
                Some((ticket, result)) = self.rx.recv() => {
                    if self.finish_load(ticket, result) != LoadOutcome::Stale {
                        self.show();
                    }
                }
            }
        }

        Ok(())
    }
}
