//! REPL (Read-Eval-Print Loop) driving one naming session

use crate::config::{OutputConfig, ReplConfig};
use crate::{ConsoleFormatter, ProgressReporter};
use colored::Colorize;
use namesmith_application::{
    FeedbackInput, GenerationReport, LlmGateway, NoProgress, SessionError, SessionService,
};
use namesmith_domain::{DomainName, OutputFormat, Question, SessionId, SessionSettings};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Answer recorded for a question the user skipped
const NO_COMMENT: &str = "no comment";

/// What the user wants after seeing a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackChoice {
    /// Generate again from the same prompt
    NewBatch,
    /// End the session
    Stop,
    /// 1-based positions into the available list; empty when nothing valid was picked
    Liked(Vec<usize>),
}

impl FeedbackChoice {
    /// Parse `""`, `n` or a list like `1, 3 4`; out-of-range numbers are dropped
    pub fn parse(input: &str, available: usize) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::NewBatch;
        }
        if matches!(input.to_lowercase().as_str(), "n" | "no" | "q" | "quit" | "stop") {
            return Self::Stop;
        }

        let mut picks: Vec<usize> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|part| part.trim().parse::<usize>().ok())
            .filter(|&n| n >= 1 && n <= available)
            .collect();
        picks.sort_unstable();
        picks.dedup();
        Self::Liked(picks)
    }
}

/// Outcome of reading one line
enum Line {
    Text(String),
    Quit,
}

/// Interactive session REPL
pub struct SessionRepl<G: LlmGateway + 'static> {
    service: Arc<SessionService<G>>,
    settings: SessionSettings,
    output: OutputConfig,
    repl: ReplConfig,
}

impl<G: LlmGateway + 'static> SessionRepl<G> {
    /// Create a new SessionRepl
    pub fn new(service: Arc<SessionService<G>>) -> Self {
        Self {
            service,
            settings: SessionSettings::default(),
            output: OutputConfig::default(),
            repl: ReplConfig::default(),
        }
    }

    /// Per-session overrides applied right after the session is created
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_repl_config(mut self, repl: ReplConfig) -> Self {
        self.repl = repl;
        self
    }

    /// Skip the questions, run one round and return it rendered
    pub async fn run_once(&self, brief: &str) -> Result<String, SessionError> {
        let id = self.start(brief).await?.0;
        self.service.submit_answers(&id, &BTreeMap::new()).await?;
        let report = self.generate(&id).await?;

        Ok(match self.output.format {
            OutputFormat::Json => ConsoleFormatter::format_json(Some(&id), &report),
            format => ConsoleFormatter::render(&report, format),
        })
    }

    /// Run the interactive REPL
    pub async fn run(&self, brief: Option<String>) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = &self.repl.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        let brief = match brief.filter(|b| !b.trim().is_empty()) {
            Some(brief) => brief,
            None => loop {
                match Self::read_line(&mut rl, "Describe your project: ")? {
                    Line::Text(text) if text.is_empty() => continue,
                    Line::Text(text) => {
                        let _ = rl.add_history_entry(text.as_str());
                        break text;
                    }
                    Line::Quit => return Ok(()),
                }
            },
        };

        if let Err(e) = self.drive(&mut rl, &brief).await {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }

        if let Some(path) = &self.repl.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    async fn drive(&self, rl: &mut DefaultEditor, brief: &str) -> Result<(), ReplError> {
        let (id, questions) = self.start(brief).await?;
        println!("{} {}\n", "Session:".dimmed(), id);

        let Some(answers) = Self::ask(rl, &questions)? else {
            self.stop(&id).await;
            return Ok(());
        };
        let prompt = self.service.submit_answers(&id, &answers).await?;
        println!("{}\n{}\n", "Generation prompt:".dimmed(), ConsoleFormatter::indent(&prompt, "  "));

        loop {
            let report = match self.generate(&id).await {
                Ok(report) => report,
                Err(e) if e.is_terminal() => {
                    println!("{}", e);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            println!("{}", ConsoleFormatter::render(&report, self.output.format));

            if report.is_aborted() {
                println!("{}", "No available names after too many rounds. Stopping.".red());
                return Ok(());
            }

            let names: Vec<DomainName> = report.available().map(|(n, _)| n.clone()).collect();
            let feedback = if names.is_empty() {
                println!("{}", "Nothing available. Adjusting the brief...".yellow());
                FeedbackInput::default()
            } else {
                let choice = match Self::read_line(
                    rl,
                    "Liked numbers (e.g. 1,3), Enter for a new batch, n to stop: ",
                )? {
                    Line::Text(text) => FeedbackChoice::parse(&text, names.len()),
                    Line::Quit => FeedbackChoice::Stop,
                };
                match choice {
                    FeedbackChoice::NewBatch => continue,
                    FeedbackChoice::Stop => {
                        self.stop(&id).await;
                        return Ok(());
                    }
                    FeedbackChoice::Liked(picks) => match Self::collect_feedback(rl, &names, &picks)? {
                        Some(feedback) => feedback,
                        None => {
                            self.stop(&id).await;
                            return Ok(());
                        }
                    },
                }
            };

            let refinement = self.service.submit_feedback(&id, feedback).await?;
            println!("{}", ConsoleFormatter::format_refinement(&refinement));

            // Empty rounds go straight back to generation
            let answers = if names.is_empty() {
                BTreeMap::new()
            } else {
                match Self::ask(rl, &refinement.questions)? {
                    Some(answers) => answers,
                    None => {
                        self.stop(&id).await;
                        return Ok(());
                    }
                }
            };
            self.service.submit_answers(&id, &answers).await?;
        }
    }

    async fn start(&self, brief: &str) -> Result<(SessionId, Vec<Question>), SessionError> {
        let (id, questions) = self.service.create_session(brief).await?;
        if self.settings != SessionSettings::default() {
            self.service
                .configure_session(&id, self.settings.clone())
                .await?;
        }
        Ok((id, questions))
    }

    async fn generate(&self, id: &SessionId) -> Result<GenerationReport, SessionError> {
        if self.repl.show_progress {
            let progress = ProgressReporter::new();
            self.service.generate_with_progress(id, &progress).await
        } else {
            self.service.generate_with_progress(id, &NoProgress).await
        }
    }

    async fn stop(&self, id: &SessionId) {
        match self.service.stop(id).await {
            Ok(status) => println!("Session {} ({}). Bye!", id, status),
            Err(e) => warn!(session = %id, "Failed to stop session: {}", e),
        }
    }

    /// Ask each question in turn; `None` if the user quit
    fn ask(
        rl: &mut DefaultEditor,
        questions: &[Question],
    ) -> RlResult<Option<BTreeMap<String, String>>> {
        if questions.is_empty() {
            return Ok(Some(BTreeMap::new()));
        }
        println!("{}", ConsoleFormatter::format_questions(questions));

        let mut answers = BTreeMap::new();
        for (i, question) in questions.iter().enumerate() {
            let prompt = format!("  {}. {}\n  > ", i + 1, question.text());
            match Self::read_line(rl, &prompt)? {
                Line::Text(text) if text.is_empty() => {
                    answers.insert(question.id().to_string(), NO_COMMENT.to_string());
                }
                Line::Text(text) => {
                    answers.insert(question.id().to_string(), text);
                }
                Line::Quit => return Ok(None),
            }
        }
        println!();
        Ok(Some(answers))
    }

    /// Reasons for liked names, or a critique of the whole batch
    fn collect_feedback(
        rl: &mut DefaultEditor,
        names: &[DomainName],
        picks: &[usize],
    ) -> RlResult<Option<FeedbackInput>> {
        let mut feedback = FeedbackInput::default();

        if picks.is_empty() {
            match Self::read_line(rl, "None of these? What was wrong with the batch: ")? {
                Line::Text(text) if !text.is_empty() => feedback.critique = Some(text),
                Line::Text(_) => {}
                Line::Quit => return Ok(None),
            }
            return Ok(Some(feedback));
        }

        for &pick in picks {
            let name = &names[pick - 1];
            match Self::read_line(rl, &format!("What do you like about {}? ", name))? {
                Line::Text(text) => {
                    let reason = if text.is_empty() { NO_COMMENT.to_string() } else { text };
                    feedback.liked.insert(name.to_string(), reason);
                }
                Line::Quit => return Ok(None),
            }
        }
        Ok(Some(feedback))
    }

    fn read_line(rl: &mut DefaultEditor, prompt: &str) -> RlResult<Line> {
        match rl.readline(prompt) {
            Ok(line) => Ok(Line::Text(line.trim().to_string())),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Line::Quit),
            Err(err) => Err(err),
        }
    }

    fn print_welcome(&self) {
        let config = self.service.config();
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          namesmith - Naming Session         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Creators: {}",
            config
                .creators
                .iter()
                .map(|c| format!("{} ({})", c.tag, c.agent.model))
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!(
            "Target: {} available name(s) per round, up to {} attempts",
            self.settings
                .target_count
                .unwrap_or(config.search.target_count),
            config.search.max_attempts
        );
        println!("Press Ctrl-D at any prompt to stop.");
        println!();
    }
}

/// Failures that end the interactive loop
#[derive(Debug, thiserror::Error)]
enum ReplError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}
