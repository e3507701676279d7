//! Console output formatter for generation rounds

use colored::Colorize;
use namesmith_application::{GenerationReport, RefinementReport};
use namesmith_domain::{CreatorTag, DomainName, OutputFormat, Question, RoundVerdict, SessionId};
use serde_json::{Value, json};

/// Formats rounds, questions and refinements for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a round in the requested format
    pub fn render(report: &GenerationReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(report),
            OutputFormat::Names => Self::format_names(report),
            OutputFormat::Json => Self::format_json(None, report),
        }
    }

    /// Format the complete round: numbered available names, then taken ones
    pub fn format(report: &GenerationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Round {}", report.loop_count)));
        output.push('\n');

        let available: Vec<_> = report.available().collect();
        output.push_str(&Self::section_header(&format!(
            "Available ({})",
            available.len()
        )));
        if available.is_empty() {
            output.push_str(&format!("  {}\n", "No available names this round.".yellow()));
        }
        for (i, (name, tag)) in available.iter().enumerate() {
            output.push_str(&format!(
                "  {:>2}. {}  {}\n",
                i + 1,
                name.as_str().green().bold(),
                format!("({})", tag).dimmed()
            ));
        }

        let taken: Vec<_> = report.taken().collect();
        if !taken.is_empty() {
            output.push_str(&Self::section_header(&format!("Taken ({})", taken.len())));
            for (name, tag) in taken {
                output.push_str(&format!(
                    "  {} {}  {}\n",
                    "x".red(),
                    name.as_str().dimmed(),
                    format!("({})", tag).dimmed()
                ));
            }
        }

        output.push_str(&format!(
            "\n{} {} attempt(s), {} name(s) checked this session\n",
            "Stats:".cyan().bold(),
            report.outcome.attempts,
            report.history.len()
        ));

        match report.verdict {
            RoundVerdict::Found => {}
            RoundVerdict::Empty { failures } => output.push_str(&format!(
                "{} {} empty round(s) in a row\n",
                "!".yellow().bold(),
                failures
            )),
            RoundVerdict::Aborted { failures } => output.push_str(&format!(
                "{} Session aborted after {} empty rounds in a row\n",
                "x".red().bold(),
                failures
            )),
        }

        output.push_str(&Self::footer());
        output
    }

    /// Available names only, one per line
    pub fn format_names(report: &GenerationReport) -> String {
        report
            .available()
            .map(|(name, _)| format!("{}\n", name))
            .collect()
    }

    /// Format as JSON
    pub fn format_json(session: Option<&SessionId>, report: &GenerationReport) -> String {
        let value = json!({
            "session": session,
            "loop": report.loop_count,
            "status": report.status.as_str(),
            "convergence": report.outcome.status,
            "attempts": report.outcome.attempts,
            "available": entries(report.available()),
            "taken": entries(report.taken()),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Numbered question list
    pub fn format_questions(questions: &[Question]) -> String {
        let mut output = format!("{}\n", "A few questions first:".cyan().bold());
        for (i, question) in questions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, question.text()));
        }
        output
    }

    /// The refined brief and what feedback produced it
    pub fn format_refinement(report: &RefinementReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header(&format!(
            "Refined brief (round {})",
            report.loop_count
        )));
        output.push_str(&Self::indent(&report.brief, "  "));
        output.push('\n');
        if !report.summary.is_empty() {
            output.push_str(&format!("\n{}\n", "Based on:".dimmed()));
            output.push_str(&Self::indent(&report.summary, "  ").dimmed().to_string());
            output.push('\n');
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn entries<'a>(side: impl Iterator<Item = (&'a DomainName, &'a CreatorTag)>) -> Vec<Value> {
    side.map(|(name, tag)| json!({ "name": name, "creator": tag }))
        .collect()
}
