use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::bridge::Bridge;
use crate::{editor, runner, HandlerResult};

#[derive(Debug, Parser)]
#[command(name = "quizbank", about = "Author and play multiple-choice quizzes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage questions.
    #[command(subcommand)]
    Question(QuestionCommand),
    /// Answer random questions until you quit.
    Play,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List every category.
    List,
    /// Add a category; the name is stored lowercased.
    Add { name: String },
    /// Delete a category by id. Questions keep their reference.
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum QuestionCommand {
    /// List every question.
    List,
    /// Add a question.
    Add {
        /// The prompt.
        #[arg(long)]
        question: String,
        /// Candidate answer, repeat 2 to 5 times.
        #[arg(long = "option")]
        options: Vec<String>,
        /// The correct answer; must be one of the options.
        #[arg(long)]
        answer: String,
        /// Hint shown on demand during play.
        #[arg(long)]
        tip: Option<String>,
        /// Category id.
        #[arg(long)]
        category: Option<i64>,
    },
    /// Replace every field of a question.
    Update {
        id: i64,
        #[arg(long)]
        question: String,
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        tip: Option<String>,
        #[arg(long)]
        category: Option<i64>,
    },
    /// Delete a question by id.
    Delete { id: i64 },
}

pub async fn run(cli: Cli, bridge: Arc<Bridge>) -> HandlerResult {
    match cli.command {
        Command::Category(command) => editor::run_category(command, &bridge).await,
        Command::Question(command) => editor::run_question(command, &bridge).await,
        Command::Play => runner::play(&bridge).await,
    }
}
