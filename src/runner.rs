//! The quiz-play loop: draw a random question over the bridge, shuffle its
//! options, take an answer from the terminal, reveal correctness, repeat.

use std::io::{self, BufRead, Write};

use anyhow::bail;
use rand::seq::SliceRandom;
use tracing::info;

use crate::bridge::{Bridge, Request, Response};
use crate::database::question::Question;
use crate::HandlerResult;

enum Turn {
    Answered(bool),
    Skipped,
    Quit,
}

pub async fn play(bridge: &Bridge) -> HandlerResult {
    let mut score = 0u32;
    let mut answered = 0u32;
    let stdin = io::stdin();

    loop {
        let question = match bridge.invoke(Request::GetRandomQuestion).await? {
            Response::RandomQuestion(Some(question)) => question,
            Response::RandomQuestion(None) => {
                println!("No questions available");
                break;
            }
            other => bail!("unexpected response to get-random-question: {other:?}"),
        };

        let mut options = question.options.clone();
        options.shuffle(&mut rand::thread_rng());

        println!();
        println!("Question: {}", question.question);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }

        match take_answer(&question, &options, &mut stdin.lock())? {
            Turn::Answered(correct) => {
                answered += 1;
                if correct {
                    score += 1;
                    println!("Correct answer");
                } else {
                    println!("Wrong answer. The correct answer is '{}'.", question.answer);
                }
            }
            Turn::Skipped => continue,
            Turn::Quit => break,
        }
    }

    if answered > 0 {
        info!(score, answered, "quiz finished");
        println!();
        println!("Your result is {score}/{answered}");
    }

    Ok(())
}

fn take_answer(
    question: &Question,
    options: &[String],
    input: &mut impl BufRead,
) -> anyhow::Result<Turn> {
    loop {
        print!(
            "Answer 1-{} (t = show tip, n = next question, q = quit): ",
            options.len()
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Turn::Quit);
        }

        match line.trim() {
            "q" => return Ok(Turn::Quit),
            "n" => return Ok(Turn::Skipped),
            "t" => match &question.tip {
                Some(tip) => println!("Tip: {tip}"),
                None => println!("No tip for this question."),
            },
            choice => match choice.parse::<usize>() {
                Ok(i) if (1..=options.len()).contains(&i) => {
                    return Ok(Turn::Answered(grade(question, &options[i - 1])))
                }
                _ => println!("Invalid input. Please try again."),
            },
        }
    }
}

fn grade(question: &Question, chosen: &str) -> bool {
    question.answer == chosen
}
