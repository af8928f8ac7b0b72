//! Category and question editing flows. Everything goes through the bridge;
//! the 2-to-5 option rule and "answer is one of the options" are checked
//! here, before submission, never by the store.

use anyhow::bail;
use tracing::instrument;

use crate::bridge::{Bridge, Request, Response};
use crate::commands::{CategoryCommand, QuestionCommand};
use crate::database::question::QuestionDraft;
use crate::HandlerResult;

#[instrument(level = "info", skip(bridge))]
pub async fn run_category(command: CategoryCommand, bridge: &Bridge) -> HandlerResult {
    match command {
        CategoryCommand::List => match bridge.invoke(Request::GetCategories).await? {
            Response::Categories(categories) => {
                if categories.is_empty() {
                    println!("No categories yet.");
                }
                for category in categories {
                    println!("{category}");
                }
            }
            other => bail!("unexpected response to get-categories: {other:?}"),
        },
        CategoryCommand::Add { name } => {
            match bridge.invoke(Request::AddCategory { name }).await? {
                Response::CategoryAdded(Some(id)) => {
                    println!("Category added successfully! (id {id})")
                }
                Response::CategoryAdded(None) => println!("Category already exists!"),
                other => bail!("unexpected response to add-category: {other:?}"),
            }
        }
        CategoryCommand::Delete { id } => {
            match bridge.invoke(Request::DeleteCategory { id }).await? {
                Response::CategoryDeleted(true) => println!("Category deleted successfully!"),
                Response::CategoryDeleted(false) => {
                    println!("Failed to delete category: no category with id {id}.")
                }
                other => bail!("unexpected response to delete-category: {other:?}"),
            }
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bridge))]
pub async fn run_question(command: QuestionCommand, bridge: &Bridge) -> HandlerResult {
    match command {
        QuestionCommand::List => match bridge.invoke(Request::GetQuestions).await? {
            Response::Questions(questions) => {
                if questions.is_empty() {
                    println!("No questions yet.");
                }
                for question in questions {
                    print!("{question}");
                    println!("  answer: {}", question.answer);
                    if let Some(category_id) = question.category_id {
                        println!("  category: {category_id}");
                    }
                }
            }
            other => bail!("unexpected response to get-questions: {other:?}"),
        },
        QuestionCommand::Add {
            question,
            options,
            answer,
            tip,
            category,
        } => {
            let draft = validated_draft(question, options, answer, tip, category)?;
            match bridge.invoke(Request::AddQuestion { draft }).await? {
                Response::QuestionAdded(id) => {
                    println!("Question added successfully. (id {id})")
                }
                other => bail!("unexpected response to add-question: {other:?}"),
            }
        }
        QuestionCommand::Update {
            id,
            question,
            options,
            answer,
            tip,
            category,
        } => {
            let draft = validated_draft(question, options, answer, tip, category)?;
            match bridge.invoke(Request::UpdateQuestion { id, draft }).await? {
                Response::QuestionUpdated(true) => println!("Question updated successfully."),
                Response::QuestionUpdated(false) => {
                    println!("Failed to update question: no question with id {id}.")
                }
                other => bail!("unexpected response to update-question: {other:?}"),
            }
        }
        QuestionCommand::Delete { id } => {
            match bridge.invoke(Request::DeleteQuestion { id }).await? {
                Response::QuestionDeleted(true) => println!("Question deleted successfully."),
                Response::QuestionDeleted(false) => {
                    println!("Failed to delete question: no question with id {id}.")
                }
                other => bail!("unexpected response to delete-question: {other:?}"),
            }
        }
    }

    Ok(())
}

fn validated_draft(
    question: String,
    options: Vec<String>,
    answer: String,
    tip: Option<String>,
    category_id: Option<i64>,
) -> anyhow::Result<QuestionDraft> {
    if question.trim().is_empty() {
        bail!("the question prompt must not be empty");
    }
    if options.len() < 2 || options.len() > 5 {
        bail!(
            "a question needs between 2 and 5 options, got {}",
            options.len()
        );
    }
    if !options.contains(&answer) {
        bail!("the answer '{answer}' is not one of the options");
    }

    Ok(QuestionDraft::new(question, options, answer, tip, category_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn draft_with_two_to_five_options_passes() {
        for count in 2..=5usize {
            let opts: Vec<String> = (0..count).map(|i| format!("opt{i}")).collect();
            let draft =
                validated_draft("prompt".into(), opts.clone(), "opt0".into(), None, None).unwrap();
            assert_eq!(draft.options, opts);
        }
    }

    #[test]
    fn draft_rejects_too_few_or_too_many_options() {
        assert!(validated_draft(
            "prompt".into(),
            options(&["only"]),
            "only".into(),
            None,
            None
        )
        .is_err());

        let six: Vec<String> = (0..6).map(|i| format!("opt{i}")).collect();
        assert!(validated_draft("prompt".into(), six, "opt0".into(), None, None).is_err());
    }

    #[test]
    fn draft_rejects_answer_outside_options() {
        assert!(validated_draft(
            "prompt".into(),
            options(&["Paris", "Rome"]),
            "Berlin".into(),
            None,
            None
        )
        .is_err());
    }

    #[test]
    fn draft_rejects_blank_prompt() {
        assert!(
            validated_draft("   ".into(), options(&["a", "b"]), "a".into(), None, None).is_err()
        );
    }
}
