// Management menu for the question bank, using `dialoguer`.
// The functions are small and synchronous; each one performs a single
// API call and prints the result. No session state is involved here.

use crate::api::{ApiClient, NewQuestion, QuestionRecord, QuestionUpdate};
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive menu. Receives an `ApiClient` instance and runs a
/// simple select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu(mut api: ApiClient) -> Result<()> {
    loop {
        let items = vec![
            "List questions",
            "Add question",
            "Update question",
            "Delete question",
            "Search questions",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_list(&mut api)?,
            1 => handle_add(&mut api)?,
            2 => handle_update(&mut api)?,
            3 => handle_delete(&mut api)?,
            4 => handle_search(&mut api)?,
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Spinner shown while a request is in flight.
fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_records(records: &[QuestionRecord]) {
    println!("Total questions: {}", records.len());
    for record in records {
        println!(
            "[{}] level {} | {}",
            record.id,
            record.level,
            truncate(&record.text, 60)
        );
    }
}

fn handle_list(api: &mut ApiClient) -> Result<()> {
    let pb = spinner("Fetching questions...");
    let result = api.list_questions();
    pb.finish_and_clear();
    match result {
        Ok(records) => print_records(&records),
        Err(e) => println!("Listing failed: {}", e),
    }
    Ok(())
}

/// Collect the fields for a new question and create it.
fn handle_add(api: &mut ApiClient) -> Result<()> {
    let level: i64 = Input::new().with_prompt("Level (1-15)").interact_text()?;
    let text: String = Input::new().with_prompt("Question text").interact_text()?;
    let correct_answer: String = Input::new().with_prompt("Correct answer").interact_text()?;
    let mut wrong_answers = Vec::new();
    for i in 1..=3 {
        let wrong: String = Input::new()
            .with_prompt(format!("Wrong answer {i}"))
            .interact_text()?;
        wrong_answers.push(wrong);
    }
    let info: String = Input::new()
        .with_prompt("Background info")
        .allow_empty(true)
        .interact_text()?;

    let question = NewQuestion {
        level,
        text,
        correct_answer,
        wrong_answers,
        info,
    };

    let pb = spinner("Creating question...");
    let result = api.create_question(&question);
    pb.finish_and_clear();
    match result {
        Ok(record) => println!("Created question {}: {}", record.id, record.text),
        Err(e) => println!("Create failed: {}", e),
    }
    Ok(())
}

fn handle_update(api: &mut ApiClient) -> Result<()> {
    let id: i64 = Input::new().with_prompt("Question ID").interact_text()?;
    let pb = spinner("Fetching question...");
    let current = api.get_question(id);
    pb.finish_and_clear();
    match current {
        Ok(record) => println!("Current text: {}", record.text),
        Err(e) => {
            println!("Lookup failed: {}", e);
            return Ok(());
        }
    }
    let text: String = Input::new()
        .with_prompt("New text (leave empty to skip)")
        .allow_empty(true)
        .interact_text()?;
    if text.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }

    let update = QuestionUpdate {
        text: Some(text),
        ..QuestionUpdate::default()
    };
    let pb = spinner("Updating question...");
    let result = api.update_question(id, &update);
    pb.finish_and_clear();
    match result {
        Ok(record) => println!("Updated question {}: {}", record.id, record.text),
        Err(e) => println!("Update failed: {}", e),
    }
    Ok(())
}

fn handle_delete(api: &mut ApiClient) -> Result<()> {
    let id: i64 = Input::new().with_prompt("Question ID").interact_text()?;
    if !Confirm::new()
        .with_prompt(format!("Delete question {id}?"))
        .interact()?
    {
        return Ok(());
    }
    let pb = spinner("Deleting question...");
    let result = api.delete_question(id);
    pb.finish_and_clear();
    match result {
        Ok(message) => println!("{}", message),
        Err(e) => println!("Delete failed: {}", e),
    }
    Ok(())
}

fn handle_search(api: &mut ApiClient) -> Result<()> {
    let query: String = Input::new().with_prompt("Search for").interact_text()?;
    let pb = spinner("Searching...");
    let result = api.search_questions(&query);
    pb.finish_and_clear();
    match result {
        Ok(records) => print_records(&records),
        Err(e) => println!("Search failed: {}", e),
    }
    Ok(())
}

/// Shorten long question text for one-line listings.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 60), "short");
    }

    #[test]
    fn truncate_cuts_on_char_boundaries() {
        assert_eq!(truncate("ääääää", 3), "äää...");
    }
}
