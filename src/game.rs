// Game loop: drives start -> question -> answer rounds against the API
// and renders progress. Every server failure ends the current game on
// the spot; nothing is retried.

use crate::api::{AnswerOutcome, ApiClient, QuestionRound};
use crate::ui::Console;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};

/// How one play-through ended.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Won { score: i64 },
    Lost { score: i64 },
    Fault,
}

/// Outer loop: one game per iteration with a replay prompt in between.
///
/// Returns an error only when starting a game fails; that is the one
/// failure the process treats as fatal (the operator retries by
/// relaunching). Declining the replay prompt returns `Ok`.
pub fn play<R: BufRead, W: Write>(api: &mut ApiClient, console: &mut Console<R, W>) -> Result<()> {
    loop {
        console.render_welcome()?;
        let started = api.start().context("failed to start a game")?;
        debug!("server says: {}", started.status);

        let end = run_session(api, console)?;
        info!("session ended: {end:?}");

        if !console.prompt_replay()? {
            console.render_goodbye()?;
            return Ok(());
        }
    }
}

/// One full game: question/answer rounds until a terminal condition.
/// Server failures are rendered and reported as [`SessionEnd::Fault`];
/// the `Err` arm is terminal I/O only.
pub fn run_session<R: BufRead, W: Write>(
    api: &mut ApiClient,
    console: &mut Console<R, W>,
) -> io::Result<SessionEnd> {
    let mut score = 0;
    loop {
        let round = match api.question() {
            Ok(round) => round,
            Err(err) => {
                warn!("question fetch failed: {err}");
                console.render_error(&format!("Error: {err}"))?;
                return Ok(SessionEnd::Fault);
            }
        };

        let question = match round {
            QuestionRound::Win { score } => {
                console.render_win(score)?;
                return Ok(SessionEnd::Won { score });
            }
            QuestionRound::Ask(question) => question,
        };

        console.render_question(&question, score)?;
        let index = console.prompt_answer(question.answers.len())?;

        match api.answer(index) {
            Ok(AnswerOutcome::Correct {
                score: new_score, ..
            }) => {
                score = new_score;
                console.render_correct(new_score)?;
            }
            Ok(AnswerOutcome::GameOver { score }) => {
                console.render_game_over(score)?;
                return Ok(SessionEnd::Lost { score });
            }
            Err(err) => {
                warn!("answer submission failed: {err}");
                console.render_error(&format!("Error submitting answer: {err}"))?;
                return Ok(SessionEnd::Fault);
            }
        }
    }
}
