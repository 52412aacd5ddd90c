// UI layer: terminal rendering and input prompts for the game.
// The console is generic over its reader/writer so the prompt loops can
// be exercised in tests without a tty.

use crate::api::Question;
use crossterm::style::Stylize;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::thread;
use std::time::Duration;

/// How long the "CORRECT!" message stays on screen before the next
/// question replaces it (interactive mode only).
const ROUND_PAUSE: Duration = Duration::from_millis(1500);

/// Terminal front end for one player. Owns the input and output streams
/// and every piece of wording the player sees.
pub struct Console<R, W> {
    input: R,
    output: W,
    animate: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console bound to the process terminal, with screen clearing and
    /// the short pause after a correct answer enabled.
    pub fn stdio() -> Self {
        Console {
            input: io::stdin().lock(),
            output: io::stdout(),
            animate: true,
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Console over arbitrary streams. No clearing, no pauses; this is
    /// the constructor tests use.
    pub fn new(input: R, output: W) -> Self {
        Console {
            input,
            output,
            animate: false,
        }
    }

    /// Read one line, `None` on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        if self.animate {
            write!(self.output, "\x1b[2J\x1b[H")?;
        }
        Ok(())
    }

    fn banner(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", format!("  {text}  ").bold().white().on_blue())?;
        writeln!(self.output)
    }

    /// Ask for an answer until the operator supplies a valid one: a
    /// 0-based index, or a single letter where `a` is the first option.
    /// Loops forever on bad input; only end-of-input breaks it.
    pub fn prompt_answer(&mut self, option_count: usize) -> io::Result<usize> {
        let last = option_count.saturating_sub(1);
        loop {
            write!(self.output, "Your answer (0-{last}): ")?;
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input closed while waiting for an answer",
                    ))
                }
            };
            if let Some(index) = parse_answer_choice(&line, option_count) {
                return Ok(index);
            }
            writeln!(
                self.output,
                "{}",
                format!("Invalid input. Please enter a number from 0 to {last} or a letter.").red()
            )?;
        }
    }

    /// y/n replay prompt. Anything not starting with `y` declines, as
    /// does end of input.
    pub fn prompt_replay(&mut self) -> io::Result<bool> {
        writeln!(self.output)?;
        write!(self.output, "Play again? (y/n): ")?;
        self.output.flush()?;
        match self.read_line()? {
            Some(line) => Ok(line.trim().to_ascii_lowercase().starts_with('y')),
            None => Ok(false),
        }
    }

    pub fn render_welcome(&mut self) -> io::Result<()> {
        self.clear_screen()?;
        self.banner("TRIVIA QUIZ - CLI EDITION")?;
        writeln!(self.output, "Connecting to server...")?;
        writeln!(self.output)
    }

    pub fn render_question(&mut self, question: &Question, score: i64) -> io::Result<()> {
        self.clear_screen()?;
        self.banner(&format!("Level {}  |  Score {}", question.level, score))?;
        writeln!(self.output, "{}", question.text.clone().bold())?;
        writeln!(self.output)?;
        for (index, answer) in question.answers.iter().enumerate() {
            writeln!(self.output, "{} {}", format!("[{index}]").yellow(), answer)?;
        }
        writeln!(self.output)
    }

    pub fn render_correct(&mut self, score: i64) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "CORRECT!".green())?;
        writeln!(self.output, "Score: {score}")?;
        if self.animate {
            thread::sleep(ROUND_PAUSE);
        }
        Ok(())
    }

    pub fn render_game_over(&mut self, score: i64) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "WRONG ANSWER!".red().bold())?;
        writeln!(self.output, "Game Over. Final Score: {score}")
    }

    pub fn render_win(&mut self, score: i64) -> io::Result<()> {
        self.clear_screen()?;
        self.banner("WINNER!")?;
        writeln!(
            self.output,
            "{}",
            format!("Congratulations! You won with score: {score}").green().bold()
        )
    }

    pub fn render_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    pub fn render_goodbye(&mut self) -> io::Result<()> {
        writeln!(self.output, "Thanks for playing!")
    }
}

/// Parse one line of operator input against the number of options shown.
/// Accepts a 0-based index (`"2"`) or a single letter (`"c"`, case
/// insensitive). Anything else, including out-of-range values, is `None`.
pub fn parse_answer_choice(input: &str, option_count: usize) -> Option<usize> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<usize>() {
        return (n < option_count).then_some(n);
    }
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let letter = first.to_ascii_lowercase();
    if letter.is_ascii_lowercase() {
        let index = (letter as u8 - b'a') as usize;
        return (index < option_count).then_some(index);
    }
    None
}
