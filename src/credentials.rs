//! Resolving the phone number and token
//!
//! Values given on the command line or in the environment win. Anything
//! missing is asked for on the terminal: the phone number directly, the token
//! by running the SMS PIN login. Prompts and hints go to stderr so stdout
//! only carries the report.

use std::io::{self, BufRead, Write};
use tmstat_client::{AccountSession, Transport};
use tmstat_core::config::{PHONE_NUMBER_ENV, TOKEN_ENV};
use tmstat_core::error::{Result, TmstatError};
use tracing::info;

/// Line-based question/answer over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line for the user
    pub fn note(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Ask a question and return the answer without its line ending
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(TmstatError::Config(format!(
                "no answer to '{}' (input closed)",
                question.trim_end_matches([':', ' '])
            )));
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Phone number from flags or environment, otherwise asked for
///
/// Spaces typed at the prompt are removed (`07700 900 123` is accepted).
pub fn resolve_phone_number<R: BufRead, W: Write>(
    given: Option<String>,
    prompter: &mut Prompter<R, W>,
) -> Result<String> {
    if let Some(number) = given.filter(|n| !n.trim().is_empty()) {
        return Ok(number.trim().to_string());
    }

    prompter.note(&format!("No {PHONE_NUMBER_ENV} env var set"))?;
    let answer = prompter.ask("Please enter your phone number: ")?;
    let number: String = answer.chars().filter(|c| !c.is_whitespace()).collect();
    prompter.note(&format!(
        "Add {PHONE_NUMBER_ENV} to your environment for use next time"
    ))?;
    Ok(number)
}

/// Run the SMS PIN login and return the new token
pub async fn log_in<T: Transport, R: BufRead, W: Write>(
    session: &mut AccountSession<T>,
    prompter: &mut Prompter<R, W>,
) -> Result<String> {
    session.request_pin().await?;
    let pin = prompter.ask("Please enter the PIN sent via SMS: ")?;

    prompter.note("Fetching token...")?;
    session.redeem_pin(&pin).await?;
    info!("Logged in as {}", session.subscriber_number());

    session
        .token()
        .map(str::to_string)
        .ok_or(TmstatError::AuthenticationRequired)
}

/// Log in unless the session already has a token
pub async fn ensure_authenticated<T: Transport, R: BufRead, W: Write>(
    session: &mut AccountSession<T>,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    if session.is_authenticated() {
        return Ok(());
    }

    prompter.note(&format!("No {TOKEN_ENV} env var set"))?;
    let token = log_in(session, prompter).await?;
    prompter.note(&format!("Token: {token}"))?;
    prompter.note(&format!("Add {TOKEN_ENV} to your environment for use next time"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_given_number_skips_prompt() {
        let mut p = prompter("");
        let number = resolve_phone_number(Some(" 07700900123 ".to_string()), &mut p).unwrap();
        assert_eq!(number, "07700900123");
        assert!(p.into_output().is_empty());
    }

    #[test]
    fn test_prompted_number_loses_spaces() {
        let mut p = prompter("07700 900 123\n");
        let number = resolve_phone_number(None, &mut p).unwrap();
        assert_eq!(number, "07700900123");

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("No TESCO_PHONENUMBER env var set"));
        assert!(output.contains("Please enter your phone number: "));
        assert!(output.contains("Add TESCO_PHONENUMBER"));
    }

    #[test]
    fn test_blank_number_is_prompted() {
        let mut p = prompter("07700900123\r\n");
        let number = resolve_phone_number(Some("   ".to_string()), &mut p).unwrap();
        assert_eq!(number, "07700900123");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        let result = resolve_phone_number(None, &mut p);
        assert!(matches!(result, Err(TmstatError::Config(_))));
    }
}
