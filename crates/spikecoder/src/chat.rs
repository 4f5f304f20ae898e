use crate::generate::{
    create_service, format_result_text, spinner, GenerationService, ModelBackend,
};
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use spikecoder_core::generation::GenerationResult;
use spikecoder_core::session::{Session, SessionError};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, clap::Args)]
pub struct ChatOptions {}

/// What the REPL should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Help,
    ShowCode,
    Suggest,
    Submit(&'a str),
    Skip,
}

fn parse_line(line: &str) -> Command<'_> {
    match line.trim() {
        "" => Command::Skip,
        "/quit" | "/exit" => Command::Quit,
        "/help" => Command::Help,
        "/code" => Command::ShowCode,
        "/suggest" => Command::Suggest,
        text => Command::Submit(text),
    }
}

pub async fn run(_options: ChatOptions, global: crate::Global) -> Result<()> {
    let service = create_service(&global)?;
    let mut session = Session::new();

    print_turn_text(&session);
    if let Some(task) = session.suggested_task() {
        println!(
            "{} {}",
            "Suggested task (/suggest):".yellow().bold(),
            task.yellow()
        );
    }
    println!("{}", "Type /help for commands.".dimmed());

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        anstream::print!("{} ", ">".bright_cyan().bold());
        std::io::stdout().flush()?;

        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let instruction = match parse_line(&line) {
            Command::Skip => continue,
            Command::Quit => break,
            Command::Help => {
                print_help();
                continue;
            }
            Command::ShowCode => {
                if session.current_code().is_empty() {
                    println!("{}", "No code generated yet.".yellow());
                } else {
                    println!("{}", session.current_code());
                }
                continue;
            }
            Command::Suggest => match session.suggested_task() {
                Some(task) => task.to_string(),
                None => {
                    println!(
                        "{}",
                        "The suggestion is only offered before your first request.".yellow()
                    );
                    continue;
                }
            },
            Command::Submit(text) => text.to_string(),
        };

        match submit(&service, &mut session, &instruction).await {
            Ok(Some(result)) => println!("{}", format_result_text(&result)),
            Ok(None) => {
                eprintln!("{}", crate::generate::FAILURE_NOTICE.red());
                print_turn_text(&session);
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    Ok(())
}

/// Run one submission through the session and the service.
///
/// `Ok(None)` means the call failed and the session recorded the failure.
async fn submit<B: ModelBackend>(
    service: &GenerationService<B>,
    session: &mut Session,
    instruction: &str,
) -> std::result::Result<Option<GenerationResult>, SessionError> {
    let request = session.begin(instruction)?;

    let progress = spinner();
    let outcome = service.generate(request).await;
    progress.finish_and_clear();

    match outcome {
        Ok(result) => {
            session.complete(result.clone());
            Ok(Some(result))
        }
        Err(e) => {
            log::warn!("Chat generation failed: {e}");
            session.fail();
            Ok(None)
        }
    }
}

fn print_turn_text(session: &Session) {
    if let Some(turn) = session.turns().last() {
        println!("{}", turn.text.bright_white());
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /code     Show the current script");
    println!("  /suggest  Send the suggested starter task");
    println!("  /help     Show this help");
    println!("  /quit     Exit");
    println!("Anything else is sent as a request.");
}
