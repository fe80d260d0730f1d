//! Interactive prompt loop.

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    agent::{AgentEvent, ChatAgent, LineOutcome},
    formatter::MessageFormatter,
    transport::HttpRoomTransport,
    ui::redisplay_prompt,
};

/// Where to connect and under which name
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub name: String,
    pub server_ip: String,
    pub server_port: u16,
}

/// Run the interactive client until `/quit`, EOF or Ctrl+C.
///
/// A still-joined agent leaves the room before this returns.
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Using server {}:{} as '{}'",
        config.server_ip,
        config.server_port,
        config.name
    );

    let transport = Arc::new(HttpRoomTransport::new(&config.server_ip, config.server_port));
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<AgentEvent>();
    let mut agent = ChatAgent::new(config.name.clone(), transport, events_tx);

    print!("{}", MessageFormatter::format_welcome(agent.name()));

    // Print notifications as they arrive
    let name_for_printer = config.name.clone();
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            let formatted = match event {
                AgentEvent::Received(notification) => {
                    MessageFormatter::format_notification(&notification)
                }
                AgentEvent::StreamEnded => MessageFormatter::format_stream_ended(),
                AgentEvent::StreamFailed(reason) => {
                    MessageFormatter::format_stream_failed(&reason)
                }
            };
            print!("{}", formatted);
            redisplay_prompt(&name_for_printer);
        }
    });

    let mut input_rx = spawn_readline(config.name.clone());

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                let Some(line) = line else {
                    tracing::info!("Input closed");
                    break;
                };

                match agent.handle_line(&line).await {
                    Ok(LineOutcome::Quit) => break,
                    Ok(LineOutcome::Joined) => print!("{}", MessageFormatter::format_joined(agent.name())),
                    Ok(LineOutcome::Sent(ack)) => print!("{}", MessageFormatter::format_sent_confirmation(&ack)),
                    Ok(LineOutcome::Left(ack)) => print!("{}", MessageFormatter::format_left(&ack)),
                    Err(e) => print!("{}", MessageFormatter::format_error(&e)),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    agent.shutdown().await;
    printer.abort();
    println!("Bye!");
    Ok(())
}

/// Read prompt lines on a blocking thread and forward them to the runtime.
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline failure.
fn spawn_readline(name: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
