use std::io::{self, BufRead, Write};
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

mod local_relay;
use local_relay::LocalRelay;

fn main() {
    let (command_tx, command_rx) = channel::<String>();
    let (response_tx, response_rx) = channel::<String>();

    // Relay thread: owns the room registry and every game in it.
    let relay = thread::spawn(move || {
        let mut relay = LocalRelay::new(command_rx, response_tx);
        while relay.tick() {}
    });

    let printer = thread::spawn(move || {
        for response in response_rx {
            println!("{}", response);
            io::stdout().flush().ok();
        }
    });

    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    let mut input = String::new();

    loop {
        input.clear();
        match stdin_lock.read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let trimmed = input.trim_end().to_string();
                if trimmed == "quit" {
                    break;
                }
                if !trimmed.is_empty() && command_tx.send(trimmed).is_err() {
                    break;
                }
            }
        }

        // Give the relay a moment so replies stay next to their command.
        thread::sleep(Duration::from_millis(10));
    }

    drop(command_tx);
    relay.join().ok();
    printer.join().ok();
}
