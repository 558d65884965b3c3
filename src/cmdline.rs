use crate::interpreter::Interpreter;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::path::PathBuf;

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("minischeme")?;
    interface.set_prompt("> ")?;
    if let Some(path) = history_path() {
        // A missing or unreadable history file is not worth reporting.
        interface.load_history(path).ok();
    }
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    let mut path = dirs::data_dir()?;
    path.push("minischeme");
    path.push("history");
    Some(path)
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    let path = match history_path() {
        Some(path) => path,
        None => return Ok(()),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    interface.save_history(path)
}

/// One line in, one line out. Errors are printed with their kind prefix and
/// the session carries on.
pub fn repl<T: Terminal>(interface: &Interface<T>, interpreter: &Interpreter) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                match interpreter.run(&line) {
                    Ok(output) => writeln!(interface, "{}", output).ok(),
                    Err(e) => writeln!(interface, "{}", e).ok(),
                };
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}
