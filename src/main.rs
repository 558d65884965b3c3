use minischeme::cmdline;
use minischeme::interpreter::Interpreter;

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    let interface = cmdline::setup()?;
    let interpreter = Interpreter::new();
    cmdline::repl(&interface, &interpreter);
    cmdline::save_history(&interface)
}
