use reckon::{
    format_number, format_tokens, parse, tokenize, DivisionByZero, Error, Interpreter,
};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: reckon [OPTIONS] [EXPRESSION...]

Evaluates an arithmetic expression, or starts an interactive session when no
expression is given. Supported operators: + - * / ^ ( )

Options:
  --tokens           print the token stream before evaluating
  --ast              print the syntax tree before evaluating
  --legacy-division  treat division by zero as 0 instead of an error
  -h, --help         print this help";

#[derive(Default)]
struct Options {
    show_tokens: bool,
    show_tree: bool,
    division: DivisionByZero,
    expression: Vec<String>,
}

enum Command {
    Run(Options),
    Help,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--tokens" => options.show_tokens = true,
            "--ast" => options.show_tree = true,
            "--legacy-division" => options.division = DivisionByZero::Substitute,
            // Leave "-3" and friends alone: they are expressions, not flags.
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            _ => options.expression.push(arg),
        }
    }
    Ok(Command::Run(options))
}

fn main() -> ExitCode {
    env_logger::init();
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("Error: {msg}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if options.expression.is_empty() {
        return match run_repl(&options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let input = options.expression.join(" ");
    match run_line(&input, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run_line(input: &str, options: &Options) -> Result<(), Error> {
    if options.show_tokens {
        println!("Tokens: {}", format_tokens(&tokenize(input)));
    }
    let tree = parse(input)?;
    if options.show_tree {
        print!("{}", tree.tree());
    }
    let mut interpreter = Interpreter::new(options.division);
    let value = interpreter.evaluate(&tree)?;
    for diagnostic in interpreter.diagnostics() {
        eprintln!("Warning: {diagnostic}");
    }
    println!("{}", format_number(value));
    Ok(())
}

fn report(err: &Error) {
    if let Error::Parse(parse_error) = err {
        for lexical in parse_error.lexical.iter() {
            eprintln!("{lexical}");
        }
    }
    eprintln!("{err}");
}

fn run_repl(options: &Options) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Enter arithmetic expressions ('quit' to exit).");
    loop {
        let readline = rl.readline("calc> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" || line == "exit" {
                    break;
                }
                rl.add_history_entry(line)?;
                if let Err(err) = run_line(line, options) {
                    report(&err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
