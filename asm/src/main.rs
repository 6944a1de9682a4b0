use color_print::cprintln;
use lc3as::Error;
use std::fs;
use std::io::{self, Write};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input assembly file
    input: String,

    /// Output file (stdout if omitted)
    #[clap(short, long)]
    output: Option<String>,

    /// Print all tokens and stop
    #[clap(short, long)]
    tokens: bool,

    /// Print all parsed instructions and stop
    #[clap(short = 'I', long)]
    instructions: bool,
}

fn run(args: &Args) -> Result<(), Error> {
    let source = fs::read_to_string(&args.input)
        .map_err(|err| Error::FileOpen(args.input.clone(), err))?;

    let (mut out, target): (Box<dyn Write>, String) = match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .map_err(|err| Error::FileCreate(path.clone(), err))?;
            (Box::new(file), path.clone())
        }
        None => (Box::new(io::stdout()), "stdout".to_string()),
    };
    let emit = |out: &mut Box<dyn Write>, line: String| {
        writeln!(out, "{line}").map_err(|err| Error::FileWrite(target.clone(), err))
    };

    if args.tokens {
        for token in lc3as::tokenize(&source) {
            emit(&mut out, token.to_string())?;
        }
        return Ok(());
    }

    let instructions = lc3as::parse(&source)?;

    if args.instructions {
        for instr in &instructions {
            emit(&mut out, instr.to_string())?;
        }
        return Ok(());
    }

    let (origin, words) = lc3as::assemble(instructions)?;
    for (idx, word) in words.iter().enumerate() {
        let address = origin.wrapping_add(idx as u16);
        emit(&mut out, format!("({address:X}) {word:016b}"))?;
    }
    Ok(())
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    if let Err(err) = run(&args) {
        cprintln!("<red,bold>error</>: {}", err);
        std::process::exit(1);
    }
}
