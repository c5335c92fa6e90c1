use quadasm::error::Error;
use quadasm::msg::Msgs;
use quadasm::{assemble, macros, output, util};

use color_print::cprintln;

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
    /// Source file stems (`prog` reads `prog.as`)
    #[clap(required = true)]
    input: Vec<String>,

    /// Dump symbol table and images after assembly
    #[clap(short, long)]
    dump: bool,

    /// Read `<stem>.am` directly, skipping macro expansion
    #[clap(long)]
    no_macro: bool,
}

fn read(path: &str) -> Result<String, Error> {
    let bytes = std::fs::read(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    String::from_utf8(bytes).map_err(|e| {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, e);
        Error::FileRead(path.to_string(), io)
    })
}

/// Assembles one stem. Returns false if anything failed.
fn process(stem: &str, args: &Args) -> bool {
    let as_path = format!("{stem}.as");
    let am_path = format!("{stem}.am");
    output::clean(stem);

    let src = if args.no_macro {
        println!("1. Read Expanded Source");
        println!("  < {}", am_path);
        let mut msgs = Msgs::new(&am_path);
        match read(&am_path) {
            Ok(src) => src,
            Err(err) => {
                msgs.error(err);
                msgs.flush();
                return false;
            }
        }
    } else {
        println!("1. Expand Macros");
        println!("  < {}", as_path);
        let mut msgs = Msgs::new(&as_path);
        let raw = match read(&as_path) {
            Ok(raw) => raw,
            Err(err) => {
                msgs.error(err);
                msgs.flush();
                return false;
            }
        };
        let expanded = macros::expand(&raw, &mut msgs);
        msgs.flush();
        let expanded = match expanded {
            Some(text) => text,
            None => return false,
        };
        println!("  > {}", am_path);
        if let Err(err) = output::write_file(&am_path, &expanded) {
            msgs.error(err);
            msgs.flush();
            return false;
        }
        expanded
    };

    println!("2. First Pass & Second Pass");
    let mut msgs = Msgs::new(&am_path);
    let prog = assemble(&src, &mut msgs);
    msgs.flush();
    let prog = match prog {
        Some(prog) => prog,
        None => return false,
    };

    println!("3. Write Output");
    let out = match output::render(&prog) {
        Ok(out) => out,
        Err(err) => {
            msgs.error(err);
            msgs.flush();
            return false;
        }
    };
    match output::write(stem, &out) {
        Ok(paths) => {
            for path in paths {
                println!("  > {}", path);
            }
        }
        Err(err) => {
            msgs.error(err);
            msgs.flush();
            return false;
        }
    }

    if args.dump {
        util::print_dump(&prog, &src);
    }
    if msgs.warn_count() > 0 {
        cprintln!("<yellow,bold>{} warning(s)</>", msgs.warn_count());
    }
    true
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Quad Assembler");

    let mut failed = 0;
    for stem in &args.input {
        cprintln!("<bold>[{}]</>", stem);
        if !process(stem, &args) {
            failed += 1;
            cprintln!("<r,s>Failed</>: {}", stem);
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
