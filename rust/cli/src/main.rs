use std::io;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut out = io::stdout();
    let mut err = io::stderr();
    let code = handscope_cli::run(args, &mut out, &mut err);
    std::process::exit(code);
}
