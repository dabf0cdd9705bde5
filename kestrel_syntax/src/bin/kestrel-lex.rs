use std::env;
use std::cell::RefCell;
use std::rc::Rc;
use std::path::Path;
use kestrel_env::{Source, SourceFile};
use kestrel_diag::ConsoleReport;

fn lex_and_dump(path: &str) -> Result<(), String> {
    let mut source = Source::new();
    let file = SourceFile::from_file(Path::new(path)).map_err(|e| e.to_string())?;
    let filespan = source.add(file);
    let source = Rc::new(RefCell::new(source));
    let report = ConsoleReport::new(source.clone());
    if let Ok(tokens) = kestrel_syntax::lex_chunk(&source.borrow(), filespan, &report) {
        for tok in &tokens {
            println!("{:?}{:#?}", tok.base, tok.span);
        }
    }
    Ok(())
}

pub fn main() {
    env_logger::init();
    for path in env::args().skip(1) {
        println!("--== {} ==--", path);
        if let Err(e) = lex_and_dump(&path) {
            println!("error: {}", e);
        }
        println!();
    }
}
