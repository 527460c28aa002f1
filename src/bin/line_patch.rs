use clap::{App, Arg};

use text_patch::{patch_file, Pattern, Substitution};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let matches = App::new("Line Patch")
        .version(VERSION)
        .about("Replaces the first match of a pattern in a text file, in place")
        .arg(
            Arg::with_name("FILE")
                .help("file to patch")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("PATTERN")
                .help("text to search for")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("REPLACEMENT")
                .help("replacement text")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::with_name("regex")
                .short("r")
                .long("regex")
                .help("treat the pattern as a regular expression"),
        )
        .arg(
            Arg::with_name("count")
                .short("n")
                .long("count")
                .value_name("N")
                .help("maximum number of occurrences to replace (default 1)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ceiling")
                .short("c")
                .long("ceiling")
                .value_name("LINES")
                .help("only consider the first LINES lines (default: the whole file)")
                .takes_value(true),
        )
        .get_matches();

    let file = matches.value_of("FILE").unwrap();
    let pattern_text = matches.value_of("PATTERN").unwrap();
    let replacement = matches.value_of("REPLACEMENT").unwrap();

    let pattern = if matches.is_present("regex") {
        match Pattern::regex(pattern_text) {
            Ok(pattern) => pattern,
            Err(e) => {
                eprintln!("Invalid pattern: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Pattern::literal(pattern_text)
    };

    let max_substitutions = match matches.value_of("count").map(|v| v.parse()) {
        None => 1,
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("--count takes a number.");
            std::process::exit(1);
        }
    };
    let line_ceiling = match matches.value_of("ceiling").map(|v| v.parse()) {
        None => usize::MAX,
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("--ceiling takes a number.");
            std::process::exit(1);
        }
    };

    let substitution = Substitution {
        pattern,
        replacement: replacement.into(),
        line_ceiling,
        max_substitutions,
    };

    match patch_file(file, &substitution) {
        Ok(count) => println!("{}: {} replacement(s)", file, count),
        Err(e) => {
            eprintln!("{}: {}", file, e);
            std::process::exit(1);
        }
    }
}
