use anyhow::{anyhow, Result};
use css3_render::{RenderConfig, RenderError, Token, TokenSerializer};
use simple_logger::SimpleLogger;
use std::fs;
use std::io::{self, Read, Write};

fn main() -> Result<()> {
    let matches = clap::Command::new("Gosub CSS3 token renderer")
        .version("0.1.0")
        .arg(
            clap::Arg::new("file")
                .help("JSON file with the tokens to render, or - for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("debug")
                .help("Enable debug logging")
                .short('d')
                .long("debug")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-comments")
                .help("Don't insert comments between tokens that would merge")
                .long("no-comments")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("stop-on-error")
                .help("Stop at the first error token")
                .long("stop-on-error")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("tokens")
                .help("Just print the tokens")
                .long("tokens")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("debug") {
        SimpleLogger::new().init()?;
    }

    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow!("no token file given"))?;

    let json = if file == "-" {
        let mut json = String::new();
        io::stdin().read_to_string(&mut json)?;
        json
    } else {
        fs::read_to_string(file)?
    };

    let tokens: Vec<Token> = serde_json::from_str(&json)?;
    log::debug!("read {} tokens from {}", tokens.len(), file);

    if matches.get_flag("tokens") {
        print_tokens(&tokens);
        return Ok(());
    }

    let config = RenderConfig {
        insert_comments: !matches.get_flag("no-comments"),
        stop_on_error: matches.get_flag("stop-on-error"),
    };

    let mut stdout = io::stdout().lock();
    let result = TokenSerializer::new(config).write_all(&mut stdout, &tokens);
    stdout.flush()?;

    match result {
        Ok(n) => {
            log::debug!("wrote {} bytes", n);
            Ok(())
        }
        Err(RenderError::StopToken { token_type, message }) => {
            eprintln!();
            Err(anyhow!("stopped at {token_type} token: {message}"))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_tokens(tokens: &[Token]) {
    for token in tokens {
        match token.extra() {
            Some(extra) => println!("{:<15} {:?} ({})", token.token_type().to_string(), token.value, extra),
            None => println!("{:<15} {:?}", token.token_type().to_string(), token.value),
        }
    }
}
