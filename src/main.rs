use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use netmask::{Netmask, ParseError};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process;

/// Describe IPv4 blocks given as arguments or one per line on stdin.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Opts {
    /// Blocks such as 10.1.2.0/24 or 10.1.2.0/255.255.255.0
    blocks: Vec<String>,

    /// Report whether each block contains this address or block
    #[arg(short, long)]
    contains: Option<String>,

    /// List the usable hosts of each block
    #[arg(short, long)]
    list: bool,

    /// Separator between field name and value
    #[arg(short, long, default_value = "\t")]
    sep: String,
}

/// Rejects a malformed `--contains` before any block is read.
fn check_contains(opts: &Opts) -> Result<(), ParseError> {
    if let Some(target) = &opts.contains {
        Netmask::new(0, 0)?.contains(target)?;
    }
    Ok(())
}

fn describe<W: Write>(block: &Netmask, opts: &Opts, out: &mut W) -> Result<(), Box<dyn Error>> {
    let sep = &opts.sep;
    writeln!(out, "{}", block)?;
    writeln!(out, "Base{}{}", sep, block.base())?;
    writeln!(out, "Mask{}{}", sep, block.mask())?;
    writeln!(out, "Bitmask{}{}", sep, block.bitmask())?;
    writeln!(out, "Hostmask{}{}", sep, block.hostmask())?;
    writeln!(out, "Broadcast{}{}", sep, block.broadcast())?;
    writeln!(out, "Size{}{}", sep, block.size())?;
    writeln!(out, "First{}{}", sep, block.first())?;
    writeln!(out, "Last{}{}", sep, block.last())?;
    if let Some(target) = &opts.contains {
        writeln!(out, "Contains {}{}{}", target, sep, block.contains(target)?)?;
    }
    if opts.list {
        for ip in block.hosts() {
            writeln!(out, "{}", ip)?;
        }
    }
    Ok(())
}

/// Describes every non-blank line. Returns true when some line was skipped.
fn describe_all<'a, I, W>(lines: I, opts: &Opts, out: &mut W) -> Result<bool, Box<dyn Error>>
where
    I: IntoIterator<Item = &'a str>,
    W: Write,
{
    let mut failed = false;
    for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
        match line.parse::<Netmask>() {
            Ok(block) => {
                if line != block.to_string() {
                    info!("{} normalized to {}", line, block);
                }
                describe(&block, opts, out)?;
            }
            Err(e) => {
                warn!("skipping {:?}: {}", line, e);
                failed = true;
            }
        }
    }
    Ok(failed)
}

fn main() {
    let opts = Opts::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = check_contains(&opts) {
        error!("invalid --contains {:?}: {}", opts.contains.as_deref().unwrap_or(""), e);
        process::exit(2);
    }

    let lines: Vec<String> = if opts.blocks.is_empty() {
        info!("reading blocks from stdin");
        match io::stdin().lock().lines().collect::<io::Result<Vec<String>>>() {
            Ok(lines) => lines,
            Err(e) => {
                error!("reading stdin: {}", e);
                process::exit(1);
            }
        }
    } else {
        opts.blocks.clone()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match describe_all(lines.iter().map(String::as_str), &opts, &mut out) {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
