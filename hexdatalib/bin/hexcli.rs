use clap::{Parser, Subcommand, ValueEnum};
use hexdatalib::{
    Architecture, ChecksumAlgorithm, CompareReport, EntropyReport, HexData, SearchType,
    parse_hex_pattern, search_all,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(
    name = "hexcli",
    version,
    about = "Hex dump utility",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show size, line count and entropy of a file
    Info { input: PathBuf },
    /// Print the hex dump of a file
    Dump {
        input: PathBuf,
        /// Bytes per line (8..=48)
        #[arg(short, long, default_value_t = 16)]
        width: usize,
        /// First offset to print (hex, optional 0x prefix)
        #[arg(long, value_parser = parse_hex_str)]
        start: Option<usize>,
        /// Number of lines to print
        #[arg(short = 'n', long)]
        lines: Option<usize>,
        /// Add x86 disassembly annotations
        #[arg(short, long)]
        disasm: Option<Arch>,
    },
    /// Find all occurrences of a pattern
    Find {
        input: PathBuf,
        pattern: String,
        #[arg(short, long, value_enum, default_value_t = Mode::Hex)]
        mode: Mode,
    },
    /// Print digests of a file
    Hash {
        input: PathBuf,
        /// Digest to compare against
        #[arg(long)]
        expect: Option<String>,
    },
    /// Compare two files byte by byte
    Compare { left: PathBuf, right: PathBuf },
    /// Print the entropy per block
    Entropy {
        input: PathBuf,
        #[arg(short, long, default_value_t = 256)]
        block: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Hex,
    Ascii,
    Regex,
}

#[derive(Clone, Copy, ValueEnum)]
enum Arch {
    X16,
    X32,
    X64,
}

impl From<Arch> for Architecture {
    fn from(arch: Arch) -> Self {
        match arch {
            Arch::X16 => Self::X86_16,
            Arch::X32 => Self::X86_32,
            Arch::X64 => Self::X86_64,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run_dispatch(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(cmd: Command) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Info { input } => run_info(&validate_exists(&input)?),
        Command::Dump {
            input,
            width,
            start,
            lines,
            disasm,
        } => run_dump(&validate_exists(&input)?, width, start, lines, disasm),
        Command::Find {
            input,
            pattern,
            mode,
        } => run_find(&validate_exists(&input)?, &pattern, mode),
        Command::Hash { input, expect } => run_hash(&validate_exists(&input)?, expect.as_deref()),
        Command::Compare { left, right } => {
            run_compare(&validate_exists(&left)?, &validate_exists(&right)?)
        }
        Command::Entropy { input, block } => run_entropy(&validate_exists(&input)?, block),
    }
}

fn load(path: &Path) -> Result<HexData, Box<dyn std::error::Error>> {
    let mut hd = HexData::new();
    hd.load_file(path)?;
    Ok(hd)
}

fn run_info(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let hd = load(path)?;
    let entropy = EntropyReport::new(hd.data(), 0);

    println!("File Path:   {}", path.display());
    println!("Data Size:   {} bytes", format_with_commas(hd.file_size()));
    println!("Lines:       {} at 16 bytes per line", hd.row_count());
    println!("Entropy:     {:.4} bits/byte", entropy.overall);
    Ok(())
}

fn run_dump(
    path: &PathBuf,
    width: usize,
    start: Option<usize>,
    lines: Option<usize>,
    disasm: Option<Arch>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut hd = load(path)?;
    hd.set_bytes_per_line(width);
    if let Some(arch) = disasm {
        hd.set_architecture(arch.into());
        if !hd.has_decoder() {
            return Err("Disassembly is not available in this build".into());
        }
        hd.set_disassembly(true);
    }

    let first = start.unwrap_or(0) / hd.bytes_per_line();
    let count = lines.unwrap_or(usize::MAX);

    if !hd.header_line().is_empty() {
        println!("{}", hd.header_line());
    }

    let annotations = hd.disassembly_lines();
    for (row, line) in hd.hex_lines().iter().enumerate().skip(first).take(count) {
        match annotations.get(row) {
            Some(text) if !text.is_empty() => println!("{line}{text}"),
            _ => println!("{}", line.trim_end()),
        }
    }
    Ok(())
}

fn run_find(path: &PathBuf, pattern: &str, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let hd = load(path)?;

    let search_type = match mode {
        Mode::Hex => {
            let bytes = parse_hex_pattern(pattern);
            if bytes.is_empty() {
                return Err(format!("Invalid hex pattern: {pattern}").into());
            }
            SearchType::Hex(bytes)
        }
        Mode::Ascii => SearchType::Ascii(pattern.to_string()),
        Mode::Regex => SearchType::Regex(pattern.to_string()),
    };

    let matches = search_all(hd.data(), &search_type);
    for offset in &matches {
        println!("{}", format_addr(*offset));
    }
    println!("{} match(es)", matches.len());
    Ok(())
}

fn run_hash(path: &PathBuf, expect: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let hd = load(path)?;

    let mut matched = None;
    for algo in ChecksumAlgorithm::ALL {
        let digest = algo.digest(hd.data());
        println!("{:<8} {digest}", algo.label());
        if expect.is_some_and(|e| digest.eq_ignore_ascii_case(e.trim())) {
            matched = Some(algo);
        }
    }

    match (expect, matched) {
        (Some(_), Some(algo)) => println!("Match: {}", algo.label()),
        (Some(e), None) => return Err(format!("No digest matches {e}").into()),
        (None, _) => {}
    }
    Ok(())
}

fn run_compare(left: &PathBuf, right: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let l = load(left)?;
    let r = load(right)?;
    let report = CompareReport::new(l.data(), r.data());

    println!("Left:        {} ({} bytes)", left.display(), report.left_size);
    println!("Right:       {} ({} bytes)", right.display(), report.right_size);

    if report.is_identical() {
        println!("Files are identical");
        return Ok(());
    }

    println!("Differences: {} bytes", format_with_commas(report.differences));
    for range in &report.ranges {
        println!("  {} - {}", format_addr(*range.start()), format_addr(*range.end()));
    }
    if report.truncated {
        println!("  ...");
    }
    Ok(())
}

fn run_entropy(path: &PathBuf, block: usize) -> Result<(), Box<dyn std::error::Error>> {
    let hd = load(path)?;
    let report = EntropyReport::new(hd.data(), block);

    println!("Overall:     {:.4} bits/byte", report.overall);
    for (i, value) in report.blocks.iter().enumerate() {
        println!("  {}  {value:.4}", format_addr(i * report.block_size));
    }
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Parse a string as a hex number (with optional 0x prefix)
fn parse_hex_str(s: &str) -> Result<usize, std::num::ParseIntError> {
    let s = s.trim();

    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return usize::from_str_radix(hex_str, 16);
    }

    usize::from_str_radix(s, 16)
}

fn format_addr(addr: usize) -> String {
    let s = format!("{addr:08X}");
    format!("0x{}_{}", &s[..s.len() - 4], &s[s.len() - 4..])
}

fn format_with_commas(n: usize) -> String {
    let s = n.to_string();
    s.as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

/// Validate that a path exists and is a file. Returns absolute path.
fn validate_exists(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()).into());
    }
    Ok(std::fs::canonicalize(path)?)
}
