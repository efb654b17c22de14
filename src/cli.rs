// Command-line front end for lzgreedy.
//
// Subcommands parse a file into operations, verify that a parse replays
// to the input, or print the build configuration.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::engine::{self, ParseOptions};
use crate::hash::config::{
    self, DEFAULT_BUFFER_SIZE, DEFAULT_DICT_SIZE, DictConfig, MAX_BUFFER_SIZE, MAX_DICT_SIZE,
    PREFIX_LEN, SHORT_DISTANCES,
};
use crate::ops::{MAX_MATCH_LEN, MIN_MATCH_LEN, Operation};
use crate::stream::{OpStream, ParseStats};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const DEFAULT_LEVEL: u32 = 6;

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M, G suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<u64, String> {
    let text = s.trim();
    let (digits, shift) = if let Some(n) = text.strip_suffix(['k', 'K']) {
        (n, 10)
    } else if let Some(n) = text.strip_suffix(['m', 'M']) {
        (n, 20)
    } else if let Some(n) = text.strip_suffix(['g', 'G']) {
        (n, 30)
    } else {
        (text, 0)
    };
    if digits.trim().is_empty() {
        return Err(format!("missing number in size '{s}'"));
    }
    let n: u64 = digits
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    n.checked_mul(1u64 << shift)
        .ok_or_else(|| format!("size '{s}' does not fit in 64 bits"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Greedy LZ77 parser.
#[derive(Parser, Debug)]
#[command(
    name = "lzgreedy",
    version,
    about = "Greedy LZ77 match finder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse an input stream and print one operation per line.
    Parse(ParseArgs),
    /// Parse an input, replay the operations and compare with the input.
    Verify(VerifyArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct TuningArgs {
    /// Compression level (0-9).
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(0..=9), default_value_t = DEFAULT_LEVEL)]
    level: u32,

    /// Window size override (supports K/M/G suffix).
    #[arg(long = "dict-size", value_parser = parse_byte_size)]
    dict_size: Option<u64>,

    /// Lookahead buffer size override (supports K/M/G suffix).
    #[arg(long = "buffer-size", value_parser = parse_byte_size)]
    buffer_size: Option<u64>,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Parse only, print stats instead of operations.
    #[arg(long = "check-only")]
    no_output: bool,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Parse,
    Verify,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    level: u32,
    dict_size: Option<u64>,
    buffer_size: Option<u64>,
    no_output: bool,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let base = Options {
        command: Command::Config,
        use_stdout: false,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        level: DEFAULT_LEVEL,
        dict_size: None,
        buffer_size: None,
        no_output: false,
        input_file: None,
        output_file: None,
        json_output: cli.json_output,
    };

    match cli.command {
        Cmd::Parse(args) => Options {
            command: Command::Parse,
            use_stdout: args.stdout,
            level: args.tuning.level,
            dict_size: args.tuning.dict_size,
            buffer_size: args.tuning.buffer_size,
            no_output: args.no_output,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            ..base
        },
        Cmd::Verify(args) => Options {
            command: Command::Verify,
            level: args.tuning.level,
            dict_size: args.tuning.dict_size,
            buffer_size: args.tuning.buffer_size,
            input_file: args.input.or(args.input_pos),
            ..base
        },
        Cmd::Config => base,
    }
}

fn build_parse_options(opts: &Options) -> ParseOptions {
    ParseOptions {
        level: opts.level,
        dict_size: opts.dict_size.map(|n| n as usize),
        buffer_size: opts.buffer_size.map(|n| n as usize),
        chunk_size: BUF_SIZE,
    }
}

/// Reject size flags above the dictionary limits before anything is
/// allocated.
fn check_size_limits(opts: &Options) -> Result<(), String> {
    if let Some(n) = opts.dict_size
        && n > MAX_DICT_SIZE as u64
    {
        return Err(format!("--dict-size: {n} exceeds max {MAX_DICT_SIZE}"));
    }
    if let Some(n) = opts.buffer_size
        && n > MAX_BUFFER_SIZE as u64
    {
        return Err(format!("--buffer-size: {n} exceeds max {MAX_BUFFER_SIZE}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Operation sink
// ---------------------------------------------------------------------------

/// Writes each operation on its own line.  The first write error is kept
/// and later operations are dropped.
struct OpWriter<W: Write> {
    out: W,
    err: Option<io::Error>,
}

impl<W: Write> OpWriter<W> {
    fn new(out: W) -> Self {
        Self { out, err: None }
    }

    fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.err.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Extend<Operation> for OpWriter<W> {
    fn extend<I: IntoIterator<Item = Operation>>(&mut self, iter: I) {
        if self.err.is_some() {
            return;
        }
        for op in iter {
            if let Err(e) = writeln!(self.out, "{op}") {
                self.err = Some(e);
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("lzgreedy version {version}");

    eprintln!("MIN_MATCH_LEN={MIN_MATCH_LEN}");
    eprintln!("MAX_MATCH_LEN={MAX_MATCH_LEN}");
    eprintln!("SHORT_DISTANCES={SHORT_DISTANCES}");
    eprintln!("PREFIX_LEN={PREFIX_LEN}");
    eprintln!("DEFAULT_LEVEL={DEFAULT_LEVEL}");
    eprintln!("DEFAULT_DICT_SIZE={DEFAULT_DICT_SIZE}");
    eprintln!("DEFAULT_BUFFER_SIZE={DEFAULT_BUFFER_SIZE}");
    eprintln!("MAX_DICT_SIZE={MAX_DICT_SIZE}");
    eprintln!("MAX_BUFFER_SIZE={MAX_BUFFER_SIZE}");
    for level in 0..=9 {
        let DictConfig {
            name,
            dict_size,
            buffer_size,
            max_chain,
        } = config::config_for_level(level);
        eprintln!(
            "level {level}: profile={name} dict_size={dict_size} buffer_size={buffer_size} max_chain={max_chain}"
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Option<Box<dyn Read>> {
    let Some(path) = &opts.input_file else {
        return Some(Box::new(BufReader::new(io::stdin())));
    };
    match File::open(path) {
        Ok(f) => Some(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
        Err(e) => {
            eprintln!("lzgreedy: input file: {}: {e}", path.display());
            None
        }
    }
}

/// Destination for printed operations: nothing with `--check-only`,
/// stdout with `-c` or no output path, otherwise the output file.
fn open_output(opts: &Options) -> Result<Box<dyn Write>, String> {
    if opts.no_output {
        return Ok(Box::new(io::sink()));
    }
    let path = match &opts.output_file {
        Some(path) if !opts.use_stdout => path,
        _ => return Ok(Box::new(BufWriter::with_capacity(BUF_SIZE, io::stdout().lock()))),
    };
    if path.exists() && !opts.force {
        return Err(format!(
            "output file exists, use -f to overwrite: {}",
            path.display()
        ));
    }
    let f = File::create(path).map_err(|e| format!("output file: {}: {e}", path.display()))?;
    Ok(Box::new(BufWriter::with_capacity(BUF_SIZE, f)))
}

fn print_stats(opts: &Options, command: &str, stats: &ParseStats) {
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "lzgreedy: {command}: input size: {}, ops: {}, literals: {}, matches: {}, matched bytes: {}",
            stats.bytes_in,
            stats.ops_out(),
            stats.literals,
            stats.matches,
            stats.matched_bytes
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": command,
            "input_size": stats.bytes_in,
            "ops": stats.ops_out(),
            "literals": stats.literals,
            "matches": stats.matches,
            "matched_bytes": stats.matched_bytes,
            "level": opts.level,
            "profile": config::config_for_level(opts.level).name,
        });
        match serde_json::to_string_pretty(&json) {
            Ok(s) => eprintln!("{s}"),
            Err(e) => eprintln!("lzgreedy: json error: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse command
// ---------------------------------------------------------------------------

fn cmd_parse(opts: &Options) -> i32 {
    let parse_opts = build_parse_options(opts);
    let Some(mut reader) = open_input(opts) else {
        return 1;
    };

    let output_writer = match open_output(opts) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("lzgreedy: {msg}");
            return 1;
        }
    };

    let mut stream = match OpStream::new(OpWriter::new(output_writer), parse_opts.dict_config()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("lzgreedy: {e}");
            return 1;
        }
    };

    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if let Err(e) = stream.write(&buf[..n]) {
                    eprintln!("lzgreedy: parse error: {e}");
                    return 1;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                eprintln!("lzgreedy: read error: {e}");
                return 1;
            }
        }
    }

    let (sink, stats) = match stream.finish() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("lzgreedy: parse finish error: {e}");
            return 1;
        }
    };

    if let Err(e) = sink.finish() {
        eprintln!("lzgreedy: write error: {e}");
        return 1;
    }

    if opts.no_output && !opts.quiet {
        eprintln!(
            "lzgreedy: input size: {}, ops: {}",
            stats.bytes_in,
            stats.ops_out()
        );
    }
    print_stats(opts, "parse", &stats);

    0
}

// ---------------------------------------------------------------------------
// Verify command
// ---------------------------------------------------------------------------

fn cmd_verify(opts: &Options) -> i32 {
    let parse_opts = build_parse_options(opts);
    let Some(mut reader) = open_input(opts) else {
        return 1;
    };

    let mut input = Vec::new();
    if let Err(e) = reader.read_to_end(&mut input) {
        eprintln!("lzgreedy: read error: {e}");
        return 1;
    }

    let (ops, stats) = match engine::parse_with_options(&input, &parse_opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("lzgreedy: parse error: {e}");
            return 1;
        }
    };

    let decoded = match engine::decode(&ops) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("lzgreedy: replay error: {e}");
            return 1;
        }
    };

    if decoded != input {
        let at = decoded
            .iter()
            .zip(&input)
            .position(|(a, b)| a != b)
            .unwrap_or(decoded.len().min(input.len()));
        eprintln!(
            "lzgreedy: verify failed: replay differs at byte {at} ({} vs {} bytes)",
            decoded.len(),
            input.len()
        );
        return 2;
    }

    if !opts.quiet {
        eprintln!("lzgreedy: verify ok: {} bytes, {} ops", input.len(), ops.len());
    }
    print_stats(opts, "verify", &stats);

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    let default_filter = match opts.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(msg) = check_size_limits(&opts) {
        eprintln!("lzgreedy: {msg}");
        process::exit(1);
    }

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "lzgreedy: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Parse => cmd_parse(&opts),
        Command::Verify => cmd_verify(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
