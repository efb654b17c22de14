fn main() {
    #[cfg(feature = "cli")]
    lzgreedy::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("lzgreedy: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
