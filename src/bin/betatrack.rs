//! Command line runner for the `betatrack` library.

#[cfg(not(feature = "for-testing"))]
#[quit::main]
fn main() {
    #[cfg(feature = "cli")]
    {
        env_logger::init();
        betatrack::cli::run::run();
    }
}

#[cfg(feature = "for-testing")]
fn main() {
    #[cfg(feature = "cli")]
    {
        eprintln!(
            "Warning: The `for-testing` feature is enabled, which will clutter error messages\n\
             Tip: Use cargo flag --features=all-non-testing to exclude `for-testing`"
        );
        env_logger::init();
        betatrack::cli::run::run();
    }
}
