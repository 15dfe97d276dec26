fn main() -> anyhow::Result<()> {
    let result = pony::cli::run();

    // Make sure everything rendered reaches the terminal before exiting
    use std::io::{self, Write};
    let _ = io::stderr().flush();
    let _ = io::stdout().flush();

    result
}
