// cukex command-line entry point
// Usage: cukex [--verbose] [--json] <command> ...

fn main() {
    cukex::cli::run();
}
