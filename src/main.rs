fn main() {
    std::process::exit(tested::cli::run().code());
}
