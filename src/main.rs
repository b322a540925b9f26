fn main() {
    if let Err(error) = image_meta::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
