fn main() {
    if let Err(err) = slidemark::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
