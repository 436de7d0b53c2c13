fn main() {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    if let Err(err) = places_sweep::run() {
        eprintln!("{}", err.to_json());
        std::process::exit(err.code);
    }
}
