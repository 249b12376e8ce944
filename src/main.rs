fn main() {
    if let Err(err) = gias_establishments::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
