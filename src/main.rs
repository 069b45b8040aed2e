fn main() {
    env_logger::init();
    if let Err(err) = conduit_planner::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
