use std::process::exit;

fn main() {
    if let Err(e) = pokedex::app::run_cli() {
        pokedex::utils::log::error(&e);
        exit(1);
    }
}
