//! taxibook main entrypoint.

use taxibook::run;
use taxibook::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
