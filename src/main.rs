//! guardshift main entrypoint.

use guardshift::run;

fn main() {
    if let Err(e) = run() {
        guardshift::ui::messages::error(&e);
        std::process::exit(1);
    }
}
