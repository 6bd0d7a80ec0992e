//! Mounts the epidemic network dashboard into the page body.

use epinet_dashboard::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
